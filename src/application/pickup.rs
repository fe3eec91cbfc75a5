use crate::application::rules::minimum_lead_hours;
use crate::domain::package::SpecialHandling;
use crate::domain::pickup::{PickupWindow, TimeSlot};
use crate::domain::pricing::ServiceCategory;
use crate::error::{QuoteError, Result};
use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Utc, Weekday};
use std::collections::BTreeSet;

pub const DEFAULT_DAYS: u32 = 5;
pub const MAX_DAYS: u32 = 14;
/// How far ahead a pickup may be booked or listed.
pub const BOOKING_HORIZON_DAYS: u64 = 365;

/// Last date a pickup may be booked for, counted from `today`.
pub fn booking_horizon(today: NaiveDate) -> Option<NaiveDate> {
    today.checked_add_days(Days::new(BOOKING_HORIZON_DAYS))
}

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Moves `days` business days forward from `start`, skipping weekends.
///
/// Returns `None` when the result would fall past the last representable
/// date.
pub fn add_business_days(start: NaiveDate, days: u32) -> Option<NaiveDate> {
    let mut date = start;
    let mut remaining = days;
    while remaining > 0 {
        date = date.succ_opt()?;
        if is_business_day(date) {
            remaining -= 1;
        }
    }
    Some(date)
}

/// The driver windows offered every business day.
pub fn standard_slots() -> Vec<TimeSlot> {
    [
        ("morning", "Morning (8:00 AM - 12:00 PM)", (8, 0), (12, 0)),
        ("afternoon", "Afternoon (12:00 PM - 5:00 PM)", (12, 0), (17, 0)),
        ("evening", "Evening (5:00 PM - 7:00 PM)", (17, 0), (19, 0)),
    ]
    .into_iter()
    .filter_map(|(id, label, start, end)| TimeSlot::new(id, label, start, end))
    .collect()
}

#[derive(Debug, Clone, Default)]
pub struct AvailabilityRequest {
    pub from_date: Option<NaiveDate>,
    pub days: Option<u32>,
    pub category: Option<ServiceCategory>,
    pub special_handling: BTreeSet<SpecialHandling>,
}

/// Lists pickup windows over the next business days.
///
/// Windows that open before the required lead time has elapsed are still
/// listed but flagged unavailable, so the client can explain why. A start
/// date past the booking horizon is a schema error on `fromDate`.
pub fn pickup_windows(
    request: &AvailabilityRequest,
    now: DateTime<Utc>,
) -> Result<Vec<PickupWindow>> {
    let out_of_range = || QuoteError::schema("fromDate", "start date is too far in the future");
    let days = request.days.unwrap_or(DEFAULT_DAYS).clamp(1, MAX_DAYS);
    let lead_hours = minimum_lead_hours(request.category, &request.special_handling);
    let earliest = now + Duration::hours(lead_hours);
    let slots = standard_slots();

    let today = now.date_naive();
    let mut date = request.from_date.unwrap_or(today);
    if booking_horizon(today).is_none_or(|horizon| date > horizon) {
        return Err(out_of_range());
    }
    if !is_business_day(date) {
        date = add_business_days(date, 1).ok_or_else(out_of_range)?;
    }

    let mut windows = Vec::new();
    for _ in 0..days {
        for slot in &slots {
            let opens = date.and_time(slot.start_time).and_utc();
            let available = opens >= earliest;
            windows.push(PickupWindow {
                date,
                time_slot: slot.clone(),
                available,
                unavailable_reason: (!available)
                    .then(|| format!("requires {lead_hours} hours notice")),
            });
        }
        date = add_business_days(date, 1).ok_or_else(out_of_range)?;
    }
    Ok(windows)
}
