use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: String,
    pub label: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl TimeSlot {
    pub fn new(id: &str, label: &str, start: (u32, u32), end: (u32, u32)) -> Option<Self> {
        Some(Self {
            id: id.to_string(),
            label: label.to_string(),
            start_time: NaiveTime::from_hms_opt(start.0, start.1, 0)?,
            end_time: NaiveTime::from_hms_opt(end.0, end.1, 0)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupDetails {
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    #[serde(default)]
    pub access_requirements: Vec<String>,
    #[serde(default)]
    pub equipment_available: Vec<String>,
}

impl PickupDetails {
    /// The moment the driver window opens. Dates and slots carry no zone and
    /// are read as UTC.
    pub fn window_start(&self) -> DateTime<Utc> {
        self.date.and_time(self.time_slot.start_time).and_utc()
    }
}

/// A pickup window offered to the customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupWindow {
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unavailable_reason: Option<String>,
}
