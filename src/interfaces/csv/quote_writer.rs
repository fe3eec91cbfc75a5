use crate::domain::pricing::{PricingOption, ServiceCategory};
use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct RateRow<'a> {
    category: ServiceCategory,
    id: &'a str,
    carrier: &'a str,
    service: &'a str,
    transit_days: u32,
    estimated_delivery: NaiveDate,
    base_rate: String,
    fuel_surcharge: String,
    insurance: String,
    special_handling: String,
    total: String,
}

impl<'a> From<&'a PricingOption> for RateRow<'a> {
    fn from(option: &'a PricingOption) -> Self {
        let money = |value: rust_decimal::Decimal| format!("{:.2}", value);
        Self {
            category: option.category,
            id: &option.id,
            carrier: &option.carrier,
            service: &option.service_name,
            transit_days: option.transit_days,
            estimated_delivery: option.estimated_delivery,
            base_rate: money(option.pricing.base_rate),
            fuel_surcharge: money(option.pricing.fuel_surcharge),
            insurance: money(option.pricing.insurance),
            special_handling: money(option.pricing.special_handling_fees),
            total: money(option.pricing.total),
        }
    }
}

/// Writes pricing options as a CSV rate table.
///
/// Amounts are rendered with two decimal places; the header row is written
/// once, with the first option.
pub struct QuoteWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> QuoteWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_options<'a, I>(&mut self, options: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a PricingOption>,
    {
        for option in options {
            self.writer.serialize(RateRow::from(option))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
