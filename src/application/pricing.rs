//! Rate computation for the fixed carrier rate card.
//!
//! Prices are a pure function of the shipment and the quote time, so the same
//! request priced twice at the same instant yields identical quotes.

use crate::application::pickup::add_business_days;
use crate::domain::address::Address;
use crate::domain::pricing::{
    CalculationMetrics, CategorizedQuotes, CostBreakdown, PricingOption, QuoteResponse,
    ServiceCategory, quote_ttl,
};
use crate::domain::shipment::ShipmentDetails;
use crate::error::{QuoteError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const EARTH_RADIUS_MILES: f64 = 3958.8;
const INSURANCE_RATE: Decimal = dec!(0.005);
const DIM_WEIGHT_HINT_RATIO: Decimal = dec!(1.5);
const FREIGHT_HINT_WEIGHT: Decimal = dec!(150);

struct RateCard {
    code: &'static str,
    carrier: &'static str,
    service_name: &'static str,
    category: ServiceCategory,
    base: Decimal,
    per_lb: Decimal,
    transit_days: u32,
    features: &'static [&'static str],
}

const RATE_CARD: [RateCard; 9] = [
    RateCard {
        code: "economy",
        carrier: "Meridian Logistics",
        service_name: "Ground Economy",
        category: ServiceCategory::Ground,
        base: dec!(11.50),
        per_lb: dec!(0.68),
        transit_days: 6,
        features: &["Tracking"],
    },
    RateCard {
        code: "standard",
        carrier: "Summit Express",
        service_name: "Standard Ground",
        category: ServiceCategory::Ground,
        base: dec!(14.00),
        per_lb: dec!(0.85),
        transit_days: 4,
        features: &["Tracking", "Delivery confirmation"],
    },
    RateCard {
        code: "priority",
        carrier: "Atlas Parcel",
        service_name: "Priority Ground",
        category: ServiceCategory::Ground,
        base: dec!(19.75),
        per_lb: dec!(1.05),
        transit_days: 3,
        features: &["Tracking", "Delivery confirmation", "Money-back guarantee"],
    },
    RateCard {
        code: "three-day",
        carrier: "Summit Express",
        service_name: "3-Day Select",
        category: ServiceCategory::Air,
        base: dec!(24.00),
        per_lb: dec!(1.95),
        transit_days: 3,
        features: &["Tracking", "Delivery confirmation"],
    },
    RateCard {
        code: "two-day",
        carrier: "Atlas Parcel",
        service_name: "2-Day Air",
        category: ServiceCategory::Air,
        base: dec!(32.50),
        per_lb: dec!(2.75),
        transit_days: 2,
        features: &["Tracking", "Delivery confirmation", "Money-back guarantee"],
    },
    RateCard {
        code: "overnight",
        carrier: "Skyline Air Cargo",
        service_name: "Next Day Air",
        category: ServiceCategory::Air,
        base: dec!(48.00),
        per_lb: dec!(4.50),
        transit_days: 1,
        features: &["Tracking", "Signature on delivery", "Money-back guarantee"],
    },
    RateCard {
        code: "ltl-standard",
        carrier: "Ironline Freight",
        service_name: "LTL Standard",
        category: ServiceCategory::Freight,
        base: dec!(145.00),
        per_lb: dec!(0.32),
        transit_days: 5,
        features: &["Dock-to-dock", "Freight class review"],
    },
    RateCard {
        code: "ltl-guaranteed",
        carrier: "Ironline Freight",
        service_name: "LTL Guaranteed",
        category: ServiceCategory::Freight,
        base: dec!(215.00),
        per_lb: dec!(0.41),
        transit_days: 4,
        features: &["Dock-to-dock", "Guaranteed delivery date"],
    },
    RateCard {
        code: "ftl-dedicated",
        carrier: "Continental Haulage",
        service_name: "Dedicated Truckload",
        category: ServiceCategory::Freight,
        base: dec!(925.00),
        per_lb: dec!(0.12),
        transit_days: 3,
        features: &["Exclusive trailer", "Direct route", "Real-time GPS"],
    },
];

fn zone_factor(category: ServiceCategory) -> Decimal {
    match category {
        ServiceCategory::Ground => dec!(0.08),
        ServiceCategory::Air => dec!(0.12),
        ServiceCategory::Freight => dec!(0.05),
    }
}

/// Fuel surcharge as a fraction of the base rate.
fn fuel_rate(category: ServiceCategory) -> Decimal {
    match category {
        ServiceCategory::Ground => dec!(0.085),
        ServiceCategory::Air => dec!(0.12),
        ServiceCategory::Freight => dec!(0.18),
    }
}

/// Approximate centre of the postal region an address falls in.
fn region_centroid(address: &Address) -> (f64, f64) {
    let first = address.zip.trim().chars().next().map(|c| c.to_ascii_uppercase());
    match address.country.as_str() {
        "US" => match first {
            Some('0') => (42.4, -71.4),
            Some('1') => (41.5, -75.5),
            Some('2') => (37.5, -78.5),
            Some('3') => (32.5, -84.0),
            Some('4') => (40.0, -84.5),
            Some('5') => (44.0, -93.0),
            Some('6') => (39.5, -92.5),
            Some('7') => (32.0, -96.5),
            Some('8') => (39.0, -108.0),
            Some('9') => (38.0, -121.0),
            _ => (39.8, -98.6),
        },
        "CA" => match first {
            Some('V') => (49.25, -123.1),
            Some('T') => (51.0, -114.0),
            Some('M') | Some('L') | Some('N') | Some('P') | Some('K') => (43.7, -79.4),
            Some('H') | Some('J') | Some('G') => (45.5, -73.6),
            _ => (45.4, -75.7),
        },
        "MX" => (19.4, -99.1),
        _ => (39.8, -98.6),
    }
}

fn zip_prefix(address: &Address) -> Option<u32> {
    let digits: String = address.zip.trim().chars().take(3).collect();
    if digits.len() == 3 && digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}

fn great_circle_miles(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let h = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}

/// Road-ish distance between two addresses in whole miles.
pub fn estimate_distance_miles(origin: &Address, destination: &Address) -> u32 {
    let from = region_centroid(origin);
    let to = region_centroid(destination);
    let miles = if from == to {
        match (zip_prefix(origin), zip_prefix(destination)) {
            (Some(a), Some(b)) => (f64::from(a.abs_diff(b)) * 3.0).clamp(10.0, 400.0),
            _ => 40.0,
        }
    } else {
        great_circle_miles(from, to)
    };
    miles.round() as u32
}

pub fn zone_for_distance(miles: u32) -> u8 {
    match miles {
        0..=50 => 1,
        51..=150 => 2,
        151..=300 => 3,
        301..=600 => 4,
        601..=1000 => 5,
        1001..=1400 => 6,
        1401..=1800 => 7,
        _ => 8,
    }
}

fn transit_days(card: &RateCard, zone: u8, international: bool) -> u32 {
    let mut days = card.transit_days;
    if card.category != ServiceCategory::Air {
        if zone >= 5 {
            days += 1;
        }
        if zone >= 7 {
            days += 1;
        }
    }
    if international {
        days += if card.category == ServiceCategory::Air { 1 } else { 2 };
    }
    days
}

pub struct PricingCalculator;

impl PricingCalculator {
    pub fn calculate(shipment: &ShipmentDetails, now: DateTime<Utc>) -> Result<QuoteResponse> {
        let package = &shipment.package;
        let actual = package.actual_weight_lbs().round_dp(2);
        let dimensional = package.dimensional_weight_lbs().round_dp(2);
        let billable = actual.max(dimensional);

        let miles = estimate_distance_miles(&shipment.origin, &shipment.destination);
        let zone = zone_for_distance(miles);
        let international = shipment.is_international();

        let handling_fees = package.special_handling_fees();
        let insurance = (package.declared_value.max(Decimal::ZERO) * INSURANCE_RATE).round_dp(2);

        let mut quotes = CategorizedQuotes::default();
        for card in &RATE_CARD {
            let zone_multiplier = Decimal::ONE + zone_factor(card.category) * Decimal::from(zone - 1);
            let base_rate = ((card.base + card.per_lb * billable) * zone_multiplier).round_dp(2);
            let fuel = fuel_rate(card.category);
            let fuel_surcharge = (base_rate * fuel).round_dp(2);
            let total = base_rate + fuel_surcharge + insurance + handling_fees;
            let days = transit_days(card, zone, international);

            let option = PricingOption {
                id: format!("{}-{}", card.category, card.code),
                carrier: card.carrier.to_string(),
                service_name: card.service_name.to_string(),
                category: card.category,
                pricing: CostBreakdown {
                    base_rate,
                    fuel_surcharge,
                    fuel_surcharge_percentage: (fuel * dec!(100)).normalize(),
                    insurance,
                    special_handling_fees: handling_fees,
                    total,
                },
                transit_days: days,
                estimated_delivery: add_business_days(now.date_naive(), days).ok_or_else(|| {
                    QuoteError::schema("timestamp", "quote date is out of range")
                })?,
                features: card.features.iter().map(|f| f.to_string()).collect(),
                created_at: now,
                expires_at: now + quote_ttl(),
            };

            match card.category {
                ServiceCategory::Ground => quotes.ground.push(option),
                ServiceCategory::Air => quotes.air.push(option),
                ServiceCategory::Freight => quotes.freight.push(option),
            }
        }

        for options in [&mut quotes.ground, &mut quotes.air, &mut quotes.freight] {
            options.sort_by(|a, b| a.pricing.total.cmp(&b.pricing.total));
        }

        let mut recommendations = Vec::new();
        if dimensional > actual * DIM_WEIGHT_HINT_RATIO {
            recommendations.push(format!(
                "Dimensional weight ({dimensional} lbs) is well above actual weight ({actual} lbs); smaller packaging would lower the billable weight"
            ));
        }
        if billable > FREIGHT_HINT_WEIGHT {
            recommendations.push(format!(
                "Billable weight of {billable} lbs is usually cheaper as freight"
            ));
        }

        tracing::debug!(
            miles,
            zone,
            %billable,
            "priced shipment"
        );

        Ok(QuoteResponse {
            quotes,
            metrics: CalculationMetrics {
                distance_miles: Decimal::from(miles),
                zone,
                actual_weight: actual,
                dimensional_weight: dimensional,
                billable_weight: billable,
                recommendations,
            },
            quoted_at: now,
        })
    }
}
