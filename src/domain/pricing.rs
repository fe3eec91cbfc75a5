use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How long a quote stays bookable after it was priced.
pub const QUOTE_TTL_MINUTES: i64 = 30;

pub fn quote_ttl() -> Duration {
    Duration::minutes(QUOTE_TTL_MINUTES)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Ground,
    Air,
    Freight,
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceCategory::Ground => "ground",
            ServiceCategory::Air => "air",
            ServiceCategory::Freight => "freight",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub base_rate: Decimal,
    pub fuel_surcharge: Decimal,
    pub fuel_surcharge_percentage: Decimal,
    pub insurance: Decimal,
    pub special_handling_fees: Decimal,
    pub total: Decimal,
}

/// One bookable carrier/service price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingOption {
    pub id: String,
    pub carrier: String,
    pub service_name: String,
    pub category: ServiceCategory,
    pub pricing: CostBreakdown,
    pub transit_days: u32,
    pub estimated_delivery: NaiveDate,
    #[serde(default)]
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PricingOption {
    pub fn total(&self) -> Decimal {
        self.pricing.total
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategorizedQuotes {
    pub ground: Vec<PricingOption>,
    pub air: Vec<PricingOption>,
    pub freight: Vec<PricingOption>,
}

impl CategorizedQuotes {
    pub fn all(&self) -> impl Iterator<Item = &PricingOption> {
        self.ground.iter().chain(&self.air).chain(&self.freight)
    }

    pub fn find(&self, id: &str) -> Option<&PricingOption> {
        self.all().find(|option| option.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationMetrics {
    pub distance_miles: Decimal,
    pub zone: u8,
    pub actual_weight: Decimal,
    pub dimensional_weight: Decimal,
    pub billable_weight: Decimal,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub quotes: CategorizedQuotes,
    pub metrics: CalculationMetrics,
    pub quoted_at: DateTime<Utc>,
}
