use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Pounds per kilogram.
pub const LBS_PER_KG: Decimal = dec!(2.20462);
/// Centimetres per inch.
pub const CM_PER_INCH: Decimal = dec!(2.54);
/// Cubic inches per pound of dimensional weight.
pub const DIM_DIVISOR: Decimal = dec!(166);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    #[default]
    In,
    Cm,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    pub value: Decimal,
    #[serde(default)]
    pub unit: WeightUnit,
}

impl Weight {
    pub fn lbs(value: Decimal) -> Self {
        Self {
            value,
            unit: WeightUnit::Lbs,
        }
    }

    pub fn in_pounds(&self) -> Decimal {
        match self.unit {
            WeightUnit::Lbs => self.value,
            WeightUnit::Kg => self.value * LBS_PER_KG,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: Decimal,
    pub width: Decimal,
    pub height: Decimal,
    #[serde(default)]
    pub unit: DimensionUnit,
}

impl Dimensions {
    pub fn inches(length: Decimal, width: Decimal, height: Decimal) -> Self {
        Self {
            length,
            width,
            height,
            unit: DimensionUnit::In,
        }
    }

    /// Volume in cubic inches.
    pub fn cubic_inches(&self) -> Decimal {
        let to_inches = |value: Decimal| match self.unit {
            DimensionUnit::In => value,
            DimensionUnit::Cm => value / CM_PER_INCH,
        };
        to_inches(self.length) * to_inches(self.width) * to_inches(self.height)
    }
}

/// Per-type ceilings, all in pounds and US dollars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackageLimits {
    pub max_weight_lbs: Decimal,
    pub max_declared_value: Decimal,
    pub unusual_value_threshold: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Envelope,
    Small,
    #[default]
    Medium,
    Large,
    Pallet,
    Crate,
    Multiple,
}

impl PackageType {
    pub fn limits(self) -> PackageLimits {
        let (max_weight_lbs, max_declared_value, unusual_value_threshold) = match self {
            PackageType::Envelope => (dec!(1), dec!(500), dec!(100)),
            PackageType::Small => (dec!(50), dec!(5000), dec!(2500)),
            PackageType::Medium => (dec!(150), dec!(10000), dec!(5000)),
            PackageType::Large => (dec!(500), dec!(25000), dec!(10000)),
            PackageType::Pallet => (dec!(2500), dec!(50000), dec!(25000)),
            PackageType::Crate => (dec!(5000), dec!(100000), dec!(50000)),
            PackageType::Multiple => (dec!(10000), dec!(250000), dec!(100000)),
        };
        PackageLimits {
            max_weight_lbs,
            max_declared_value,
            unusual_value_threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecialHandling {
    Fragile,
    ThisSideUp,
    TemperatureControlled,
    Hazmat,
    WhiteGlove,
    InsideDelivery,
    LiftgatePickup,
    LiftgateDelivery,
}

impl SpecialHandling {
    pub fn label(self) -> &'static str {
        match self {
            SpecialHandling::Fragile => "fragile",
            SpecialHandling::ThisSideUp => "this-side-up",
            SpecialHandling::TemperatureControlled => "temperature-controlled",
            SpecialHandling::Hazmat => "hazmat",
            SpecialHandling::WhiteGlove => "white-glove",
            SpecialHandling::InsideDelivery => "inside-delivery",
            SpecialHandling::LiftgatePickup => "liftgate-pickup",
            SpecialHandling::LiftgateDelivery => "liftgate-delivery",
        }
    }

    /// Flat surcharge added to every quote that carries this option.
    pub fn fee(self) -> Decimal {
        match self {
            SpecialHandling::Fragile => dec!(15.00),
            SpecialHandling::ThisSideUp => dec!(5.00),
            SpecialHandling::TemperatureControlled => dec!(75.00),
            SpecialHandling::Hazmat => dec!(125.00),
            SpecialHandling::WhiteGlove => dec!(95.00),
            SpecialHandling::InsideDelivery => dec!(45.00),
            SpecialHandling::LiftgatePickup => dec!(35.00),
            SpecialHandling::LiftgateDelivery => dec!(35.00),
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    #[serde(rename = "type")]
    pub package_type: PackageType,
    pub weight: Weight,
    pub dimensions: Dimensions,
    pub declared_value: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
    #[serde(default)]
    pub special_handling: BTreeSet<SpecialHandling>,
}

impl PackageInfo {
    pub fn has(&self, handling: SpecialHandling) -> bool {
        self.special_handling.contains(&handling)
    }

    pub fn actual_weight_lbs(&self) -> Decimal {
        self.weight.in_pounds()
    }

    pub fn dimensional_weight_lbs(&self) -> Decimal {
        self.dimensions.cubic_inches() / DIM_DIVISOR
    }

    /// The weight carriers charge for: the larger of actual and dimensional.
    pub fn billable_weight_lbs(&self) -> Decimal {
        self.actual_weight_lbs().max(self.dimensional_weight_lbs())
    }

    pub fn special_handling_fees(&self) -> Decimal {
        self.special_handling.iter().map(|h| h.fee()).sum()
    }
}
