use super::address::Address;
use super::package::PackageInfo;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceLevel {
    Economy,
    #[default]
    Standard,
    Express,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeliveryPreferences {
    pub signature_required: bool,
    pub adult_signature_required: bool,
    pub sms_confirmation: bool,
    pub photo_proof: bool,
    pub saturday_delivery: bool,
    pub hold_at_location: bool,
    pub service_level: ServiceLevel,
}

/// Everything the customer entered before asking for prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentDetails {
    pub origin: Address,
    pub destination: Address,
    pub package: PackageInfo,
    #[serde(default)]
    pub delivery_preferences: DeliveryPreferences,
}

impl ShipmentDetails {
    pub fn is_international(&self) -> bool {
        self.origin.country != self.destination.country
    }

    pub fn normalize_legacy(&mut self) {
        self.origin.normalize_legacy();
        self.destination.normalize_legacy();
    }
}
