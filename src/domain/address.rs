use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Countries the network picks up from and delivers to.
pub const SERVICE_COUNTRIES: [&str; 3] = ["US", "CA", "MX"];

/// An ISO-3166 alpha-2 country code.
///
/// Older clients stored full names or alpha-3 codes ("USA", "Canada"); those
/// are folded into the alpha-2 form whenever a code is built or deserialized,
/// so every comparison downstream works on one spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(raw: &str) -> Self {
        Self(normalize_country(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_serviced(&self) -> bool {
        SERVICE_COUNTRIES.contains(&self.0.as_str())
    }
}

impl Default for CountryCode {
    fn default() -> Self {
        Self("US".to_string())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(&raw))
    }
}

fn normalize_country(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.to_uppercase().as_str() {
        "US" | "USA" | "UNITED STATES" | "UNITED STATES OF AMERICA" => "US".to_string(),
        "CA" | "CAN" | "CANADA" => "CA".to_string(),
        "MX" | "MEX" | "MEXICO" | "MÉXICO" => "MX".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationType {
    #[default]
    Commercial,
    Residential,
    Warehouse,
    Storage,
    Construction,
    Other,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub phone: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

/// A pickup or delivery location together with its on-site contact.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suite: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    #[serde(default)]
    pub country: CountryCode,
    #[serde(default)]
    pub location_type: LocationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_description: Option<String>,
    #[serde(default)]
    pub contact_info: ContactInfo,
}

impl Address {
    /// Returns true when both addresses point at the same physical location.
    ///
    /// Street, city, state, zip and country are compared after trimming and
    /// case-folding; suite and contact details are ignored.
    pub fn same_location(&self, other: &Address) -> bool {
        fn fold(value: &str) -> String {
            value.trim().to_lowercase()
        }

        fold(&self.address) == fold(&other.address)
            && fold(&self.city) == fold(&other.city)
            && fold(&self.state) == fold(&other.state)
            && fold(&self.zip) == fold(&other.zip)
            && self.country == other.country
    }

    /// Re-applies country normalization, for values built in code rather than
    /// deserialized.
    pub fn normalize_legacy(&mut self) {
        self.country = CountryCode::new(self.country.as_str());
    }
}
