use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static PO_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^PO-?[A-Z0-9]{4,16}$").expect("valid PO pattern"));
static BOL_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^BOL-?[A-Z0-9]{6,20}$").expect("valid BOL pattern"));
static THIRD_PARTY_ACCOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-Z0-9]{6,20}$").expect("valid account pattern"));
static CORPORATE_ACCOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^CORP-?\d{6,12}$").expect("valid corporate pattern"));
static ACCOUNT_PIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4,6}$").expect("valid PIN pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Po,
    Bol,
    Thirdparty,
    Net,
    Corporate,
}

impl PaymentMethod {
    /// Share of structurally valid requests the simulated gateway approves.
    pub fn success_rate(self) -> f64 {
        match self {
            PaymentMethod::Po => 0.95,
            PaymentMethod::Bol => 0.97,
            PaymentMethod::Thirdparty => 0.92,
            PaymentMethod::Net => 0.88,
            PaymentMethod::Corporate => 0.98,
        }
    }

    /// Simulated gateway round-trip in milliseconds.
    pub fn processing_delay_ms(self) -> u64 {
        match self {
            PaymentMethod::Po => 1500,
            PaymentMethod::Bol => 1200,
            PaymentMethod::Thirdparty => 2000,
            PaymentMethod::Net => 2500,
            PaymentMethod::Corporate => 800,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PaymentMethod::Po => "purchase order",
            PaymentMethod::Bol => "bill of lading",
            PaymentMethod::Thirdparty => "third-party billing",
            PaymentMethod::Net => "net terms",
            PaymentMethod::Corporate => "corporate account",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderDetails {
    pub po_number: String,
    pub po_amount: Decimal,
    pub expiration_date: NaiveDate,
    pub approval_contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FreightTerms {
    #[default]
    Prepaid,
    Collect,
    ThirdParty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillOfLadingDetails {
    pub bol_number: String,
    pub bol_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipper_reference: Option<String>,
    #[serde(default)]
    pub freight_terms: FreightTerms,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThirdPartyDetails {
    pub account_number: String,
    pub company_name: String,
    pub contact_name: String,
    pub contact_phone: String,
    #[serde(default)]
    pub authorization_confirmed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetTermsDetails {
    /// Days until payment is due: 15, 30, 45 or 60.
    pub period: u16,
    pub credit_reference: String,
    pub billing_contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_revenue: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorporateAccountDetails {
    pub account_number: String,
    pub account_pin: String,
    pub billing_contact: String,
}

pub const NET_TERM_PERIODS: [u16; 4] = [15, 30, 45, 60];

/// A payment method together with the details that method requires.
///
/// On the wire this is `{"method": "po", "details": {...}}`; a payload whose
/// details do not fit the declared method fails to deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "details", rename_all = "lowercase")]
pub enum PaymentInfo {
    Po(PurchaseOrderDetails),
    Bol(BillOfLadingDetails),
    Thirdparty(ThirdPartyDetails),
    Net(NetTermsDetails),
    Corporate(CorporateAccountDetails),
}

impl PaymentInfo {
    pub fn method(&self) -> PaymentMethod {
        match self {
            PaymentInfo::Po(_) => PaymentMethod::Po,
            PaymentInfo::Bol(_) => PaymentMethod::Bol,
            PaymentInfo::Thirdparty(_) => PaymentMethod::Thirdparty,
            PaymentInfo::Net(_) => PaymentMethod::Net,
            PaymentInfo::Corporate(_) => PaymentMethod::Corporate,
        }
    }

    /// Format checks a gateway would run before contacting the issuer.
    ///
    /// Returns one human-readable message per failed check; an empty list
    /// means the details are structurally sound.
    pub fn structural_failures(&self, today: NaiveDate) -> Vec<String> {
        let mut failures = Vec::new();
        match self {
            PaymentInfo::Po(po) => {
                if !PO_NUMBER.is_match(po.po_number.trim()) {
                    failures.push("PO number must look like PO-12345".to_string());
                }
                if po.po_amount <= Decimal::ZERO {
                    failures.push("PO amount must be positive".to_string());
                }
                if po.expiration_date < today {
                    failures.push("PO has expired".to_string());
                }
                if po.approval_contact.trim().is_empty() {
                    failures.push("PO approval contact is required".to_string());
                }
            }
            PaymentInfo::Bol(bol) => {
                if !BOL_NUMBER.is_match(bol.bol_number.trim()) {
                    failures.push("BOL number must look like BOL-123456".to_string());
                }
                if bol.bol_date > today {
                    failures.push("BOL date cannot be in the future".to_string());
                }
            }
            PaymentInfo::Thirdparty(tp) => {
                if !THIRD_PARTY_ACCOUNT.is_match(tp.account_number.trim()) {
                    failures.push("third-party account number must be 6-20 letters or digits".to_string());
                }
                if tp.company_name.trim().is_empty() {
                    failures.push("third-party company name is required".to_string());
                }
                if tp.contact_name.trim().is_empty() || tp.contact_phone.trim().is_empty() {
                    failures.push("third-party contact name and phone are required".to_string());
                }
                if !tp.authorization_confirmed {
                    failures.push("third party has not confirmed billing authorization".to_string());
                }
            }
            PaymentInfo::Net(net) => {
                if !NET_TERM_PERIODS.contains(&net.period) {
                    failures.push(format!("net terms period {} is not offered", net.period));
                }
                if net.credit_reference.trim().is_empty() {
                    failures.push("credit reference is required for net terms".to_string());
                }
                if net.billing_contact.trim().is_empty() {
                    failures.push("billing contact is required for net terms".to_string());
                }
            }
            PaymentInfo::Corporate(corp) => {
                if !CORPORATE_ACCOUNT.is_match(corp.account_number.trim()) {
                    failures.push("corporate account must look like CORP-123456".to_string());
                }
                if !ACCOUNT_PIN.is_match(corp.account_pin.trim()) {
                    failures.push("account PIN must be 4-6 digits".to_string());
                }
                if corp.billing_contact.trim().is_empty() {
                    failures.push("billing contact is required for corporate accounts".to_string());
                }
            }
        }
        failures
    }
}

/// Result of asking a gateway to authorize a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum AuthorizationOutcome {
    Authorized {
        method: PaymentMethod,
        authorization_code: String,
        transaction_id: String,
        processed_at: DateTime<Utc>,
    },
    Declined {
        method: PaymentMethod,
        reason: String,
        processed_at: DateTime<Utc>,
    },
}

impl AuthorizationOutcome {
    pub fn is_authorized(&self) -> bool {
        matches!(self, AuthorizationOutcome::Authorized { .. })
    }
}
