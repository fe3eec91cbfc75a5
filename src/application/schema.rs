//! Shape and range checks for request payloads.
//!
//! These run before any business rule: they only look at one field (or one
//! address) at a time and report every problem they find, keyed by the
//! camelCase JSON path the client sent.

use crate::application::pickup::booking_horizon;
use crate::domain::address::Address;
use crate::domain::package::{
    CM_PER_INCH, DimensionUnit, LBS_PER_KG, PackageInfo, PackageType, WeightUnit,
};
use crate::domain::payment::PaymentInfo;
use crate::domain::pickup::PickupDetails;
use crate::domain::shipment::ShipmentDetails;
use crate::domain::transaction::ShippingTransaction;
use crate::error::{FieldError, QuoteError, Result};
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"));
static US_ZIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid US zip pattern"));
static CA_POSTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]\d[A-Za-z][ -]?\d[A-Za-z]\d$").expect("valid CA postal pattern")
});
static MX_POSTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}$").expect("valid MX postal pattern"));

const US_STATES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];
const CA_PROVINCES: [&str; 13] = [
    "AB", "BC", "MB", "NB", "NL", "NS", "NT", "NU", "ON", "PE", "QC", "SK", "YT",
];
const MX_STATES: [&str; 32] = [
    "AGU", "BCN", "BCS", "CAM", "CHP", "CHH", "CMX", "COA", "COL", "DUR", "GUA", "GRO", "HID",
    "JAL", "MEX", "MIC", "MOR", "NAY", "NLE", "OAX", "PUE", "QUE", "ROO", "SLP", "SIN", "SON",
    "TAB", "TAM", "TLA", "VER", "YUC", "ZAC",
];

/// Longest side any carrier on the rate card accepts.
pub const MAX_SIDE_INCHES: Decimal = dec!(1000);

/// Heaviest shipment any package type allows, in pounds.
pub fn max_weight_lbs() -> Decimal {
    PackageType::Multiple.limits().max_weight_lbs
}

fn require(errors: &mut Vec<FieldError>, field: String, value: &str, label: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, format!("{label} is required")));
    }
}

fn digit_count(value: &str) -> usize {
    value.chars().filter(char::is_ascii_digit).count()
}

fn check_phone(errors: &mut Vec<FieldError>, field: String, phone: &str) {
    if digit_count(phone) < 10 {
        errors.push(FieldError::new(field, "phone number needs at least 10 digits"));
    }
}

pub fn validate_address(prefix: &str, address: &Address) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let path = |name: &str| format!("{prefix}.{name}");

    require(&mut errors, path("address"), &address.address, "street address");
    require(&mut errors, path("city"), &address.city, "city");
    require(&mut errors, path("state"), &address.state, "state");
    require(&mut errors, path("zip"), &address.zip, "postal code");
    require(&mut errors, path("country"), address.country.as_str(), "country");

    let zip = address.zip.trim();
    let state = address.state.trim().to_ascii_uppercase();
    let (zip_ok, state_ok) = match address.country.as_str() {
        "US" => (US_ZIP.is_match(zip), US_STATES.contains(&state.as_str())),
        "CA" => (CA_POSTAL.is_match(zip), CA_PROVINCES.contains(&state.as_str())),
        "MX" => (MX_POSTAL.is_match(zip), MX_STATES.contains(&state.as_str())),
        // Coverage of other countries is a business rule, not a format question.
        _ => (true, true),
    };
    if !zip.is_empty() && !zip_ok {
        errors.push(FieldError::new(
            path("zip"),
            format!("postal code does not match {} format", address.country),
        ));
    }
    if !state.is_empty() && !state_ok {
        errors.push(FieldError::new(
            path("state"),
            format!("unknown state or province for {}", address.country),
        ));
    }

    let contact = &address.contact_info;
    require(&mut errors, path("contactInfo.name"), &contact.name, "contact name");
    check_phone(&mut errors, path("contactInfo.phone"), &contact.phone);
    if !EMAIL.is_match(contact.email.trim()) {
        errors.push(FieldError::new(
            path("contactInfo.email"),
            "email address is not valid",
        ));
    }

    errors
}

pub fn validate_package(package: &PackageInfo) -> Vec<FieldError> {
    let mut errors = Vec::new();

    // Bounds are compared in the unit the client sent, so nothing is
    // multiplied before it is known to be small.
    let max_weight = match package.weight.unit {
        WeightUnit::Lbs => max_weight_lbs(),
        WeightUnit::Kg => max_weight_lbs() / LBS_PER_KG,
    };
    if package.weight.value <= Decimal::ZERO {
        errors.push(FieldError::new("package.weight.value", "weight must be positive"));
    } else if package.weight.value > max_weight {
        errors.push(FieldError::new(
            "package.weight.value",
            format!("weight cannot exceed {} lbs", max_weight_lbs()),
        ));
    }
    let dims = &package.dimensions;
    let max_side = match dims.unit {
        DimensionUnit::In => MAX_SIDE_INCHES,
        DimensionUnit::Cm => MAX_SIDE_INCHES * CM_PER_INCH,
    };
    for (name, value) in [
        ("length", dims.length),
        ("width", dims.width),
        ("height", dims.height),
    ] {
        if value <= Decimal::ZERO {
            errors.push(FieldError::new(
                format!("package.dimensions.{name}"),
                format!("{name} must be positive"),
            ));
        } else if value > max_side {
            errors.push(FieldError::new(
                format!("package.dimensions.{name}"),
                format!("{name} cannot exceed {MAX_SIDE_INCHES} inches"),
            ));
        }
    }
    if package.declared_value < Decimal::ZERO {
        errors.push(FieldError::new(
            "package.declaredValue",
            "declared value cannot be negative",
        ));
    }
    let currency = package.currency.trim();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        errors.push(FieldError::new(
            "package.currency",
            "currency must be a three-letter code",
        ));
    }

    errors
}

pub fn validate_shipment(shipment: &ShipmentDetails) -> Vec<FieldError> {
    let mut errors = validate_address("origin", &shipment.origin);
    errors.extend(validate_address("destination", &shipment.destination));
    errors.extend(validate_package(&shipment.package));
    errors
}

pub fn validate_payment(payment: &PaymentInfo) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let path = |name: &str| format!("paymentInfo.details.{name}");

    match payment {
        PaymentInfo::Po(po) => {
            require(&mut errors, path("poNumber"), &po.po_number, "PO number");
            require(&mut errors, path("approvalContact"), &po.approval_contact, "approval contact");
            if po.po_amount <= Decimal::ZERO {
                errors.push(FieldError::new(path("poAmount"), "PO amount must be positive"));
            }
        }
        PaymentInfo::Bol(bol) => {
            require(&mut errors, path("bolNumber"), &bol.bol_number, "BOL number");
        }
        PaymentInfo::Thirdparty(tp) => {
            require(&mut errors, path("accountNumber"), &tp.account_number, "account number");
            require(&mut errors, path("companyName"), &tp.company_name, "company name");
            require(&mut errors, path("contactName"), &tp.contact_name, "contact name");
            check_phone(&mut errors, path("contactPhone"), &tp.contact_phone);
        }
        PaymentInfo::Net(net) => {
            require(&mut errors, path("creditReference"), &net.credit_reference, "credit reference");
            require(&mut errors, path("billingContact"), &net.billing_contact, "billing contact");
            if let Some(revenue) = net.annual_revenue
                && revenue < Decimal::ZERO
            {
                errors.push(FieldError::new(
                    path("annualRevenue"),
                    "annual revenue cannot be negative",
                ));
            }
        }
        PaymentInfo::Corporate(corp) => {
            require(&mut errors, path("accountNumber"), &corp.account_number, "account number");
            require(&mut errors, path("accountPin"), &corp.account_pin, "account PIN");
            require(&mut errors, path("billingContact"), &corp.billing_contact, "billing contact");
        }
    }

    errors
}

pub fn validate_pickup(pickup: &PickupDetails, today: NaiveDate) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if pickup.date < today {
        errors.push(FieldError::new("pickup.date", "pickup date is in the past"));
    } else if booking_horizon(today).is_none_or(|horizon| pickup.date > horizon) {
        errors.push(FieldError::new(
            "pickup.date",
            "pickup date is too far in the future",
        ));
    }
    if pickup.time_slot.end_time <= pickup.time_slot.start_time {
        errors.push(FieldError::new(
            "pickup.timeSlot",
            "time slot must end after it starts",
        ));
    }
    require(&mut errors, "pickup.contactName".to_string(), &pickup.contact_name, "pickup contact");
    check_phone(&mut errors, "pickup.contactPhone".to_string(), &pickup.contact_phone);

    errors
}

/// Checks every part of the transaction that is present.
pub fn validate_transaction(tx: &ShippingTransaction, today: NaiveDate) -> Vec<FieldError> {
    let mut errors = validate_shipment(&tx.shipment);
    if let Some(payment) = &tx.payment_info {
        errors.extend(validate_payment(payment));
    }
    if let Some(pickup) = &tx.pickup {
        errors.extend(validate_pickup(pickup, today));
    }
    errors
}

/// Lists the booking steps a transaction still lacks before it can be submitted.
pub fn missing_for_submission(tx: &ShippingTransaction) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if tx.selected_option.is_none() {
        errors.push(FieldError::new("selectedOption", "select a shipping option"));
    }
    if tx.payment_info.is_none() {
        errors.push(FieldError::new("paymentInfo", "choose a payment method"));
    }
    if tx.pickup.is_none() {
        errors.push(FieldError::new("pickup", "schedule a pickup"));
    }
    errors
}

/// Turns a list of field errors into a `Result`, failing when any exist.
pub fn ensure_valid(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(QuoteError::Schema(errors))
    }
}
