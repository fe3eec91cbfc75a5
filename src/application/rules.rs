//! Cross-field business rules over a whole [`ShippingTransaction`].
//!
//! Every rule is an independent function that appends to the same report;
//! one failing rule never hides another.

use crate::domain::package::{PackageType, SpecialHandling};
use crate::domain::payment::PaymentInfo;
use crate::domain::pricing::{ServiceCategory, quote_ttl};
use crate::domain::transaction::ShippingTransaction;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const MIN_DECLARED_VALUE: Decimal = dec!(1);
pub const INTERNATIONAL_VALUE_LIMIT: Decimal = dec!(25000);
pub const NET_TERMS_LIMIT: Decimal = dec!(50000);
/// Dimensional weight above this multiple of actual weight earns a packing hint.
pub const DIM_WEIGHT_RATIO_HINT: Decimal = dec!(1.5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleCode {
    IdenticalAddresses,
    QuoteExpired,
    InsufficientLeadTime,
    WeightLimitExceeded,
    UnsupportedRegion,
    PoAmountExceeded,
    PoExpired,
    PaymentMethodIncompatible,
    NetTermsLimitExceeded,
    IncompatibleSpecialHandling,
    DeclaredValueTooLow,
    DeclaredValueExceeded,
    InternationalValueLimit,
    UnusualDeclaredValue,
    DimensionalWeightOptimization,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub code: RuleCode,
    pub field: String,
    pub message: String,
}

impl RuleViolation {
    fn new(code: RuleCode, field: &str, message: impl Into<String>) -> Self {
        Self {
            code,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<RuleViolation>,
    pub warnings: Vec<RuleViolation>,
}

impl ValidationResult {
    pub fn has_error(&self, code: RuleCode) -> bool {
        self.errors.iter().any(|v| v.code == code)
    }

    pub fn has_warning(&self, code: RuleCode) -> bool {
        self.warnings.iter().any(|v| v.code == code)
    }
}

#[derive(Default)]
struct Report {
    errors: Vec<RuleViolation>,
    warnings: Vec<RuleViolation>,
}

impl Report {
    fn error(&mut self, code: RuleCode, field: &str, message: impl Into<String>) {
        self.errors.push(RuleViolation::new(code, field, message));
    }

    fn warn(&mut self, code: RuleCode, field: &str, message: impl Into<String>) {
        self.warnings.push(RuleViolation::new(code, field, message));
    }
}

/// Hours of notice a carrier needs before a pickup.
///
/// The service category sets the baseline (ground 24, air 12, freight 48;
/// 24 when nothing is selected yet) and hazardous or specialist handling can
/// only raise it: the largest applicable minimum wins.
pub fn minimum_lead_hours(
    category: Option<ServiceCategory>,
    handling: &BTreeSet<SpecialHandling>,
) -> i64 {
    let category_hours = match category {
        Some(ServiceCategory::Air) => 12,
        Some(ServiceCategory::Freight) => 48,
        Some(ServiceCategory::Ground) | None => 24,
    };
    handling
        .iter()
        .filter_map(|h| match h {
            SpecialHandling::Hazmat => Some(72),
            SpecialHandling::WhiteGlove => Some(48),
            SpecialHandling::TemperatureControlled => Some(36),
            _ => None,
        })
        .fold(category_hours, i64::max)
}

pub struct BusinessRuleValidator;

impl BusinessRuleValidator {
    pub fn validate(tx: &ShippingTransaction, now: DateTime<Utc>) -> ValidationResult {
        let mut report = Report::default();

        check_distinct_addresses(tx, &mut report);
        check_quote_age(tx, now, &mut report);
        check_lead_time(tx, now, &mut report);
        check_weight_limit(tx, &mut report);
        check_coverage(tx, &mut report);
        check_payment_compatibility(tx, now, &mut report);
        check_special_handling(tx, &mut report);
        check_declared_value(tx, &mut report);
        check_packing_efficiency(tx, &mut report);

        tracing::debug!(
            transaction = %tx.id,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "business rules evaluated"
        );

        ValidationResult {
            is_valid: report.errors.is_empty(),
            errors: report.errors,
            warnings: report.warnings,
        }
    }
}

fn check_distinct_addresses(tx: &ShippingTransaction, report: &mut Report) {
    if tx.shipment.origin.same_location(&tx.shipment.destination) {
        report.error(
            RuleCode::IdenticalAddresses,
            "destination",
            "origin and destination are the same address",
        );
    }
}

fn check_quote_age(tx: &ShippingTransaction, now: DateTime<Utc>, report: &mut Report) {
    let age = now - tx.timestamp;
    if age > quote_ttl() {
        report.error(
            RuleCode::QuoteExpired,
            "timestamp",
            format!(
                "quote is {} minutes old; quotes are valid for {} minutes",
                age.num_minutes(),
                quote_ttl().num_minutes()
            ),
        );
    }
}

fn check_lead_time(tx: &ShippingTransaction, now: DateTime<Utc>, report: &mut Report) {
    let Some(pickup) = &tx.pickup else {
        return;
    };
    let category = tx.selected_option.as_ref().map(|o| o.category);
    let required = minimum_lead_hours(category, &tx.shipment.package.special_handling);
    let notice = pickup.window_start() - now;
    if notice < Duration::hours(required) {
        report.error(
            RuleCode::InsufficientLeadTime,
            "pickup.date",
            format!(
                "pickup needs at least {required} hours notice; {} hours given",
                notice.num_hours()
            ),
        );
    }
}

fn check_weight_limit(tx: &ShippingTransaction, report: &mut Report) {
    let package = &tx.shipment.package;
    let limit = package.package_type.limits().max_weight_lbs;
    let weight = package.actual_weight_lbs();
    if weight > limit {
        report.error(
            RuleCode::WeightLimitExceeded,
            "package.weight",
            format!(
                "{} lbs exceeds the {limit} lbs limit for this package type",
                weight.round_dp(2)
            ),
        );
    }
}

fn check_coverage(tx: &ShippingTransaction, report: &mut Report) {
    for (field, address) in [
        ("origin.country", &tx.shipment.origin),
        ("destination.country", &tx.shipment.destination),
    ] {
        if !address.country.is_serviced() {
            report.error(
                RuleCode::UnsupportedRegion,
                field,
                format!("we do not yet service {}", address.country),
            );
        }
    }
}

fn check_payment_compatibility(tx: &ShippingTransaction, now: DateTime<Utc>, report: &mut Report) {
    let Some(payment) = &tx.payment_info else {
        return;
    };
    let total = tx.selected_option.as_ref().map(|o| o.total());

    match payment {
        PaymentInfo::Po(po) => {
            if let Some(total) = total
                && total > po.po_amount
            {
                report.error(
                    RuleCode::PoAmountExceeded,
                    "paymentInfo.details.poAmount",
                    format!("shipment total {total} exceeds PO amount {}", po.po_amount),
                );
            }
            if po.expiration_date < now.date_naive() {
                report.error(
                    RuleCode::PoExpired,
                    "paymentInfo.details.expirationDate",
                    "purchase order has expired",
                );
            }
        }
        PaymentInfo::Bol(_) => {
            if tx.shipment.package.package_type == PackageType::Envelope {
                report.error(
                    RuleCode::PaymentMethodIncompatible,
                    "paymentInfo.method",
                    "a bill of lading cannot be used for envelope shipments",
                );
            }
        }
        PaymentInfo::Net(_) => {
            if let Some(total) = total
                && total > NET_TERMS_LIMIT
            {
                report.error(
                    RuleCode::NetTermsLimitExceeded,
                    "paymentInfo.method",
                    format!("net terms are limited to {NET_TERMS_LIMIT} per shipment"),
                );
            }
        }
        PaymentInfo::Thirdparty(_) | PaymentInfo::Corporate(_) => {}
    }
}

fn check_special_handling(tx: &ShippingTransaction, report: &mut Report) {
    let package = &tx.shipment.package;
    if !package.has(SpecialHandling::Hazmat) {
        return;
    }
    for conflict in [
        SpecialHandling::Fragile,
        SpecialHandling::TemperatureControlled,
    ] {
        if package.has(conflict) {
            report.error(
                RuleCode::IncompatibleSpecialHandling,
                "package.specialHandling",
                format!("hazmat shipments cannot also be {}", conflict.label()),
            );
        }
    }
}

fn check_declared_value(tx: &ShippingTransaction, report: &mut Report) {
    let package = &tx.shipment.package;
    let value = package.declared_value;
    let limits = package.package_type.limits();

    if value < MIN_DECLARED_VALUE {
        report.error(
            RuleCode::DeclaredValueTooLow,
            "package.declaredValue",
            format!("declared value must be at least {MIN_DECLARED_VALUE}"),
        );
    }
    if value > limits.max_declared_value {
        report.error(
            RuleCode::DeclaredValueExceeded,
            "package.declaredValue",
            format!(
                "declared value exceeds {} for this package type",
                limits.max_declared_value
            ),
        );
    }
    if tx.shipment.is_international() && value > INTERNATIONAL_VALUE_LIMIT {
        report.error(
            RuleCode::InternationalValueLimit,
            "package.declaredValue",
            format!("international shipments are limited to {INTERNATIONAL_VALUE_LIMIT} declared value"),
        );
    }
    if value > limits.unusual_value_threshold && value <= limits.max_declared_value {
        report.warn(
            RuleCode::UnusualDeclaredValue,
            "package.declaredValue",
            "declared value is unusually high for this package type",
        );
    }
}

fn check_packing_efficiency(tx: &ShippingTransaction, report: &mut Report) {
    let package = &tx.shipment.package;
    let actual = package.actual_weight_lbs();
    let dimensional = package.dimensional_weight_lbs();
    if dimensional > actual * DIM_WEIGHT_RATIO_HINT {
        report.warn(
            RuleCode::DimensionalWeightOptimization,
            "package.dimensions",
            format!(
                "billed at {} lbs dimensional weight against {} lbs actual; a smaller box would cost less",
                dimensional.round_dp(2),
                actual.round_dp(2)
            ),
        );
    }
}
