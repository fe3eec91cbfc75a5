#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shipquote::application::engine::QuoteEngine;
use shipquote::application::pricing::PricingCalculator;
use shipquote::domain::address::{Address, ContactInfo, CountryCode};
use shipquote::domain::package::{DimensionUnit, Dimensions, PackageInfo, PackageType, Weight};
use shipquote::domain::payment::{CorporateAccountDetails, PaymentInfo, PurchaseOrderDetails};
use shipquote::domain::pickup::{PickupDetails, TimeSlot};
use shipquote::domain::pricing::{PricingOption, ServiceCategory};
use shipquote::domain::shipment::{DeliveryPreferences, ShipmentDetails};
use shipquote::domain::transaction::ShippingTransaction;
use shipquote::infrastructure::clock::FixedClock;
use shipquote::infrastructure::gateway::FixedAuthorizationProvider;
use shipquote::infrastructure::in_memory::InMemoryShipmentStore;

/// Monday morning; every fixture date is relative to it.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn address(street: &str, city: &str, state: &str, zip: &str, country: &str) -> Address {
    Address {
        address: street.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        zip: zip.to_string(),
        country: CountryCode::new(country),
        contact_info: ContactInfo {
            name: "Jordan Blake".to_string(),
            company: Some("Blake Fabrication".to_string()),
            phone: "312-555-0142".to_string(),
            email: "jordan@blakefab.example".to_string(),
            extension: None,
        },
        ..Default::default()
    }
}

pub fn chicago() -> Address {
    address("233 S Wacker Dr", "Chicago", "IL", "60606", "US")
}

pub fn springfield() -> Address {
    address("1 Capitol Ave", "Springfield", "IL", "62701", "US")
}

pub fn toronto() -> Address {
    address("100 King St W", "Toronto", "ON", "M5H 1J9", "CA")
}

pub fn package() -> PackageInfo {
    PackageInfo {
        package_type: PackageType::Medium,
        weight: Weight::lbs(dec!(20)),
        dimensions: Dimensions::inches(dec!(12), dec!(12), dec!(12)),
        declared_value: dec!(500),
        currency: "USD".to_string(),
        contents: Some("machined brackets".to_string()),
        special_handling: Default::default(),
    }
}

/// A light but bulky box: dimensional weight far above actual weight.
pub fn bulky_package() -> PackageInfo {
    PackageInfo {
        weight: Weight::lbs(dec!(5)),
        dimensions: Dimensions {
            length: dec!(36),
            width: dec!(24),
            height: dec!(24),
            unit: DimensionUnit::In,
        },
        ..package()
    }
}

pub fn shipment() -> ShipmentDetails {
    ShipmentDetails {
        origin: chicago(),
        destination: springfield(),
        package: package(),
        delivery_preferences: DeliveryPreferences::default(),
    }
}

pub fn cheapest(shipment: &ShipmentDetails, category: ServiceCategory) -> PricingOption {
    let quotes = PricingCalculator::calculate(shipment, now())
        .unwrap()
        .quotes;
    let options = match category {
        ServiceCategory::Ground => quotes.ground,
        ServiceCategory::Air => quotes.air,
        ServiceCategory::Freight => quotes.freight,
    };
    options
        .into_iter()
        .min_by_key(|option| option.total())
        .unwrap()
}

pub fn purchase_order(amount: Decimal) -> PaymentInfo {
    PaymentInfo::Po(PurchaseOrderDetails {
        po_number: "PO-778812".to_string(),
        po_amount: amount,
        expiration_date: date(2026, 12, 31),
        approval_contact: "Dana Ruiz".to_string(),
        department: Some("Procurement".to_string()),
    })
}

pub fn corporate_account() -> PaymentInfo {
    PaymentInfo::Corporate(CorporateAccountDetails {
        account_number: "CORP-4410092".to_string(),
        account_pin: "2718".to_string(),
        billing_contact: "Accounts Payable".to_string(),
    })
}

/// Wednesday morning, 47 hours after [`now`].
pub fn pickup() -> PickupDetails {
    PickupDetails {
        date: date(2026, 3, 4),
        time_slot: TimeSlot::new("morning", "Morning (8 AM - 12 PM)", (8, 0), (12, 0)).unwrap(),
        instructions: Some("Dock 4".to_string()),
        contact_name: "Sam Ortiz".to_string(),
        contact_phone: "312-555-0199".to_string(),
        access_requirements: vec![],
        equipment_available: vec!["forklift".to_string()],
    }
}

/// A transaction with every booking step filled in and no rule broken.
pub fn ready_transaction() -> ShippingTransaction {
    let shipment = shipment();
    let option = cheapest(&shipment, ServiceCategory::Ground);
    let mut tx = ShippingTransaction::new("tx-1001", shipment, now());
    tx.selected_option = Some(option);
    tx.payment_info = Some(purchase_order(dec!(10000)));
    tx.pickup = Some(pickup());
    tx
}

pub fn engine_with(provider: FixedAuthorizationProvider) -> QuoteEngine {
    QuoteEngine::new(
        Box::new(provider),
        Box::new(InMemoryShipmentStore::new()),
        Box::new(FixedClock(now())),
    )
}
