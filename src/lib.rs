//! Quoting, validation, payment authorization and booking for B2B
//! shipments.
//!
//! The crate is laid out in layers: [`domain`] holds the data model and
//! ports, [`application`] the rules and calculators, [`infrastructure`] the
//! port adapters and [`interfaces`] the HTTP API and CSV output.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod telemetry;
