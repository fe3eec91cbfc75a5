//! Domain types for the quote-and-book flow and the ports the application
//! layer depends on.

pub mod address;
pub mod package;
pub mod payment;
pub mod pickup;
pub mod ports;
pub mod pricing;
pub mod shipment;
pub mod transaction;
