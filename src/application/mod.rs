//! Application layer: payload schemas, business rules, pricing, pickup
//! scheduling and the `QuoteEngine` that orchestrates them over the domain
//! ports.

pub mod engine;
pub mod pickup;
pub mod pricing;
pub mod rules;
pub mod schema;
