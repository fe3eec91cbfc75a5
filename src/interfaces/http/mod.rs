//! JSON API over axum. Every response, success or failure, is wrapped in
//! the same [`envelope::Envelope`].

pub mod envelope;
pub mod error;
pub mod handlers;
pub mod router;

pub use handlers::AppState;
pub use router::router;
