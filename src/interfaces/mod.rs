//! Outer adapters: the JSON HTTP API and the CSV rate-table output used by
//! the command-line tool.

pub mod csv;
pub mod http;
