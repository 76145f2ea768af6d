//! Inbound command boundary
//!
//! `weight_commands` turns raw request parameters into a status code and a
//! response body; `http_routes` exposes it over axum.

pub mod http_routes;
pub mod weight_commands;

pub use http_routes::router;
pub use weight_commands::{AppState, CommandResponse, resolve_part_weight};
