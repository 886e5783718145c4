//! Maintenance API routes.

pub mod health;
pub mod maintenance;

pub use health::health_routes;
pub use maintenance::{SweepResponse, maintenance_routes, sweep_expired_handler};
