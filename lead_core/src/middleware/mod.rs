//! Middleware components for the lead intake server

pub mod cors;
pub mod logging;
pub mod rate_limit;
