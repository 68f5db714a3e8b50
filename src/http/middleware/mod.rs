//! Middleware applied before any pipeline runs.

pub mod cors;

pub use cors::cors_middleware;
