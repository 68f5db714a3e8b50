//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (route lookup)
//!     → matcher.rs (evaluate match conditions)
//!     → Return: matched Route (with its pipeline) or NoMatch
//!
//! Route Compilation (at startup):
//!     table.rs console_routes(prefixes)
//!     → bind each entry to its built pipeline
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (table order)

pub mod matcher;
pub mod router;
pub mod table;

pub use router::{Route, Router};
pub use table::{console_routes, RouteEntry};
