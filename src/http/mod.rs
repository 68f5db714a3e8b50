//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace layer)
//!     → request.rs (assign / keep request ID)
//!     → middleware/cors.rs (preflight answered here; CORS headers on the way out)
//!     → [routing table picks the pipeline]
//!     → [pipeline forwards and rewrites]
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod server;

pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
