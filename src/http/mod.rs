//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, graceful drain)
//!     → request.rs (request ID, query parameters)
//!     → middleware/ (in-flight tracking, request metrics)
//!     → handlers.rs (store access)
//!     → response.rs (JSON / text encoding, error mapping)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{ApiError, Message};
pub use server::{AppState, HttpServer, ServerError, ShutdownOutcome};
