//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig
//!     → listener.rs (parse address, bind)
//!     → TcpListener handed to the HTTP server, which owns it
//!       until the accept loop stops on shutdown
//! ```

pub mod listener;

pub use listener::{bind, ListenerError};
