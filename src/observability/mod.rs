//! Observability subsystem
//!
//! Structured logging through `tracing`. Library code only emits events;
//! installing a subscriber is up to the binary (see [`init_logging`]).
//!
//! # Usage
//!
//! ```ignore
//! use tagpack::observability::{init_logging, Event};
//!
//! init_logging(1);
//! tracing::info!(event = %Event::ConfigLoaded, path = "config.yaml", "Configuration loaded");
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{default_directive, init_logging, LOG_ENV};
