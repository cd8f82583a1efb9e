//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, error translation and the upstream client produce:
//!     → logging.rs (structured log events, request spans)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
