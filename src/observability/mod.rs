//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registries and harness produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty for humans, JSON for machines)
//!     → whichever metrics recorder the embedding process installs
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event, never preformatted strings
//! - Nothing is logged or recorded per lookup; only registration and harness runs
//! - Metrics go through the `metrics` facade; without a recorder they are no-ops

pub mod logging;
pub mod metrics;
