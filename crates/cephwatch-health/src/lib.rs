//! cephwatch-health — turns two monitor queries into one health report.
//!
//! `HealthChecker::check` runs the status query, inspects the OSD
//! counters, and only when they show degradation fetches the osd tree
//! and reconciles it into a deduplicated unhealthy-OSD list:
//!
//! ```text
//! check(config)
//!   ├── status query ──────────── counters healthy? → report, done
//!   └── degraded:
//!       ├── osd tree query
//!       ├── HostIndex (osd id → owning host)
//!       └── unhealthy_devices → report.details
//! ```
//!
//! Each check is stateless and request-scoped; nothing is cached
//! between invocations.

pub mod checker;
pub mod detect;
pub mod error;

pub use checker::HealthChecker;
pub use detect::{unhealthy_devices, HostIndex};
pub use error::HealthError;
