//! Listening-port discovery for porttop.
//!
//! [`PortPipeline`] scans listening TCP sockets with `lsof`, enriches each record
//! with a service classification, process usage and an optional user label, and
//! can force-kill whatever listens on a port.

pub mod classify;
pub mod config;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod labels;
pub mod pipeline;
pub mod runner;
pub mod scanner;
pub mod terminate;
pub mod types;
pub mod usage;

pub use classify::{classify, ServiceKind};
pub use config::CoreConfig;
pub use error::{CommandError, LabelError, ScanError, TerminateError};
pub use filter::{type_counts, PortFilter};
pub use labels::LabelStore;
pub use pipeline::PortPipeline;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use types::{local_url, EnrichedPort, PortRecord, ResourceUsage, Snapshot};
pub use usage::{format_memory, UsageSource};
