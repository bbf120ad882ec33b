//! Awaitable adapter between an embedded CLM presentation and the CRM
//! record store behind its viewer.
//!
//! The viewer's host API is callback-only ([`host::ClmHost`]). [`ClmClient`]
//! wraps it with slide navigation, document-reference resolution, record
//! queries, typed lookups and clickstream tracking.

pub mod bridge;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod host;
pub mod lookups;
pub mod navigation;
pub mod query;
pub mod resolver;
pub mod tracking;

pub use client::ClmClient;
pub use config::Config;
pub use envelope::{BrandEnvelope, KeyMessageEnvelope};
pub use error::{ClmError, Result};
pub use host::{ClmHost, HostCallback};
pub use navigation::{NavigationTarget, normalize_slide_name};
pub use query::{QueryOutcome, QueryRequest, Record};
pub use tracking::{ClickstreamEvent, TrackedAction};

use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber with the configured filter.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.runtime.log_level)
        .unwrap_or_else(|_| EnvFilter::new("clm_bridge=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
