//! The public facade over a viewer host

use std::sync::Arc;

use crate::config::Config;
use crate::host::ClmHost;

/// Awaitable adapter over a callback-based [`ClmHost`].
///
/// Holds no mutable state: every operation keeps its intermediate results
/// on its own stack, so clones can be used freely from UI code. The
/// operations themselves live next to their concerns (`navigation`,
/// `resolver`, `lookups`, `tracking`, `query`).
pub struct ClmClient<H> {
    host: Arc<H>,
    config: Arc<Config>,
}

impl<H: ClmHost> ClmClient<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, Config::default())
    }

    pub fn with_config(host: H, config: Config) -> Self {
        Self::from_shared(Arc::new(host), Arc::new(config))
    }

    pub fn from_shared(host: Arc<H>, config: Arc<Config>) -> Self {
        Self { host, config }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<H> Clone for ClmClient<H> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
            config: Arc::clone(&self.config),
        }
    }
}
