use std::sync::Arc;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusHandle;

use super::config::ServerConfig;
use crate::registry::ModelRegistry;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Loaded models, read-only for the life of the process
    pub registry: Arc<ModelRegistry>,

    /// Prometheus renderer, present when metrics are enabled
    pub metrics: Option<PrometheusHandle>,

    started_at: Instant,
}

impl ServerState {
    pub fn new(config: ServerConfig, registry: Arc<ModelRegistry>) -> Self {
        Self {
            config: Arc::new(config),
            registry,
            metrics: None,
            started_at: Instant::now(),
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
