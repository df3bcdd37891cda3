use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tabled::Tabled;

#[derive(Debug, Clone)]
pub struct Config {
    pub webhook_url: String,
    pub kubeconfig_dir: PathBuf,
    pub config_extension: String,
    pub namespace: String,
    pub container: String,
    pub pod_prefixes: Vec<String>,
    pub probe_timeout: Duration,
    /// 0 disables the limit.
    pub max_concurrent_probes: usize,
    pub max_cell_width: usize,
    pub dry_run: bool,
}

/// One kubeconfig file, identifying a single cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterConfig(PathBuf);

impl ClusterConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ClusterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodRef {
    pub config: ClusterConfig,
    pub pod: String,
}

/// Raw outcome of one probe. An empty output means that command failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub config: ClusterConfig,
    pub pod: String,
    pub df_output: String,
    pub du_output: String,
}

impl ProbeResult {
    pub fn failed(target: PodRef) -> Self {
        Self {
            config: target.config,
            pod: target.pod,
            df_output: String::new(),
            du_output: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct ReportRow {
    #[tabled(rename = "KUBECONFIG")]
    pub config: ClusterConfig,
    #[tabled(rename = "POD")]
    pub pod: String,
    #[tabled(rename = "(Size   Used    Avail   Use%) df -h")]
    pub df_output: String,
    #[tabled(rename = "du -sh /prometheus")]
    pub du_output: String,
    #[tabled(skip)]
    pub use_percent: u32,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct WebhookText {
    pub content: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct WebhookPayload {
    pub msgtype: String,
    pub text: WebhookText,
}
