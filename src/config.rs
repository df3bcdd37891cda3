use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use crate::types::Config;

pub const DEFAULT_KUBECONFIG_DIR: &str = "/root/.kube/sys";
pub const DEFAULT_CONFIG_EXTENSION: &str = ".yaml";
pub const DEFAULT_NAMESPACE: &str = "monitoring";
pub const DEFAULT_CONTAINER: &str = "prometheus";
pub const DEFAULT_POD_PREFIXES: &[&str] = &["prometheus-k8s", "prometheus-istio"];

/// Trait for abstracting environment variable access
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production implementation using std::env
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mock implementation for testing
#[derive(Debug, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn set_var<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_var(key, value);
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn load_config() -> Result<Config> {
    load_config_with_env(&SystemEnvironment)
}

pub fn load_config_with_env<E: EnvironmentProvider>(env: &E) -> Result<Config> {
    let webhook_url = env.get_var("WEBHOOK_URL")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("WEBHOOK_URL must be provided via Secret env"))?;

    let kubeconfig_dir = env.get_var("KUBECONFIG_DIR")
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_KUBECONFIG_DIR));

    let config_extension = env.get_var("KUBECONFIG_EXTENSION")
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_CONFIG_EXTENSION.to_string());

    let namespace = env.get_var("TARGET_NAMESPACE")
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

    let container = env.get_var("TARGET_CONTAINER")
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_CONTAINER.to_string());

    let pod_prefixes: Vec<String> = match env.get_var("POD_PREFIXES") {
        Some(raw) => raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => DEFAULT_POD_PREFIXES.iter().map(|s| s.to_string()).collect(),
    };
    if pod_prefixes.is_empty() {
        return Err(anyhow!("POD_PREFIXES must name at least one prefix (comma-separated)"));
    }

    let probe_timeout_secs: u64 = env.get_var("PROBE_TIMEOUT_SECS")
        .unwrap_or_else(|| "60".to_string())
        .parse()
        .unwrap_or(60);

    let max_concurrent_probes: usize = env.get_var("MAX_CONCURRENT_PROBES")
        .unwrap_or_else(|| "32".to_string())
        .parse()
        .unwrap_or(32);

    let max_cell_width: usize = env.get_var("MAX_CELL_WIDTH")
        .unwrap_or_else(|| "60".to_string())
        .parse()
        .ok()
        .filter(|w| *w > 0)
        .unwrap_or(60);

    let dry_run = env.get_var("DRY_RUN")
        .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(false);

    Ok(Config {
        webhook_url,
        kubeconfig_dir,
        config_extension,
        namespace,
        container,
        pod_prefixes,
        probe_timeout: Duration::from_secs(probe_timeout_secs),
        max_concurrent_probes,
        max_cell_width,
        dry_run,
    })
}
