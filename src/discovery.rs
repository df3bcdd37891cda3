use std::path::Path;

use anyhow::Result;
use tracing::error;
use walkdir::WalkDir;

use crate::parsing::matches_pod_prefix;
use crate::remote::RemoteCluster;
use crate::types::{ClusterConfig, Config};

/// Recursively collects every regular file under `dir` whose name ends with `extension`.
///
/// Unreadable entries (including the root itself) are logged and skipped, so a broken
/// subtree never hides the clusters that could be read. Results are sorted by path.
pub fn discover_kubeconfigs(dir: &Path, extension: &str) -> Vec<ClusterConfig> {
    let mut configs = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                error!("failed to walk {}: {}", dir.display(), err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(extension) {
            configs.push(ClusterConfig::new(entry.into_path()));
        }
    }
    configs.sort();
    configs
}

/// Lists the pods of `config` in the target namespace and keeps those matching a known prefix.
pub async fn discover_pods<R>(remote: &R, config: &ClusterConfig, cfg: &Config) -> Result<Vec<String>>
where
    R: RemoteCluster + ?Sized,
{
    let pods = remote.list_pods(config, &cfg.namespace).await?;
    Ok(pods
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| matches_pod_prefix(p, &cfg.pod_prefixes))
        .collect())
}
