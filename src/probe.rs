use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::remote::RemoteCluster;
use crate::types::{PodRef, ProbeResult};

/// Kubeconfigs whose clusters report `/prometheus` without the filesystem column.
pub const SPECIAL_LAYOUT_CONFIGS: &[&str] = &[
    "/root/.kube/sys/putuo-pt-rke.yaml",
    "/root/.kube/sys/stage-rke.yaml",
    "/root/.kube/sys/z-prod-ack.yaml",
    "/root/.kube/sys/z-prod-tke.yaml",
];

pub const SPECIAL_DF_COMMAND: &str = "df -h | grep -w /prometheus | awk '{print $2, $3, $4, $5, $6}'";
pub const DEFAULT_DF_COMMAND: &str = "df -h | awk '{print $1, $2, $3, $4, $5, $6}' | grep -w /prometheus";
pub const DU_COMMAND: &str = "du -sh /prometheus/ | awk '{print $1, $2}'";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DfLayout {
    /// `df` filtered first, filesystem column dropped
    Special,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeCommands {
    pub layout: DfLayout,
    pub df: &'static str,
    pub du: &'static str,
}

impl ProbeCommands {
    pub fn for_config(config: &Path) -> Self {
        let special = SPECIAL_LAYOUT_CONFIGS
            .iter()
            .any(|p| Path::new(p) == config);
        if special {
            Self { layout: DfLayout::Special, df: SPECIAL_DF_COMMAND, du: DU_COMMAND }
        } else {
            Self { layout: DfLayout::Default, df: DEFAULT_DF_COMMAND, du: DU_COMMAND }
        }
    }
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("df failed on {pod}: {cause:#}")]
    DfFailed { pod: String, cause: anyhow::Error },
    #[error("du failed on {pod}: {cause:#}")]
    DuFailed { pod: String, cause: anyhow::Error },
    #[error("probe of {pod} timed out after {timeout:?}")]
    Timeout { pod: String, timeout: Duration },
}

/// Runs the df and du commands for one pod, each bounded by `timeout`.
///
/// A du failure or timeout still yields a result carrying the df output with an empty
/// du field; only a df failure or timeout makes the whole probe an error.
pub async fn probe_pod<R>(
    remote: &R,
    target: &PodRef,
    namespace: &str,
    container: &str,
    timeout: Duration,
) -> Result<ProbeResult, ProbeError>
where
    R: RemoteCluster + ?Sized,
{
    let commands = ProbeCommands::for_config(target.config.path());

    let df_output = match tokio::time::timeout(
        timeout,
        remote.exec(&target.config, namespace, &target.pod, container, commands.df),
    )
    .await
    {
        Ok(Ok(out)) => out,
        Ok(Err(cause)) => return Err(ProbeError::DfFailed { pod: target.pod.clone(), cause }),
        Err(_) => return Err(ProbeError::Timeout { pod: target.pod.clone(), timeout }),
    };

    let du_output = match tokio::time::timeout(
        timeout,
        remote.exec(&target.config, namespace, &target.pod, container, commands.du),
    )
    .await
    {
        Ok(Ok(out)) => out.trim().to_string(),
        Ok(Err(cause)) => {
            let err = ProbeError::DuFailed { pod: target.pod.clone(), cause };
            warn!("kubeconfig: {}, {}", target.config, err);
            String::new()
        }
        Err(_) => {
            let err = ProbeError::Timeout { pod: target.pod.clone(), timeout };
            warn!("kubeconfig: {}, du {}", target.config, err);
            String::new()
        }
    };

    Ok(ProbeResult {
        config: target.config.clone(),
        pod: target.pod.clone(),
        df_output,
        du_output,
    })
}
