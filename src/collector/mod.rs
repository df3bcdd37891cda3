use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tracing::{error, info, warn};

use crate::discovery::{discover_kubeconfigs, discover_pods};
use crate::probe::probe_pod;
use crate::remote::RemoteCluster;
use crate::types::{ClusterConfig, Config, PodRef, ProbeResult};

pub const RESULT_CHANNEL_CAPACITY: usize = 100;

/// Fans one probe task out per discovered pod and gathers every outcome.
pub struct DiskUsageCollector<R: RemoteCluster + 'static> {
    remote: Arc<R>,
    config: Arc<Config>,
}

impl<R: RemoteCluster + 'static> DiskUsageCollector<R> {
    pub fn new(remote: Arc<R>, config: Config) -> Self {
        Self { remote, config: Arc::new(config) }
    }

    /// Walks the kubeconfig directory and probes every matching pod it finds.
    pub async fn collect(&self) -> Vec<ProbeResult> {
        let configs = discover_kubeconfigs(&self.config.kubeconfig_dir, &self.config.config_extension);
        info!("discovered {} kubeconfigs under {}", configs.len(), self.config.kubeconfig_dir.display());
        self.collect_from(&configs).await
    }

    /// Probes the pods of the given clusters. Every launched probe contributes exactly one
    /// result; failed probes come back with empty outputs.
    pub async fn collect_from(&self, configs: &[ClusterConfig]) -> Vec<ProbeResult> {
        let (tx, mut rx) = mpsc::channel::<ProbeResult>(RESULT_CHANNEL_CAPACITY);
        let limiter = match self.config.max_concurrent_probes {
            0 => None,
            n => Some(Arc::new(Semaphore::new(n))),
        };

        let mut launched = 0usize;
        for config in configs {
            let listing = tokio::time::timeout(
                self.config.probe_timeout,
                discover_pods(self.remote.as_ref(), config, &self.config),
            )
            .await;
            let pods = match listing {
                Ok(Ok(pods)) => pods,
                Ok(Err(err)) => {
                    error!("failed to list pods, kubeconfig: {}: {:#}", config, err);
                    continue;
                }
                Err(_) => {
                    error!(
                        "failed to list pods, kubeconfig: {}: timed out after {:?}",
                        config, self.config.probe_timeout
                    );
                    continue;
                }
            };
            for pod in pods {
                let target = PodRef { config: config.clone(), pod };
                tokio::spawn(run_probe(
                    self.remote.clone(),
                    self.config.clone(),
                    limiter.clone(),
                    target,
                    tx.clone(),
                ));
                launched += 1;
            }
        }
        info!("launched {} probes", launched);

        // The channel closes once the last task drops its sender.
        drop(tx);
        let mut results = Vec::with_capacity(launched);
        while let Some(result) = rx.recv().await {
            results.push(result);
        }
        if results.len() != launched {
            warn!("{} of {} probes ended without a result", launched - results.len(), launched);
        }
        results
    }
}

async fn run_probe<R: RemoteCluster + 'static>(
    remote: Arc<R>,
    config: Arc<Config>,
    limiter: Option<Arc<Semaphore>>,
    target: PodRef,
    tx: mpsc::Sender<ProbeResult>,
) {
    // Held until the probe finishes; the semaphore is never closed.
    let _permit = match limiter {
        Some(sem) => sem.acquire_owned().await.ok(),
        None => None,
    };

    let result = match probe_pod(
        remote.as_ref(),
        &target,
        &config.namespace,
        &config.container,
        config.probe_timeout,
    )
    .await
    {
        Ok(result) => result,
        Err(err) => {
            error!("kubeconfig: {}, failed to get disk usage: {}", target.config, err);
            ProbeResult::failed(target)
        }
    };

    if tx.send(result).await.is_err() {
        error!("result channel closed before probe finished");
    }
}
