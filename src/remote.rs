use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{AttachParams, AttachedProcess, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, ResourceExt};
use tokio::io::AsyncReadExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::types::ClusterConfig;

/// Remote operations against the cluster a kubeconfig points at.
#[async_trait]
pub trait RemoteCluster: Send + Sync {
    /// Names of all pods in `namespace`, in listing order.
    async fn list_pods(&self, config: &ClusterConfig, namespace: &str) -> Result<Vec<String>>;

    /// Runs `command` through `/bin/sh -c` inside `container` and returns its stdout.
    /// Fails with the captured stderr when the command exits non-zero.
    async fn exec(
        &self,
        config: &ClusterConfig,
        namespace: &str,
        pod: &str,
        container: &str,
        command: &str,
    ) -> Result<String>;
}

/// `RemoteCluster` backed by the Kubernetes API, one client per kubeconfig file.
#[derive(Default)]
pub struct KubeRemote {
    clients: Mutex<HashMap<ClusterConfig, Client>>,
}

impl KubeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    async fn client_for(&self, config: &ClusterConfig) -> Result<Client> {
        if let Some(client) = self.clients.lock().await.get(config) {
            return Ok(client.clone());
        }

        // Built without the lock held so a slow auth plugin only stalls its own cluster.
        let kubeconfig = Kubeconfig::read_from(config.path())
            .with_context(|| format!("read kubeconfig {}", config))?;
        let client_config = kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .with_context(|| format!("load kubeconfig {}", config))?;
        let client = Client::try_from(client_config)
            .with_context(|| format!("build client for {}", config))?;
        debug!("created client for {}", config);

        let mut clients = self.clients.lock().await;
        Ok(clients.entry(config.clone()).or_insert(client).clone())
    }
}

#[async_trait]
impl RemoteCluster for KubeRemote {
    async fn list_pods(&self, config: &ClusterConfig, namespace: &str) -> Result<Vec<String>> {
        let client = self.client_for(config).await?;
        let pod_api: Api<Pod> = Api::namespaced(client, namespace);
        let pods = pod_api
            .list(&ListParams::default())
            .await
            .with_context(|| format!("list pods in {} for kubeconfig {}", namespace, config))?;
        Ok(pods.items.iter().map(|p| p.name_any()).collect())
    }

    async fn exec(
        &self,
        config: &ClusterConfig,
        namespace: &str,
        pod: &str,
        container: &str,
        command: &str,
    ) -> Result<String> {
        let client = self.client_for(config).await?;
        let pod_api: Api<Pod> = Api::namespaced(client, namespace);
        let params = AttachParams::default()
            .container(container)
            .stdout(true)
            .stderr(true);
        let attached = pod_api
            .exec(pod, vec!["/bin/sh", "-c", command], &params)
            .await
            .with_context(|| format!("exec in {}/{} [{}]", namespace, pod, container))?;
        collect_output(attached).await
    }
}

async fn collect_output(mut attached: AttachedProcess) -> Result<String> {
    let status = attached.take_status();
    let mut stdout = String::new();
    let mut stderr = String::new();

    let out_stream = attached.stdout();
    let err_stream = attached.stderr();

    // Drain both streams together so a full stderr buffer cannot stall stdout.
    let read_out = async {
        match out_stream {
            Some(mut out) => out.read_to_string(&mut stdout).await.map(|_| ()),
            None => Ok(()),
        }
    };
    let read_err = async {
        match err_stream {
            Some(mut err) => err.read_to_string(&mut stderr).await.map(|_| ()),
            None => Ok(()),
        }
    };
    let (out_res, err_res) = tokio::join!(read_out, read_err);
    out_res.context("read exec stdout")?;
    err_res.context("read exec stderr")?;

    let status = match status {
        Some(fut) => fut.await,
        None => None,
    };
    attached.join().await.context("exec stream")?;

    match status {
        Some(s) if s.status.as_deref() != Some("Success") => Err(anyhow!(
            "command failed ({}): {}",
            s.message.or(s.reason).unwrap_or_else(|| "unknown".to_string()),
            stderr.trim()
        )),
        _ => Ok(stdout),
    }
}
