use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use prom_disk_reporter::{load_config, render_table, webhook, DiskReport, DiskUsageCollector, KubeRemote};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cfg = load_config()?;
    info!(
        "kubeconfig dir = {}, namespace = {}, prefixes = {:?}",
        cfg.kubeconfig_dir.display(),
        cfg.namespace,
        cfg.pod_prefixes
    );

    let collector = DiskUsageCollector::new(Arc::new(KubeRemote::new()), cfg.clone());
    let results = collector.collect().await;

    let report = DiskReport::from_results(results);
    let summary = report.summary;
    info!(
        "probed {} pods: {} reported, {} incomplete, {} without use%",
        summary.probed,
        summary.reported(),
        summary.incomplete,
        summary.unparseable
    );

    // stdout is the fallback channel when delivery fails
    let table = render_table(&report.rows, cfg.max_cell_width);
    println!("{}", table);

    if cfg.dry_run {
        info!("DRY_RUN set, skipping webhook delivery");
    } else {
        webhook::deliver(&cfg.webhook_url, &table).await;
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
