// Public modules
pub mod types;
pub mod config;
pub mod parsing;
pub mod remote;
pub mod discovery;
pub mod probe;
pub mod collector;
pub mod report;
pub mod render;
pub mod webhook;

// Re-export commonly used items
pub use types::*;
pub use config::{load_config, load_config_with_env, EnvironmentProvider, SystemEnvironment, MockEnvironment};
pub use parsing::{trim_df_output, parse_use_percent, matches_pod_prefix};
pub use remote::{RemoteCluster, KubeRemote};
pub use discovery::{discover_kubeconfigs, discover_pods};
pub use probe::{probe_pod, ProbeCommands, ProbeError};
pub use collector::DiskUsageCollector;
pub use report::{aggregate, rank, DiskReport, ReportSummary};
pub use render::render_table;
pub use webhook::{build_webhook_payload, send_to_webhook, deliver};
