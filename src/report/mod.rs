use tracing::warn;

use crate::parsing::{parse_use_percent, trim_df_output};
use crate::types::{ProbeResult, ReportRow};

/// Ranked disk usage rows plus bookkeeping about what was dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskReport {
    pub rows: Vec<ReportRow>,
    pub summary: ReportSummary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub probed: usize,
    /// df or du output missing
    pub incomplete: usize,
    /// df output without a `N%` token
    pub unparseable: usize,
}

impl ReportSummary {
    pub fn reported(&self) -> usize {
        self.probed - self.incomplete - self.unparseable
    }
}

impl DiskReport {
    pub fn from_results(results: Vec<ProbeResult>) -> Self {
        let probed = results.len();
        let complete = results
            .iter()
            .filter(|r| !r.df_output.is_empty() && !r.du_output.is_empty())
            .count();
        let rows = aggregate(results);
        let summary = ReportSummary {
            probed,
            incomplete: probed - complete,
            unparseable: complete - rows.len(),
        };
        Self { rows: rank(rows), summary }
    }
}

/// Keeps results whose df and du outputs are both present, trimming df to its last
/// five fields. Rows without a use percentage are logged and dropped.
pub fn aggregate(results: Vec<ProbeResult>) -> Vec<ReportRow> {
    results
        .into_iter()
        .filter(|r| !r.df_output.is_empty() && !r.du_output.is_empty())
        .filter_map(|r| {
            let df_output = trim_df_output(&r.df_output);
            match parse_use_percent(&df_output) {
                Some(use_percent) => Some(ReportRow {
                    config: r.config,
                    pod: r.pod,
                    df_output,
                    du_output: r.du_output,
                    use_percent,
                }),
                None => {
                    warn!("kubeconfig: {}, pod {}: no use% in df output {:?}", r.config, r.pod, df_output);
                    None
                }
            }
        })
        .collect()
}

/// Sorts rows by descending use percentage; equal percentages keep their order.
pub fn rank(mut rows: Vec<ReportRow>) -> Vec<ReportRow> {
    rows.sort_by(|a, b| b.use_percent.cmp(&a.use_percent));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClusterConfig;

    fn result(pod: &str, df: &str, du: &str) -> ProbeResult {
        ProbeResult {
            config: ClusterConfig::new("/root/.kube/sys/dev.yaml"),
            pod: pod.to_string(),
            df_output: df.to_string(),
            du_output: du.to_string(),
        }
    }

    #[test]
    fn test_aggregate_drops_partial_failures() {
        let rows = aggregate(vec![
            result("ok", "/dev/sda1 10G 8G 2G 80% /prometheus", "500M /prometheus/"),
            result("no-du", "/dev/sda1 10G 8G 2G 80% /prometheus", ""),
            result("no-df", "", "500M /prometheus/"),
            result("dead", "", ""),
        ]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pod, "ok");
        assert_eq!(rows[0].df_output, "10G 8G 2G 80% /prometheus");
        assert_eq!(rows[0].use_percent, 80);
    }

    #[test]
    fn test_aggregate_drops_missing_percentage() {
        let rows = aggregate(vec![
            result("weird", "10G 8G 2G - /prometheus", "500M /prometheus/"),
            result("fine", "10G 1G 9G 10% /prometheus", "1G /prometheus/"),
        ]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pod, "fine");
    }

    #[test]
    fn test_rank_descending_and_stable() {
        let rows = aggregate(vec![
            result("a", "10G 4G 6G 40% /prometheus", "4G /prometheus/"),
            result("b", "10G 9G 1G 90% /prometheus", "9G /prometheus/"),
            result("c", "10G 4G 6G 40% /prometheus", "4G /prometheus/"),
            result("d", "10G 0G 10G 5% /prometheus", "1M /prometheus/"),
            result("e", "10G 10G 0G 100% /prometheus", "10G /prometheus/"),
        ]);
        let ranked = rank(rows);
        let pods: Vec<&str> = ranked.iter().map(|r| r.pod.as_str()).collect();
        assert_eq!(pods, vec!["e", "b", "a", "c", "d"]);

        for pair in ranked.windows(2) {
            assert!(pair[0].use_percent >= pair[1].use_percent);
        }
    }

    #[test]
    fn test_report_summary_counts() {
        let report = DiskReport::from_results(vec![
            result("a", "10G 4G 6G 40% /prometheus", "4G /prometheus/"),
            result("b", "10G 9G 1G 90% /prometheus", ""),
            result("c", "", ""),
            result("d", "garbage", "1M /prometheus/"),
        ]);
        assert_eq!(report.summary, ReportSummary { probed: 4, incomplete: 2, unparseable: 1 });
        assert_eq!(report.summary.reported(), 1);
        assert_eq!(report.rows.len(), 1);
    }

    #[test]
    fn test_trimmed_rows_have_at_most_five_fields() {
        let rows = aggregate(vec![
            result("long", "a b c d e f g h 70% /prometheus", "1G /prometheus/"),
            result("short", "2G 70% /prometheus", "1G /prometheus/"),
        ]);
        for row in rows {
            assert!(row.df_output.split_whitespace().count() <= 5);
        }
    }
}
