use tabled::settings::object::Segment;
use tabled::settings::{Alignment, Modify, Style, Width};
use tabled::Table;

use crate::types::ReportRow;

/// Renders rows as a plain right-aligned table, wrapping cells wider than `max_cell_width`.
pub fn render_table(rows: &[ReportRow], max_cell_width: usize) -> String {
    Table::new(rows)
        .with(Style::psql())
        .with(Modify::new(Segment::all()).with(Width::wrap(max_cell_width)))
        .with(Modify::new(Segment::all()).with(Alignment::right()))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClusterConfig;

    fn row(pod: &str, df: &str, pct: u32) -> ReportRow {
        ReportRow {
            config: ClusterConfig::new("/root/.kube/sys/dev.yaml"),
            pod: pod.to_string(),
            df_output: df.to_string(),
            du_output: "1G /prometheus/".to_string(),
            use_percent: pct,
        }
    }

    #[test]
    fn test_render_headers_and_cells() {
        let text = render_table(&[row("prometheus-k8s-0", "10G 8G 2G 80% /prometheus", 80)], 60);
        assert!(text.contains("KUBECONFIG"));
        assert!(text.contains("POD"));
        assert!(text.contains("(Size   Used    Avail   Use%) df -h"));
        assert!(text.contains("du -sh /prometheus"));
        assert!(text.contains("/root/.kube/sys/dev.yaml"));
        assert!(text.contains("prometheus-k8s-0"));
        assert!(text.contains("10G 8G 2G 80% /prometheus"));
        // use_percent is not a column
        let header = text.lines().next().unwrap();
        assert_eq!(header.matches('|').count(), 3);
    }

    #[test]
    fn test_render_empty_keeps_header() {
        let text = render_table(&[], 60);
        assert!(text.contains("KUBECONFIG"));
        assert!(!text.contains("/root/.kube"));
    }

    #[test]
    fn test_render_wraps_long_cells() {
        let long_pod = "prometheus-k8s-".repeat(10);
        let text = render_table(&[row(&long_pod, "10G 8G 2G 80% /prometheus", 80)], 30);
        assert!(!text.contains(&long_pod));
        for line in text.lines().filter(|l| l.contains('|')) {
            for cell in line.split('|') {
                assert!(cell.trim().chars().count() <= 30, "cell too wide: {:?}", cell);
            }
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let rows = vec![
            row("prometheus-k8s-0", "10G 8G 2G 80% /prometheus", 80),
            row("prometheus-k8s-1", "10G 4G 6G 40% /prometheus", 40),
        ];
        assert_eq!(render_table(&rows, 60), render_table(&rows, 60));
    }
}
