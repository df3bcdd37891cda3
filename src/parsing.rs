/// Number of trailing `df` columns kept in a report row (size, used, avail, use%, mount).
pub const DF_KEPT_FIELDS: usize = 5;

/// Collapses `df` output to its last five whitespace-separated fields.
/// Output with four or fewer fields is only re-joined.
pub fn trim_df_output(raw: &str) -> String {
    let fields: Vec<&str> = raw.split_whitespace().collect();
    let start = if fields.len() > 4 {
        fields.len().saturating_sub(DF_KEPT_FIELDS)
    } else {
        0
    };
    fields[start..].join(" ")
}

/// Returns the integer of the first `<digits>%` occurrence, e.g. `80` for `"2G 80% /prometheus"`.
pub fn parse_use_percent(s: &str) -> Option<u32> {
    let bytes = s.as_bytes();
    for (idx, b) in bytes.iter().enumerate() {
        if *b != b'%' {
            continue;
        }
        let digits_start = bytes[..idx]
            .iter()
            .rposition(|c| !c.is_ascii_digit())
            .map(|p| p + 1)
            .unwrap_or(0);
        if digits_start < idx {
            // digits are ASCII, so slicing on these byte offsets is safe
            return s[digits_start..idx].parse().ok();
        }
    }
    None
}

pub fn matches_pod_prefix(pod: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| pod.starts_with(p.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_df_output() {
        // Default layout prints the filesystem column too
        assert_eq!(
            trim_df_output("/dev/sda1 10G 8G 2G 80% /prometheus\n"),
            "10G 8G 2G 80% /prometheus"
        );
        // Already five fields
        assert_eq!(trim_df_output("10G 8G 2G 80% /prometheus"), "10G 8G 2G 80% /prometheus");
        // Collapses irregular spacing
        assert_eq!(trim_df_output("  10G\t8G   2G 80%  /prometheus "), "10G 8G 2G 80% /prometheus");
        // Four or fewer fields are kept whole
        assert_eq!(trim_df_output("8G 2G 80% /prometheus"), "8G 2G 80% /prometheus");
        assert_eq!(trim_df_output(""), "");
    }

    #[test]
    fn test_trim_df_output_noisy() {
        let noisy = "overlay 50G 1G 49G 2% / /dev/vdb 100G 91G 9G 91% /prometheus";
        assert_eq!(trim_df_output(noisy), "100G 91G 9G 91% /prometheus");
    }

    #[test]
    fn test_parse_use_percent() {
        assert_eq!(parse_use_percent("10G 8G 2G 80% /prometheus"), Some(80));
        assert_eq!(parse_use_percent("100%"), Some(100));
        assert_eq!(parse_use_percent("0% used"), Some(0));
        // first occurrence wins
        assert_eq!(parse_use_percent("5% then 90%"), Some(5));
        // digits glued to other text still count
        assert_eq!(parse_use_percent("use=42%"), Some(42));
    }

    #[test]
    fn test_parse_use_percent_missing() {
        assert_eq!(parse_use_percent(""), None);
        assert_eq!(parse_use_percent("10G 8G 2G - /prometheus"), None);
        assert_eq!(parse_use_percent("% alone"), None);
        assert_eq!(parse_use_percent("abc%"), None);
    }

    #[test]
    fn test_parse_use_percent_skips_bare_sign() {
        assert_eq!(parse_use_percent("% then 33%"), Some(33));
    }

    #[test]
    fn test_matches_pod_prefix() {
        let prefixes = vec!["prometheus-k8s".to_string(), "prometheus-istio".to_string()];
        assert!(matches_pod_prefix("prometheus-k8s-0", &prefixes));
        assert!(matches_pod_prefix("prometheus-istio-1", &prefixes));
        assert!(!matches_pod_prefix("grafana-5d9c", &prefixes));
        assert!(!matches_pod_prefix("my-prometheus-k8s-0", &prefixes));
        assert!(!matches_pod_prefix("", &prefixes));
    }
}
