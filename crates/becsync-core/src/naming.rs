// ── Device name handling ──
//
// BECS holds short names; NetBox holds fully-qualified ones. A name
// containing any dot is taken as already qualified and left alone.

/// Qualify `name` with the default domain unless it already has one.
pub fn fqdn(name: &str, default_domain: &str) -> String {
    if name.contains('.') || default_domain.is_empty() {
        name.to_owned()
    } else {
        format!("{name}.{default_domain}")
    }
}

/// Split a comma-separated name list, trimming whitespace and dropping
/// empty entries; each bare name is qualified with `default_domain`.
pub fn commastr_to_list(names: &str, default_domain: &str) -> Vec<String> {
    names
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| fqdn(n, default_domain))
        .collect()
}

/// Inverse of `commastr_to_list`, for writing back to NetBox.
pub fn list_to_commastr(names: &[String]) -> String {
    names.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fqdn_leaves_qualified_names_alone() {
        assert_eq!(fqdn("sw1", "example.com"), "sw1.example.com");
        assert_eq!(fqdn("sw1.example.net", "example.com"), "sw1.example.net");
        assert_eq!(fqdn("sw1", ""), "sw1");
    }

    #[test]
    fn commastr_splits_trims_and_qualifies() {
        assert_eq!(
            commastr_to_list("dist1, dist2.example.net,,", "example.com"),
            vec!["dist1.example.com".to_owned(), "dist2.example.net".to_owned()]
        );
        assert!(commastr_to_list("", "example.com").is_empty());
    }
}
