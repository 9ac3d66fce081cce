//! Query parameter projection.

use std::collections::BTreeMap;

use crate::echo::body::check_escapes;
use crate::echo::headers::Folded;

pub type Params = BTreeMap<String, Folded>;

/// Decode a raw query string into folded, key-sorted parameters.
///
/// Malformed pairs are skipped: those containing `;` and those with a `%`
/// that does not start a two-digit hex escape.
pub fn query_params(raw_query: Option<&str>) -> Params {
    let mut collected: BTreeMap<String, Vec<String>> = BTreeMap::new();

    let Some(raw_query) = raw_query else {
        return Params::new();
    };

    let well_formed = raw_query
        .split('&')
        .filter(|pair| !pair.contains(';') && check_escapes(pair.as_bytes()).is_ok());

    for pair in well_formed {
        for (key, value) in ::url::form_urlencoded::parse(pair.as_bytes()) {
            collected
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
    }

    collected
        .into_iter()
        .map(|(key, values)| (key, Folded::from_values(values)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_empty_query_has_no_params() {
        assert!(query_params(None).is_empty());
        assert!(query_params(Some("")).is_empty());
    }

    #[test]
    fn folds_repeated_keys() {
        let params = query_params(Some("a=1&b=two&a=3"));
        assert_eq!(params["a"], Folded::Multiple(vec!["1".into(), "3".into()]));
        assert_eq!(params["b"], Folded::Single("two".into()));
    }

    #[test]
    fn decodes_escapes() {
        let params = query_params(Some("q=hello+world&path=%2Ftmp"));
        assert_eq!(params["q"], Folded::Single("hello world".into()));
        assert_eq!(params["path"], Folded::Single("/tmp".into()));
    }

    #[test]
    fn bare_key_has_empty_value() {
        let params = query_params(Some("flag"));
        assert_eq!(params["flag"], Folded::Single(String::new()));
    }

    #[test]
    fn semicolon_pairs_are_dropped() {
        let params = query_params(Some("a=1;b=2&c=3"));
        assert_eq!(params.len(), 1);
        assert_eq!(params["c"], Folded::Single("3".into()));
    }

    #[test]
    fn bad_escape_pairs_are_dropped() {
        let params = query_params(Some("a=%zz&b=1&c%4=2&d=%41"));
        assert_eq!(params.len(), 2);
        assert_eq!(params["b"], Folded::Single("1".into()));
        assert_eq!(params["d"], Folded::Single("A".into()));
    }
}
