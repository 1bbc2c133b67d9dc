//! Repository URI construction.
//!
//! Query values are form-urlencoded, then `+` is rewritten to `%20` and
//! `%2F` back to `/` so path-like values stay forwardable as paths.
//! Keys are appended as given.

use url::form_urlencoded;

use crate::http::Params;

/// Build the request target: the path unchanged, then `?k=v&...` in param order.
pub fn build_uri(path: &str, params: &Params) -> String {
    if params.is_empty() {
        return path.to_string();
    }

    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, encode_param_value(value)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", path, query)
}

/// Percent-encode a single query value.
pub fn encode_param_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
        .replace("%2F", "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_no_params_returns_path_unchanged() {
        assert_eq!(build_uri("/content/page.html", &Params::default()), "/content/page.html");
        assert_eq!(build_uri("/a b", &Params::default()), "/a b");
    }

    #[test]
    fn test_space_and_slash_are_restored() {
        assert_eq!(encode_param_value("a b/c"), "a%20b/c");
    }

    #[test]
    fn test_literal_plus_stays_encoded() {
        assert_eq!(encode_param_value("1+1"), "1%2B1");
    }

    #[test]
    fn test_reserved_and_unicode_values() {
        assert_eq!(encode_param_value("x=y&z"), "x%3Dy%26z");
        assert_eq!(encode_param_value("grüße"), "gr%C3%BC%C3%9Fe");
        assert_eq!(encode_param_value("a-b_c.d*"), "a-b_c.d*");
    }

    #[test]
    fn test_query_keeps_param_order_and_raw_keys() {
        let uri = build_uri(
            "/content/page",
            &params(&[("query", "a b"), ("path", "/x/y"), ("k[]", "1")]),
        );
        assert_eq!(uri, "/content/page?query=a%20b&path=/x/y&k[]=1");
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(build_uri("/p", &params(&[("flag", "")])), "/p?flag=");
    }
}
