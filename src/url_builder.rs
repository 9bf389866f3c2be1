//! Request URL construction
//!
//! Path templates use `:name` placeholders, one per segment. Substituted
//! values are escaped as a single path segment (`/` becomes `%2F`), so a
//! value never adds path structure. Query values use form encoding (space
//! becomes `+`), empty values are dropped, and the reserved `at` parameter
//! must be a valid target date.

use crate::error::UrlError;
use crate::target_date::is_valid_target_date_format;
use std::collections::HashMap;
use url::Url;

/// Name of the point-in-time query parameter
pub const AT_PARAM: &str = "at";

/// Build an absolute request URL
///
/// Query parameters are emitted sorted by name, so identical inputs always
/// produce byte-identical URLs.
///
/// # Errors
///
/// - [`UrlError::InvalidBaseUrl`] if `base_url` does not parse or cannot carry a path
/// - [`UrlError::MissingPathParam`] if a template placeholder has no value
/// - [`UrlError::InvalidQueryParam`] if `at` is present, non-empty, and not a valid target date
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use infrahub_client::url_builder::build_url;
///
/// let url = build_url(
///     "https://api.example.com",
///     "/api/artifact/:id",
///     &HashMap::from([("id", "123")]),
///     &HashMap::from([("branch", "main"), ("at", "now-1h")]),
/// )
/// .unwrap();
/// assert_eq!(url, "https://api.example.com/api/artifact/123?at=now-1h&branch=main");
/// ```
pub fn build_url(
    base_url: &str,
    path_template: &str,
    path_params: &HashMap<&str, &str>,
    query_params: &HashMap<&str, &str>,
) -> Result<String, UrlError> {
    let mut url = Url::parse(base_url).map_err(|e| UrlError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(UrlError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: "URL cannot carry a path".to_string(),
        });
    }

    let path = expand_path(path_template, path_params)?;
    let prefix = url.path().trim_end_matches('/').to_string();
    url.set_path(&format!("{prefix}{path}"));

    let mut pairs: Vec<(&str, &str)> = query_params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (*key, *value))
        .collect();
    pairs.sort_unstable();

    for (key, value) in &pairs {
        if *key == AT_PARAM && !is_valid_target_date_format(value) {
            return Err(UrlError::InvalidQueryParam {
                name: (*key).to_string(),
                value: (*value).to_string(),
            });
        }
    }

    url.set_query(None);
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    url.set_fragment(None);

    Ok(url.into())
}

fn expand_path(template: &str, params: &HashMap<&str, &str>) -> Result<String, UrlError> {
    let segments = template
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => params
                .get(name)
                .map(|value| urlencoding::encode(value).into_owned())
                .ok_or_else(|| UrlError::MissingPathParam {
                    name: name.to_string(),
                    template: template.to_string(),
                }),
            None => Ok(segment.to_string()),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let path = segments.join("/");
    if path.is_empty() || path.starts_with('/') {
        Ok(path)
    } else {
        Ok(format!("/{path}"))
    }
}
