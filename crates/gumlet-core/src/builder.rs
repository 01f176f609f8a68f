//! Gumlet URL builder.
//!
//! Rewrites an asset URL onto the configured Gumlet domain and appends the
//! transform as Gumlet query parameters. Never fails: whenever the config
//! or the input is insufficient, the original URL comes back unchanged.

use url::Url;

use crate::config::GumletConfig;
use crate::params::{ParamValue, QueryParams};
use crate::transform::TransformDescriptor;

/// Builds the Gumlet URL for `original_url`.
///
/// Parameters derived from `descriptor` are merged under
/// `additional_params` (caller keys win), then `q` and `f` fall back to the
/// configured defaults. Null and empty values are dropped. With nothing
/// left to send, the rewritten URL is returned without a query string.
///
/// # Examples
///
/// ```
/// use gumlet_core::{build_url, GumletConfig, QueryParams, TransformDescriptor};
///
/// let cfg = GumletConfig::for_domain("site.gumlet.io");
/// let d = TransformDescriptor { width: Some(300), ..Default::default() };
/// assert_eq!(
///     build_url("https://cdn.example.com/a.jpg", Some(&d), &cfg, &QueryParams::new()),
///     "https://site.gumlet.io/a.jpg?w=300&q=80"
/// );
/// ```
pub fn build_url(
    original_url: &str,
    descriptor: Option<&TransformDescriptor>,
    config: &GumletConfig,
    additional_params: &QueryParams,
) -> String {
    if !config.enabled {
        tracing::debug!(url = original_url, "gumlet disabled, passing url through");
        return original_url.to_string();
    }

    let domain = config.normalized_domain();
    if domain.is_empty() {
        tracing::debug!(url = original_url, "no gumlet domain configured, passing url through");
        return original_url.to_string();
    }

    let base_url = if original_url.contains(domain.as_str()) {
        original_url.to_string()
    } else {
        match replace_base_url(original_url, &domain) {
            Some(rewritten) => rewritten,
            None => {
                tracing::debug!(url = original_url, "url has no host, passing through");
                return original_url.to_string();
            }
        }
    };

    let mut params = descriptor
        .map(|d| d.to_params(config.emit_geometry))
        .unwrap_or_default();
    params.merge(additional_params);

    if !params.is_set("q") {
        params.set("q", config.default_quality);
    }
    if !params.is_set("f") && config.default_format != "auto" {
        params.set("f", ParamValue::Str(config.default_format.clone()));
    }

    params.retain_non_blank();

    if params.is_empty() {
        return base_url;
    }
    append_query(&base_url, &params.to_query_string())
}

/// Replaces the host of `url` with `domain`.
///
/// Path, query and fragment are copied byte for byte from `url` (no
/// re-encoding, no dot-segment removal); port and userinfo are dropped.
/// Protocol-relative URLs (`//host/path`) get `https`. Returns `None` when
/// `url` isn't absolute or has no host.
pub fn replace_base_url(url: &str, domain: &str) -> Option<String> {
    let (scheme, after_scheme) = match url.strip_prefix("//") {
        Some(rest) => {
            Url::parse(&format!("https://{rest}")).ok()?.host_str()?;
            ("https", rest)
        }
        None => {
            let parsed = Url::parse(url).ok()?;
            parsed.host_str()?;
            let (scheme, rest) = url.split_once("://")?;
            if !scheme.eq_ignore_ascii_case(parsed.scheme()) {
                return None;
            }
            (scheme, rest)
        }
    };

    // Authority runs up to the first path, query or fragment delimiter.
    let authority_end = after_scheme
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(after_scheme.len());
    let remainder = &after_scheme[authority_end..];

    let (path_and_query, fragment) = remainder.split_once('#').unwrap_or((remainder, ""));
    let (path, query) = path_and_query.split_once('?').unwrap_or((path_and_query, ""));
    let path = if path.is_empty() { "/" } else { path };

    let mut out = format!("{scheme}://{domain}{path}");
    if !query.is_empty() {
        out.push('?');
        out.push_str(query);
    }
    if !fragment.is_empty() {
        out.push('#');
        out.push_str(fragment);
    }
    Some(out)
}

/// Appends an encoded query to `base`, before any fragment.
///
/// Unlike a plain string append, this keeps the result a well-formed URL:
/// text after `#` never reaches the CDN, and a dangling `?`/`&` needs no
/// second separator.
fn append_query(base: &str, query: &str) -> String {
    let (head, fragment) = match base.find('#') {
        Some(idx) => base.split_at(idx),
        None => (base, ""),
    };
    let separator = if head.ends_with('?') || head.ends_with('&') {
        ""
    } else if head.contains('?') {
        "&"
    } else {
        "?"
    };
    format!("{head}{separator}{query}{fragment}")
}
