#![forbid(unsafe_code)]

//! Manifest rewriting.
//!
//! Works line-by-line with extension and line-content heuristics rather
//! than a full playlist parser: only URL fields are touched, every other
//! byte of the manifest (tags, attributes, line endings) passes through
//! unchanged.

use url::Url;

use crate::{
    error::{InterceptError, InterceptResult},
    options::InterceptorOptions,
};

const STREAM_INF_TAG: &str = "#EXT-X-STREAM-INF";
const KEY_TAG: &str = "#EXT-X-KEY";

/// Replace a URL's scheme, allowing swaps between special and
/// non-special schemes the `url` crate's `set_scheme` refuses.
pub fn swap_scheme(url: &Url, scheme: &str) -> InterceptResult<Url> {
    let rest = url
        .as_str()
        .strip_prefix(url.scheme())
        .and_then(|rest| rest.strip_prefix(':'))
        .ok_or_else(|| InterceptError::InvalidUrl(url.to_string()))?;
    Url::parse(&format!("{scheme}:{rest}"))
        .map_err(|err| InterceptError::InvalidUrl(format!("{url}: {err}")))
}

/// A variant playlist lists further playlists; anything else is treated
/// as a media playlist.
#[must_use]
pub fn is_variant_playlist(body: &str) -> bool {
    body.lines().any(|line| line.starts_with(STREAM_INF_TAG))
}

/// Rewrite a manifest fetched for `request_url` (the private-scheme URL
/// the item layer asked for).
///
/// Variant playlists keep the private scheme on every nested playlist
/// reference so those loads are intercepted again. Media playlists get
/// real transport URLs for segments, and relative key references are
/// routed back through the private scheme so the key fetch is
/// intercepted too.
pub fn rewrite_manifest(
    body: &str,
    request_url: &Url,
    options: &InterceptorOptions,
) -> InterceptResult<String> {
    if is_variant_playlist(body) {
        rewrite_variant_playlist(body, request_url)
    } else {
        rewrite_media_playlist(body, request_url, options)
    }
}

/// Absolutize every nested playlist reference against the manifest's own
/// base, preserving its (private) scheme.
pub fn rewrite_variant_playlist(body: &str, base: &Url) -> InterceptResult<String> {
    map_lines(body, |line| {
        if line.trim().is_empty() || line.starts_with('#') {
            return Ok(line.to_string());
        }
        absolutize(base, line)
    })
}

/// Absolutize segment references against the real transport base and
/// route relative key references back through the private scheme.
pub fn rewrite_media_playlist(
    body: &str,
    base: &Url,
    options: &InterceptorOptions,
) -> InterceptResult<String> {
    let transport_base = swap_scheme(base, &options.transport_scheme)?;
    map_lines(body, |line| {
        if line.starts_with(KEY_TAG) {
            return rewrite_key_line(line, base);
        }
        if line.trim().is_empty() || line.starts_with('#') {
            return Ok(line.to_string());
        }
        absolutize(&transport_base, line)
    })
}

fn absolutize(base: &Url, reference: &str) -> InterceptResult<String> {
    if is_absolute(reference) {
        return Ok(reference.to_string());
    }
    base.join(reference)
        .map(|url| url.to_string())
        .map_err(|err| InterceptError::InvalidUrl(format!("{reference}: {err}")))
}

fn is_absolute(reference: &str) -> bool {
    Url::parse(reference).is_ok()
}

/// Rewrite the `URI="…"` attribute of a key tag when the reference is
/// relative. Absolute key references stay as the author wrote them.
fn rewrite_key_line(line: &str, base: &Url) -> InterceptResult<String> {
    let Some(attr_start) = line.find("URI=\"") else {
        return Ok(line.to_string());
    };
    let value_start = attr_start + "URI=\"".len();
    let Some(value_len) = line[value_start..].find('"') else {
        return Ok(line.to_string());
    };
    let value = &line[value_start..value_start + value_len];
    if is_absolute(value) {
        return Ok(line.to_string());
    }
    let absolute = absolutize(base, value)?;
    Ok(format!(
        "{}{}{}",
        &line[..value_start],
        absolute,
        &line[value_start + value_len..]
    ))
}

/// Apply `f` to every line, preserving `\r\n` endings and the presence
/// or absence of a trailing newline.
fn map_lines(
    body: &str,
    f: impl Fn(&str) -> InterceptResult<String>,
) -> InterceptResult<String> {
    let mut out = Vec::new();
    for line in body.split('\n') {
        if let Some(stripped) = line.strip_suffix('\r') {
            out.push(format!("{}\r", f(stripped)?));
        } else {
            out.push(f(line)?);
        }
    }
    Ok(out.join("\n"))
}
