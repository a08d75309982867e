use axum::http::{header::ACCEPT_LANGUAGE, HeaderMap};

use crate::i18n::DEFAULT_LANGUAGE;

/// Language requested through `Accept-Language`.
///
/// Only the first tag is honoured and reduced to its primary subtag
/// (`fr-CA;q=0.9, en` gives `fr`). Missing or unusable headers give English.
pub fn request_language(headers: &HeaderMap) -> String {
    headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|tag| tag.split(';').next())
        .and_then(|tag| tag.trim().split(['-', '_']).next())
        .map(|primary| primary.trim().to_ascii_lowercase())
        .filter(|primary| !primary.is_empty() && primary != "*")
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}
