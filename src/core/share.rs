//! Share links — a group definition packed into a URL query parameter.
//!
//! The payload is the group's JSON, UTF-8 encoded, then standard base64.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use url::Url;

use super::group::GroupCreateRequest;

/// Query parameter carrying the encoded group.
pub const SHARE_PARAM: &str = "shared";

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("shared payload is not base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("shared payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("shared payload is not a group: {0}")]
    Json(#[from] serde_json::Error),
    #[error("shared group has no name")]
    MissingName,
}

pub fn encode_group_url(base_url: &str, group: &GroupCreateRequest) -> Result<String, ShareError> {
    let mut url = Url::parse(base_url)?;
    let json = serde_json::to_string(group)?;
    let encoded = STANDARD.encode(json.as_bytes());
    url.query_pairs_mut().append_pair(SHARE_PARAM, &encoded);
    Ok(url.into())
}

/// `Ok(None)` when the URL carries no shared group.
pub fn decode_group_url(url: &str) -> Result<Option<GroupCreateRequest>, ShareError> {
    let url = Url::parse(url)?;
    let Some(encoded) = url
        .query_pairs()
        .find(|(k, _)| k == SHARE_PARAM)
        .map(|(_, v)| v.into_owned())
    else {
        return Ok(None);
    };
    if encoded.is_empty() {
        return Ok(None);
    }

    // Links pasted without percent-encoding lose `+` to form decoding.
    let encoded = encoded.replace(' ', "+");
    let bytes = STANDARD.decode(encoded.as_bytes())?;
    let json = String::from_utf8(bytes)?;
    let group: GroupCreateRequest = serde_json::from_str(&json)?;

    if group.name.trim().is_empty() {
        return Err(ShareError::MissingName);
    }
    Ok(Some(group))
}

/// The same URL without the shared-group parameter.
pub fn strip_shared_param(url: &str) -> Result<String, ShareError> {
    let mut url = Url::parse(url)?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != SHARE_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.set_query(None);
    if !kept.is_empty() {
        url.query_pairs_mut().extend_pairs(kept);
    }
    Ok(url.into())
}
