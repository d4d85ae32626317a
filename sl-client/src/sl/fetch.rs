//! One GET, decoded and parsed.
//!
//! The body is decoded with the charset named in `Content-Type`, falling
//! back to ISO-8859-1 when the server doesn't name one. Decoding is strict:
//! bytes that are malformed for the charset are an error rather than being
//! replaced.
//!
//! The API key rides in the query string, so transport errors are stripped
//! of their URL before they leave this module.

use std::borrow::Cow;

use encoding_rs::Encoding;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::SlError;

/// Charset assumed when the response doesn't declare one.
pub const DEFAULT_CHARSET: &str = "iso-8859-1";

/// Longest body excerpt kept in a parse error.
const BODY_EXCERPT_CHARS: usize = 500;

/// Send `request` and deserialize the decoded JSON body as `T`.
pub(crate) async fn fetch<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, SlError> {
    let response = request.send().await.map_err(redact)?;
    let status = response.status();

    if !status.is_success() {
        let body = response.bytes().await.unwrap_or_default();
        return Err(SlError::Api {
            status: status.as_u16(),
            message: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let charset = charset_from_content_type(content_type.as_deref());

    let body = response.bytes().await.map_err(redact)?;
    debug!(%charset, bytes = body.len(), "received response body");

    let text = decode_body(&body, &charset)?;
    parse_json(&text)
}

fn redact(error: reqwest::Error) -> SlError {
    SlError::Network(error.without_url())
}

/// The charset named by a `Content-Type` header value, lowercased.
///
/// When `mime` can't find one (stray whitespace before `;`, a comma
/// instead of `;`) the parameters are scanned one by one. Returns
/// [`DEFAULT_CHARSET`] if there is no header or no `charset` parameter.
pub fn charset_from_content_type(content_type: Option<&str>) -> String {
    let Some(value) = content_type else {
        return DEFAULT_CHARSET.to_string();
    };

    let charset = value
        .parse::<mime::Mime>()
        .ok()
        .and_then(|media_type| {
            media_type
                .get_param(mime::CHARSET)
                .map(|charset| charset.as_str().to_string())
        })
        .or_else(|| scan_charset_param(value));

    charset
        .map(|charset| charset.trim().trim_matches('"').trim().to_ascii_lowercase())
        .filter(|charset| !charset.is_empty())
        .unwrap_or_else(|| DEFAULT_CHARSET.to_string())
}

fn scan_charset_param(content_type: &str) -> Option<String> {
    content_type
        .split([';', ','])
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.to_string())
}

/// Labels decoded as true ISO-8859-1, one byte per code point.
///
/// `encoding_rs` maps these to windows-1252, which turns 0x80..=0x9F into
/// punctuation instead of the C1 controls.
const LATIN1_LABELS: [&str; 5] = ["iso-8859-1", "iso8859-1", "iso_8859-1", "latin1", "l1"];

/// Decode `bytes` under `charset` (a WHATWG encoding label).
pub fn decode_body(bytes: &[u8], charset: &str) -> Result<String, SlError> {
    if LATIN1_LABELS
        .iter()
        .any(|label| charset.trim().eq_ignore_ascii_case(label))
    {
        return Ok(bytes.iter().map(|&b| char::from(b)).collect());
    }

    let encoding = Encoding::for_label(charset.as_bytes()).ok_or_else(|| SlError::Decode {
        charset: charset.to_string(),
        message: "unknown charset".to_string(),
    })?;

    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
        .ok_or_else(|| SlError::Decode {
            charset: charset.to_string(),
            message: format!("malformed {} byte sequence", encoding.name()),
        })
}

/// Parse decoded text as JSON, keeping an excerpt of the body on failure.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, SlError> {
    serde_json::from_str(text).map_err(|e| SlError::Parse {
        message: e.to_string(),
        body: Some(text.chars().take(BODY_EXCERPT_CHARS).collect()),
    })
}
