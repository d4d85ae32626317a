//! SL client error types.

/// Errors that can occur when talking to the SL API.
#[derive(Debug, thiserror::Error)]
pub enum SlError {
    /// Connection, TLS, timeout or body read failed
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API returned a non-success HTTP status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Body could not be decoded under the detected charset
    #[error("cannot decode response as {charset}: {message}")]
    Decode { charset: String, message: String },

    /// Decoded body is not the expected JSON
    #[error("JSON parse error: {message}{}", body_suffix(.body))]
    Parse {
        message: String,
        body: Option<String>,
    },

    /// An expected field is absent from the response envelope
    #[error("missing field {field} in response: {message}")]
    MissingField {
        field: &'static str,
        message: String,
    },
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(body) => format!(" (body: {body})"),
        None => String::new(),
    }
}
