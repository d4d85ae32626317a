//! SL (Storstockholms Lokaltrafik) real-time API client.
//!
//! Two endpoints are covered:
//! - typeahead station search, which yields the site ids
//! - realtime departures v4, a board of upcoming departures grouped by
//!   transport mode
//!
//! Every response is a JSON envelope with the payload under
//! `ResponseData`. The body's charset comes from `Content-Type` and
//! defaults to ISO-8859-1.

mod client;
mod error;
mod fetch;
#[cfg(test)]
pub(crate) mod test_support;
mod types;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MAX_RESULTS, SlClient, SlConfig};
pub use error::SlError;
pub use fetch::{DEFAULT_CHARSET, charset_from_content_type, decode_body, parse_json};
pub use types::{Departure, DepartureBoard, Envelope, Station, TransportMode};
