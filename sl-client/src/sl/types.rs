//! SL API response DTOs.
//!
//! Both endpoints wrap their payload in an envelope whose `ResponseData`
//! holds the actual result. Field names follow the API's PascalCase.
//! Anything we don't consume is kept in a pass-through map so that the
//! tables can show every column the API sent, in the order it sent them.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::error::SlError;

/// Top-level response wrapper shared by every SL endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope<T> {
    /// API-level status code (0 on success).
    pub status_code: Option<i64>,

    /// API-level message, set when the request was rejected.
    pub message: Option<String>,

    /// The payload. `null` when the API rejected the request.
    pub response_data: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwrap `ResponseData`, reporting the API's own message if it is missing.
    pub fn into_response_data(self) -> Result<T, SlError> {
        match self.response_data {
            Some(data) => Ok(data),
            None => Err(SlError::MissingField {
                field: "ResponseData",
                message: match (self.status_code, self.message) {
                    (Some(code), Some(message)) => format!("{message} (status {code})"),
                    (None, Some(message)) => message,
                    (Some(code), None) => format!("status {code}"),
                    (None, None) => "absent or null".to_string(),
                },
            }),
        }
    }
}

/// A typeahead search result.
///
/// The schema belongs to the API, so the record is kept whole; accessors
/// cover the fields callers usually need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Station(Map<String, Value>);

impl Station {
    /// Station name, e.g. "Telefonplan (Stockholm)".
    pub fn name(&self) -> Option<&str> {
        self.0.get("Name").and_then(Value::as_str)
    }

    /// Site id, the value `get_departures` expects.
    pub fn site_id(&self) -> Option<&str> {
        self.0.get("SiteId").and_then(Value::as_str)
    }

    /// Place type ("Station", "Address", "Poi").
    pub fn kind(&self) -> Option<&str> {
        self.0.get("Type").and_then(Value::as_str)
    }

    /// All fields, in response order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Station {
    fn from(fields: Map<String, Value>) -> Self {
        Station(fields)
    }
}

/// One departure on a realtime board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Departure {
    /// Line designation, e.g. "51" or "17".
    pub line_number: String,

    /// Direction code; meaning is defined per line by the API.
    pub journey_direction: i64,

    /// Destination shown on the vehicle.
    pub destination: String,

    /// Human-readable departure time ("3 min", "Nu", "14:05").
    pub display_time: String,

    /// Every other field, unmodified.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Departure {
    /// The departure as a flat record: consumed fields first, then the rest.
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("LineNumber".into(), Value::from(self.line_number.as_str()));
        record.insert("JourneyDirection".into(), Value::from(self.journey_direction));
        record.insert("Destination".into(), Value::from(self.destination.as_str()));
        record.insert("DisplayTime".into(), Value::from(self.display_time.as_str()));
        record.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        record
    }
}

/// Transport modes on a realtime board, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportMode {
    Buses,
    Metros,
    Trains,
    Trams,
    Ships,
}

impl TransportMode {
    /// Every mode, in the order boards are rendered.
    pub const ALL: [TransportMode; 5] = [
        TransportMode::Buses,
        TransportMode::Metros,
        TransportMode::Trains,
        TransportMode::Trams,
        TransportMode::Ships,
    ];

    /// The key of this mode in `ResponseData`.
    pub fn key(self) -> &'static str {
        match self {
            TransportMode::Buses => "Buses",
            TransportMode::Metros => "Metros",
            TransportMode::Trains => "Trains",
            TransportMode::Trams => "Trams",
            TransportMode::Ships => "Ships",
        }
    }

    /// Glyph used to tag departures of this mode in the widget.
    pub fn icon(self) -> &'static str {
        match self {
            TransportMode::Buses => "🚌",
            TransportMode::Metros => "🚇",
            TransportMode::Trains => "🚆",
            TransportMode::Trams => "🚊",
            TransportMode::Ships => "⛴",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// `ResponseData` of the realtime departures endpoint.
///
/// Always carries all five modes; a mode the API omits or sends as `null`
/// is empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DepartureBoard {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub buses: Vec<Departure>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub metros: Vec<Departure>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub trains: Vec<Departure>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub trams: Vec<Departure>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub ships: Vec<Departure>,

    /// When the board was last updated upstream (local time, ISO 8601).
    pub latest_update: Option<String>,

    /// Age of the board data in seconds.
    pub data_age: Option<i64>,
}

impl DepartureBoard {
    /// Departures for one mode.
    pub fn departures(&self, mode: TransportMode) -> &[Departure] {
        match mode {
            TransportMode::Buses => &self.buses,
            TransportMode::Metros => &self.metros,
            TransportMode::Trains => &self.trains,
            TransportMode::Trams => &self.trams,
            TransportMode::Ships => &self.ships,
        }
    }

    /// All departures tagged with their mode, modes in display order.
    pub fn iter(&self) -> impl Iterator<Item = (TransportMode, &Departure)> {
        TransportMode::ALL
            .into_iter()
            .flat_map(move |mode| self.departures(mode).iter().map(move |d| (mode, d)))
    }

    /// Total number of departures across all modes.
    pub fn len(&self) -> usize {
        TransportMode::ALL
            .iter()
            .map(|&mode| self.departures(mode).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `latest_update` parsed as a local timestamp, if present and well-formed.
    pub fn latest_update_time(&self) -> Option<NaiveDateTime> {
        self.latest_update.as_deref()?.parse().ok()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
