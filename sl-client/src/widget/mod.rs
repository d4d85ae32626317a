//! Status-bar widget: the next departures from one site as a single line.
//!
//! The host builds a [`WidgetConfig`] once and calls [`refresh`] on a timer.
//! Each refresh is independent; the only thing carried between calls is
//! the text on display, kept by [`StatusLine`] so that a failed refresh
//! doesn't blank the bar.

mod config;
mod format;
mod host;

pub use config::{ConfigError, DEFAULT_TIME_WINDOW, WidgetConfig, WidgetParameters};
pub use format::{DepartureFilter, format_board, refresh};
pub use host::{REFRESH_INTERVAL, StatusLine, run};
