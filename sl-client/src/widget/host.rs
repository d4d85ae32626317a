//! Periodic refresh, as a status-bar host drives the widget.

use std::time::Duration;

use tracing::{info, warn};

use crate::sl::{SlClient, SlError};

use super::config::WidgetConfig;
use super::format::refresh;

/// How often the host refreshes the widget (90 seconds).
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(90);

/// The text currently on display.
///
/// A failed refresh leaves the previous text in place; before the first
/// success the text is empty.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    text: String,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one refresh result and return the text to display.
    pub fn update(&mut self, result: Result<String, SlError>) -> &str {
        match result {
            Ok(text) => self.text = text,
            Err(e) => warn!(error = %e, "widget refresh failed, keeping previous text"),
        }
        &self.text
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Refresh every `period` and hand each line to `emit`. Never returns.
///
/// The first refresh happens immediately.
pub async fn run(
    client: &SlClient,
    config: &WidgetConfig,
    period: Duration,
    mut emit: impl FnMut(&str),
) {
    info!(site_id = %config.site_id, period_secs = period.as_secs(), "starting widget");

    let mut status = StatusLine::new();
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        emit(status.update(refresh(client, config).await));
    }
}
