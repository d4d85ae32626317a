//! Departure filtering and the one-line widget text.

use crate::sl::{Departure, DepartureBoard, SlClient, SlError};

use super::config::WidgetConfig;

/// Which departures the widget shows.
///
/// A direction only narrows the result together with a line number; on its
/// own it is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartureFilter {
    pub line_number: Option<String>,
    pub journey_direction: Option<i64>,
}

impl DepartureFilter {
    /// Keep everything.
    pub fn none() -> Self {
        Self::default()
    }

    /// Keep one line, both directions.
    pub fn line(line_number: impl Into<String>) -> Self {
        Self {
            line_number: Some(line_number.into()),
            journey_direction: None,
        }
    }

    /// Keep one line in one direction.
    pub fn line_and_direction(line_number: impl Into<String>, journey_direction: i64) -> Self {
        Self {
            line_number: Some(line_number.into()),
            journey_direction: Some(journey_direction),
        }
    }

    pub fn matches(&self, departure: &Departure) -> bool {
        match (&self.line_number, self.journey_direction) {
            (Some(line), Some(direction)) => {
                departure.line_number == *line && departure.journey_direction == direction
            }
            (Some(line), None) => departure.line_number == *line,
            (None, _) => true,
        }
    }
}

/// Render the kept departures as `[icon line destination time]` groups.
///
/// Modes appear in display order; groups are concatenated without
/// separators.
pub fn format_board(board: &DepartureBoard, filter: &DepartureFilter) -> String {
    board
        .iter()
        .filter(|(_, departure)| filter.matches(departure))
        .map(|(mode, d)| {
            format!(
                "[{} {} {} {}]",
                mode.icon(),
                d.line_number,
                d.destination,
                d.display_time
            )
        })
        .collect()
}

/// Fetch a fresh board and render it.
pub async fn refresh(client: &SlClient, config: &WidgetConfig) -> Result<String, SlError> {
    let board = client
        .get_departures(&config.api_key, &config.site_id, config.time_window)
        .await?;
    Ok(format_board(&board, &config.filter))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::sl::TransportMode;
    use proptest::prelude::*;
    use serde_json::Map;

    fn arb_departure() -> impl Strategy<Value = Departure> {
        ("(4|13|51|172)", 0i64..3, "[A-Z][a-z]{2,8}", "[0-9]{1,2} min").prop_map(
            |(line_number, journey_direction, destination, display_time)| Departure {
                line_number,
                journey_direction,
                destination,
                display_time,
                extra: Map::new(),
            },
        )
    }

    fn arb_board() -> impl Strategy<Value = DepartureBoard> {
        let list = || proptest::collection::vec(arb_departure(), 0..4);
        (list(), list(), list(), list(), list()).prop_map(|(buses, metros, trains, trams, ships)| {
            DepartureBoard {
                buses,
                metros,
                trains,
                trams,
                ships,
                ..DepartureBoard::default()
            }
        })
    }

    /// Icons of each bracketed group, in output order.
    fn group_icons(text: &str) -> Vec<TransportMode> {
        text.split_inclusive(']')
            .map(|group| {
                TransportMode::ALL
                    .into_iter()
                    .find(|m| group.starts_with(&format!("[{}", m.icon())))
                    .unwrap()
            })
            .collect()
    }

    fn mode_rank(mode: TransportMode) -> usize {
        TransportMode::ALL.iter().position(|&m| m == mode).unwrap()
    }

    proptest! {
        /// Without filters there is one group per departure, modes in order
        #[test]
        fn unfiltered_groups(board in arb_board()) {
            let text = format_board(&board, &DepartureFilter::none());
            let icons = group_icons(&text);
            prop_assert_eq!(icons.len(), board.len());
            prop_assert!(icons.windows(2).all(|w| mode_rank(w[0]) <= mode_rank(w[1])));
        }

        /// A line filter keeps exactly the departures of that line
        #[test]
        fn line_filter_keeps_only_that_line(board in arb_board(), line in "(4|13|51|172)") {
            let text = format_board(&board, &DepartureFilter::line(line.clone()));
            let expected: String = board
                .iter()
                .filter(|(_, d)| d.line_number == line)
                .map(|(mode, d)| format!("[{} {} {} {}]", mode.icon(), d.line_number, d.destination, d.display_time))
                .collect();
            prop_assert_eq!(text, expected);
        }

        /// Adding a direction never widens the line filter
        #[test]
        fn direction_narrows(board in arb_board(), line in "(4|13|51|172)", direction in 0i64..3) {
            let by_line = DepartureFilter::line(line.clone());
            let by_both = DepartureFilter::line_and_direction(line, direction);
            for (_, d) in board.iter() {
                if by_both.matches(d) {
                    prop_assert!(by_line.matches(d));
                    prop_assert_eq!(d.journey_direction, direction);
                }
            }
        }
    }
}
