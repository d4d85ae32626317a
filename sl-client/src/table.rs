//! Plain-text tables for the command-line tools.
//!
//! Layout: a header row, a dashed rule under each column, then one row per
//! record. Columns are separated by two spaces. Numeric columns are
//! right-aligned, everything else left-aligned. Column headers are the
//! union of the records' keys in first-seen order; a record lacking a key
//! gets an empty cell.

use std::fmt::{self, Write as _};

use serde_json::{Map, Value};

use crate::sl::{DepartureBoard, Station, TransportMode};

/// Space between columns.
const GUTTER: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// A rendered-on-demand text table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    align: Vec<Align>,
}

impl Table {
    /// Build a table from JSON object records.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Map<String, Value>>) -> Self {
        let records: Vec<&Map<String, Value>> = records.into_iter().collect();

        let mut headers: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }

        let align = headers
            .iter()
            .map(|header| {
                let mut present = records.iter().filter_map(|r| r.get(header)).peekable();
                if present.peek().is_some() && present.all(is_numeric) {
                    Align::Right
                } else {
                    Align::Left
                }
            })
            .collect();

        let rows = records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .map(|header| record.get(header).map(cell).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self {
            headers,
            rows,
            align,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

impl fmt::Display for Table {
    /// An empty table renders as nothing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }

        let widths = self.widths();
        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();

        write_line(f, &self.headers, &widths, &self.align)?;
        f.write_char('\n')?;
        write_line(f, &rule, &widths, &self.align)?;
        for row in &self.rows {
            f.write_char('\n')?;
            write_line(f, row, &widths, &self.align)?;
        }
        Ok(())
    }
}

fn write_line(
    f: &mut fmt::Formatter<'_>,
    cells: &[String],
    widths: &[usize],
    align: &[Align],
) -> fmt::Result {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str(GUTTER);
        }
        let pad = widths[i].saturating_sub(cell.chars().count());
        match align[i] {
            Align::Left => {
                line.push_str(cell);
                line.extend(std::iter::repeat_n(' ', pad));
            }
            Align::Right => {
                line.extend(std::iter::repeat_n(' ', pad));
                line.push_str(cell);
            }
        }
    }
    f.write_str(line.trim_end())
}

/// Text shown for a JSON value in a cell.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => {
            !s.is_empty()
                && s.chars()
                    .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
                && s.parse::<f64>().is_ok()
        }
        _ => false,
    }
}

/// Table of typeahead results, one row per place.
pub fn station_table(stations: &[Station]) -> Table {
    Table::from_records(stations.iter().map(Station::fields))
}

/// Table of one mode's departures.
pub fn departure_table(board: &DepartureBoard, mode: TransportMode) -> Table {
    let records: Vec<Map<String, Value>> = board
        .departures(mode)
        .iter()
        .map(|d| d.to_record())
        .collect();
    Table::from_records(&records)
}

/// Every mode's name followed by its table, modes in display order.
pub fn departure_tables(board: &DepartureBoard) -> String {
    let mut out = String::new();
    for mode in TransportMode::ALL {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{mode}");
        let _ = writeln!(out, "{}", departure_table(board, mode));
    }
    out
}
