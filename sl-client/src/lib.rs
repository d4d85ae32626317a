//! Client for the SL (Stockholm public transport) real-time API.
//!
//! Looks up stations by name, fetches live departure boards, and renders
//! them either as plain-text tables or as a compact icon line for a
//! status-bar widget.

pub mod sl;
pub mod table;
pub mod widget;
