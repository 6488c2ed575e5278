//! ICS feed parsing.
//!
//! This module reads calendar text according to RFC 5545 and reduces each
//! VEVENT to the fields a booking needs.

mod date;
mod parse;

pub use parse::{FeedEvent, parse_events};
