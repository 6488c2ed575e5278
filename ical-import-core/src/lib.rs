//! Core types for ical-import.
//!
//! This crate turns a remote iCalendar feed into booking records:
//! - `booking` holds the record handed to the front-end
//! - `ics` extracts events from calendar text
//! - `feed` and `importer` fetch the feed and run the extraction
//! - `config` loads the layered service configuration

pub mod booking;
pub mod config;
pub mod error;
pub mod feed;
pub mod ics;
pub mod importer;

pub use booking::{BookingLabels, BookingRecord};
pub use config::{FeedConfig, ImportConfig};
pub use error::{ImportError, ImportResult};
pub use feed::FeedClient;
pub use importer::BookingImporter;
