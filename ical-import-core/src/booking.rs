//! Booking records returned to the front-end.

use chrono::NaiveDate;
use serde::Serialize;

use crate::ics::FeedEvent;

/// Status label attached to every imported booking.
pub const DEFAULT_STATUS: &str = "Blocked";

/// Source label attached to every imported booking.
pub const DEFAULT_SOURCE: &str = "Update247";

/// One calendar event, repurposed as a room-blocking entry.
///
/// Dates serialize as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingRecord {
    pub summary: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub source: String,
}

/// The constant `status` and `source` values stamped onto each record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingLabels {
    pub status: String,
    pub source: String,
}

impl Default for BookingLabels {
    fn default() -> Self {
        BookingLabels {
            status: DEFAULT_STATUS.to_string(),
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

impl BookingRecord {
    pub fn from_event(event: FeedEvent, labels: &BookingLabels) -> Self {
        BookingRecord {
            summary: event.summary,
            start_date: event.start,
            end_date: event.end,
            status: labels.status.clone(),
            source: labels.source.clone(),
        }
    }
}
