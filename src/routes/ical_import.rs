//! Calendar import endpoint

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use tracing::warn;

use ical_import_core::{BookingRecord, ImportResult};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/ical_import", get(import_ical))
}

/// Response envelope; callers check `success`, never the HTTP status.
///
/// Exactly one of `bookings` and `error` is present.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookings: Option<Vec<BookingRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ImportResult<Vec<BookingRecord>>> for ImportResponse {
    fn from(result: ImportResult<Vec<BookingRecord>>) -> Self {
        match result {
            Ok(bookings) => ImportResponse {
                success: true,
                bookings: Some(bookings),
                error: None,
            },
            Err(e) => ImportResponse {
                success: false,
                bookings: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// GET /ical_import - Fetch the feed and return its events as bookings
///
/// An event without a SUMMARY is still returned, with the summary
/// `"(No title)"` instead of a literal `"None"`.
async fn import_ical(State(state): State<AppState>) -> Json<ImportResponse> {
    let result = state.importer().import().await;

    if let Err(e) = &result {
        warn!(url = %state.importer().feed_client().url(), "calendar import failed: {e}");
    }

    Json(result.into())
}
