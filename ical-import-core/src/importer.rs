//! Fetch, parse and reshape a feed into booking records.

use tracing::info;

use crate::booking::{BookingLabels, BookingRecord};
use crate::config::ImportConfig;
use crate::error::ImportResult;
use crate::feed::FeedClient;
use crate::ics;

/// Runs one import per call. Holds no state between calls.
#[derive(Clone)]
pub struct BookingImporter {
    client: FeedClient,
    labels: BookingLabels,
}

impl BookingImporter {
    pub fn new(client: FeedClient, labels: BookingLabels) -> Self {
        BookingImporter { client, labels }
    }

    pub fn from_config(config: &ImportConfig) -> ImportResult<Self> {
        let client = FeedClient::new(&config.feed)?;
        Ok(Self::new(client, config.labels.clone()))
    }

    pub fn feed_client(&self) -> &FeedClient {
        &self.client
    }

    /// Fetch the feed and return every event as a booking, in feed order.
    ///
    /// All-or-nothing: the first failure aborts the import.
    pub async fn import(&self) -> ImportResult<Vec<BookingRecord>> {
        let body = self.client.fetch().await?;
        let events = ics::parse_events(&body)?;

        let bookings: Vec<BookingRecord> = events
            .into_iter()
            .map(|event| BookingRecord::from_event(event, &self.labels))
            .collect();

        info!(count = bookings.len(), url = %self.client.url(), "imported bookings");
        Ok(bookings)
    }
}
