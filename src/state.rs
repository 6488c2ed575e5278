use anyhow::{Context, Result};
use ical_import_core::{BookingImporter, ImportConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    // Immutable; every request runs its own import
    importer: BookingImporter,
}

impl AppState {
    pub fn new(config: &ImportConfig) -> Result<Self> {
        let importer =
            BookingImporter::from_config(config).context("Failed to create feed client")?;
        Ok(Self::from_importer(importer))
    }

    pub fn from_importer(importer: BookingImporter) -> Self {
        AppState { importer }
    }

    pub fn importer(&self) -> &BookingImporter {
        &self.importer
    }
}

#[cfg(test)]
pub(crate) fn test_state(feed_url: &str) -> AppState {
    use std::time::Duration;

    use ical_import_core::{BookingLabels, FeedClient, FeedConfig};

    let config = FeedConfig {
        url: url::Url::parse(feed_url).unwrap(),
        request_timeout: Duration::from_secs(5),
    };
    let client = FeedClient::new(&config).unwrap();
    AppState::from_importer(BookingImporter::new(client, BookingLabels::default()))
}
