//! Layered service configuration.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `ICAL_IMPORT_*` environment variables, each layer overriding the last.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File, FileFormat, Map};
use serde::Deserialize;
use url::Url;

use crate::booking::{BookingLabels, DEFAULT_SOURCE, DEFAULT_STATUS};
use crate::error::{ImportError, ImportResult};

pub const ENV_PREFIX: &str = "ICAL_IMPORT";

static DEFAULT_LISTEN: &str = "127.0.0.1:8000";
static DEFAULT_FEED_URL: &str = "http://www.update247.com.au/calendar/cal_room_block.php?roomid=21784&roomtoken=665ni5dnit&siteid=1";
static DEFAULT_REQUEST_TIMEOUT: &str = "30s";

/// Configuration as written by the user, before validation.
#[derive(Deserialize)]
struct RawConfig {
    listen: String,
    feed_url: String,
    request_timeout: String,
    status_label: String,
    source_label: String,
}

/// Where to fetch the calendar feed from and how long to wait for it.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub url: Url,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub listen: SocketAddr,
    pub feed: FeedConfig,
    pub labels: BookingLabels,
}

impl ImportConfig {
    /// Load defaults, the optional config file and the environment.
    pub fn load(path: Option<&Path>) -> ImportResult<Self> {
        let mut builder = defaults()?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        Self::with_environment(builder, None)
    }

    /// Load defaults overridden by TOML text. The environment is not consulted.
    pub fn from_toml(content: &str) -> ImportResult<Self> {
        let builder = defaults()?.add_source(File::from_str(content, FileFormat::Toml));
        Self::build(builder)
    }

    /// Layer `ICAL_IMPORT_*` variables over `builder`. `vars` replaces the
    /// process environment when given.
    pub(crate) fn with_environment(
        builder: ConfigBuilder<DefaultState>,
        vars: Option<Map<String, String>>,
    ) -> ImportResult<Self> {
        let environment = Environment::with_prefix(ENV_PREFIX).source(vars);
        Self::build(builder.add_source(environment))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> ImportResult<Self> {
        let raw: RawConfig = builder.build()?.try_deserialize()?;
        raw.validate()
    }
}

fn defaults() -> ImportResult<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("listen", DEFAULT_LISTEN)?
        .set_default("feed_url", DEFAULT_FEED_URL)?
        .set_default("request_timeout", DEFAULT_REQUEST_TIMEOUT)?
        .set_default("status_label", DEFAULT_STATUS)?
        .set_default("source_label", DEFAULT_SOURCE)?)
}

impl RawConfig {
    fn validate(self) -> ImportResult<ImportConfig> {
        let listen: SocketAddr = self.listen.parse().map_err(|e| {
            ImportError::Config(format!("invalid listen address '{}': {e}", self.listen))
        })?;

        let url = parse_feed_url(&self.feed_url)?;

        let request_timeout = humantime::parse_duration(&self.request_timeout).map_err(|e| {
            ImportError::Config(format!(
                "invalid request_timeout '{}': {e}",
                self.request_timeout
            ))
        })?;
        if request_timeout.is_zero() {
            return Err(ImportError::Config(
                "request_timeout must be greater than zero".into(),
            ));
        }

        Ok(ImportConfig {
            listen,
            feed: FeedConfig {
                url,
                request_timeout,
            },
            labels: BookingLabels {
                status: self.status_label,
                source: self.source_label,
            },
        })
    }
}

/// Parse the feed URL, treating `webcal://` subscriptions as HTTPS.
fn parse_feed_url(raw: &str) -> ImportResult<Url> {
    let raw = raw.trim();
    let normalized = match raw.strip_prefix("webcal://") {
        Some(rest) => format!("https://{rest}"),
        None => raw.to_string(),
    };

    let url = Url::parse(&normalized)
        .map_err(|e| ImportError::Config(format!("invalid feed_url '{raw}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ImportError::Config(format!(
            "feed_url must use http or https, got '{other}'"
        ))),
    }
}
