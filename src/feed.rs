//! USGS summary feed: URL building and the one-shot HTTP fetch.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::constants::USGS_FEED_BASE;
use crate::error::FeedError;
use crate::quake::FeatureCollection;

/// Minimum magnitude class of a summary feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FeedLevel {
    Significant,
    #[value(name = "4.5")]
    M4_5,
    #[value(name = "2.5")]
    M2_5,
    #[value(name = "1.0")]
    M1_0,
    All,
}

impl FeedLevel {
    fn slug(self) -> &'static str {
        match self {
            FeedLevel::Significant => "significant",
            FeedLevel::M4_5 => "4.5",
            FeedLevel::M2_5 => "2.5",
            FeedLevel::M1_0 => "1.0",
            FeedLevel::All => "all",
        }
    }
}

/// Time window of a summary feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FeedPeriod {
    Hour,
    Day,
    Week,
    Month,
}

impl FeedPeriod {
    fn slug(self) -> &'static str {
        match self {
            FeedPeriod::Hour => "hour",
            FeedPeriod::Day => "day",
            FeedPeriod::Week => "week",
            FeedPeriod::Month => "month",
        }
    }
}

/// A summary feed address, e.g. `all_week`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedUrl {
    pub level: FeedLevel,
    pub period: FeedPeriod,
}

impl Default for FeedUrl {
    fn default() -> Self {
        Self {
            level: FeedLevel::All,
            period: FeedPeriod::Week,
        }
    }
}

impl fmt::Display for FeedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}_{}.geojson",
            USGS_FEED_BASE,
            self.level.slug(),
            self.period.slug()
        )
    }
}

impl FromStr for FeedUrl {
    type Err = String;

    /// Parses the `level_period` form used in settings, e.g. `2.5_day`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (level, period) = s
            .rsplit_once('_')
            .ok_or_else(|| format!("expected <level>_<period>, got '{s}'"))?;
        let level = <FeedLevel as clap::ValueEnum>::from_str(level, true)?;
        let period = <FeedPeriod as clap::ValueEnum>::from_str(period, true)?;
        Ok(Self { level, period })
    }
}

/// Thin wrapper around a reqwest client with the request timeout applied.
#[derive(Clone, Debug)]
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    pub fn new(timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quakemap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Single GET of a GeoJSON feed. No retries.
    pub async fn fetch(&self, url: &str) -> Result<FeatureCollection, FeedError> {
        info!("Fetching earthquake feed from {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let collection: FeatureCollection = response.json().await?;
        debug!("Feed contains {} features", collection.features.len());
        Ok(collection)
    }

    /// Read a previously saved feed document.
    pub async fn load_file(path: &Path) -> Result<FeatureCollection, FeedError> {
        info!("Loading earthquake feed from {}", path.display());
        let bytes = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Where the feed document comes from for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Url(String),
    File(PathBuf),
}

impl FeedSource {
    pub async fn load(&self, timeout: Duration) -> Result<FeatureCollection, FeedError> {
        match self {
            FeedSource::Url(url) => FeedClient::new(timeout)?.fetch(url).await,
            FeedSource::File(path) => FeedClient::load_file(path).await,
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Url(url) => f.write_str(url),
            FeedSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}
