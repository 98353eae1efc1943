use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::feed::{FeedLevel, FeedPeriod, FeedSource, FeedUrl};
use crate::marker::ColorKey;
use crate::settings::Settings;

/// Map recent earthquakes from the USGS GeoJSON feed.
#[derive(Parser, Debug)]
#[command(name = "quakemap", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the feed once and serve the map on localhost (default)
    Serve(ServeArgs),
    /// Fetch the feed and write a self-contained HTML map
    Export(ExportArgs),
    /// Print the color legend of a scale
    Legend(LegendArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Serve(ServeArgs::default())
    }
}

/// Where the data comes from and how it is colored.
#[derive(Args, Debug, Default, Clone)]
pub struct SourceArgs {
    /// Full GeoJSON feed URL, or a `level_period` shorthand such as `2.5_day`
    #[arg(long, conflicts_with_all = ["level", "period"])]
    pub feed_url: Option<String>,

    /// USGS summary feed magnitude class
    #[arg(long, value_enum)]
    pub level: Option<FeedLevel>,

    /// USGS summary feed time window
    #[arg(long, value_enum)]
    pub period: Option<FeedPeriod>,

    /// Read a saved GeoJSON file instead of fetching
    #[arg(long, conflicts_with_all = ["feed_url", "level", "period"])]
    pub input: Option<PathBuf>,

    /// Value that drives the marker color
    #[arg(long, value_enum)]
    pub color_by: Option<ColorKey>,

    /// HTTP request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Configuration file (defaults to the application data directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the effective settings back to the configuration file
    #[arg(long)]
    pub save_settings: bool,
}

impl SourceArgs {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Settings::config_path)
    }

    /// Apply command line overrides on top of the file settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(feed_url) = &self.feed_url {
            settings.feed_url = feed_url.clone();
        } else if self.level.is_some() || self.period.is_some() {
            let default = FeedUrl::default();
            settings.feed_url = FeedUrl {
                level: self.level.unwrap_or(default.level),
                period: self.period.unwrap_or(default.period),
            }
            .to_string();
        }
        if let Some(color_by) = self.color_by {
            settings.color_by = color_by;
        }
        if let Some(timeout) = self.timeout {
            settings.request_timeout_secs = timeout;
        }
    }

    pub fn source(&self, settings: &Settings) -> FeedSource {
        match &self.input {
            Some(path) => FeedSource::File(path.clone()),
            None => FeedSource::Url(settings.resolved_feed_url()),
        }
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Port to listen on (127.0.0.1)
    #[arg(long)]
    pub port: Option<u16>,

    /// Open the map in the default browser once the server is up
    #[arg(long)]
    pub open: bool,
}

impl ServeArgs {
    pub fn apply(&self, settings: &mut Settings) {
        self.source.apply(settings);
        if let Some(port) = self.port {
            settings.port = port;
        }
        if self.open {
            settings.auto_open_browser = true;
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output HTML file
    #[arg(short, long, default_value = "quakemap.html")]
    pub output: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct LegendArgs {
    /// Scale to print
    #[arg(long, value_enum, default_value_t = ColorKey::Magnitude)]
    pub color_by: ColorKey,
}
