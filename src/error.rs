/// Error types for scales, feed records and the feed client
use thiserror::Error;

/// Invalid threshold scale definition
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScaleError {
    /// A scale needs at least one breakpoint
    #[error("threshold scale is empty")]
    Empty,

    /// Breakpoints and colors are paired positionally
    #[error("{thresholds} thresholds but {colors} colors")]
    LengthMismatch { thresholds: usize, colors: usize },

    /// Breakpoints must be strictly ascending
    #[error("threshold {index} ({value}) is not greater than the one before it")]
    NotAscending { index: usize, value: f64 },

    /// NaN or infinite breakpoint
    #[error("threshold {index} is not a finite number")]
    NotFinite { index: usize },
}

/// A feature of the feed that cannot become an earthquake record
#[derive(Error, Debug, Clone, PartialEq)]
#[error("feature #{index} ({id}): {reason}")]
pub struct FeatureError {
    /// Position of the feature in the collection
    pub index: usize,
    /// Feature id, or "no id"
    pub id: String,
    pub reason: FeatureProblem,
}

/// What is wrong with a rejected feature
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureProblem {
    #[error("geometry is missing")]
    MissingGeometry,

    #[error("expected [lon, lat, depth] but got {0} coordinates")]
    ShortCoordinates(usize),

    #[error("{0} is not a finite number")]
    NotFinite(&'static str),

    #[error("properties are missing")]
    MissingProperties,

    #[error("{0} has the wrong type")]
    WrongType(&'static str),

    #[error("magnitude is missing")]
    MissingMagnitude,

    #[error("time is missing")]
    MissingTime,

    #[error("time {0} is out of range")]
    TimeOutOfRange(i64),
}

/// Failure to obtain the feed
#[derive(Error, Debug)]
pub enum FeedError {
    /// Connection, timeout or body decoding failure
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("feed answered with HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Reading a saved feed from disk failed
    #[error("failed to read feed file: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not a GeoJSON feature collection
    #[error("failed to parse feed: {0}")]
    Parse(#[from] serde_json::Error),
}
