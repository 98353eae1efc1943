// Port configuration
pub const DEFAULT_PORT: u16 = 3001;

// USGS summary feeds
pub const USGS_FEED_BASE: &str = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Base map
pub const DEFAULT_CENTER: [f64; 2] = [37.09, -95.71];
pub const DEFAULT_ZOOM: u8 = 5;
pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

// Shared palette of both threshold scales, lightest (weakest) first
pub const SCALE_COLORS: [&str; 6] = ["#8f0", "#ee0", "#eb0", "#e80", "#b60", "#a00"];
pub const MAGNITUDE_THRESHOLDS: [f64; 6] = [0.0, 1.0, 2.5, 4.0, 5.0, 6.0];
pub const DEPTH_THRESHOLDS: [f64; 6] = [0.0, 10.0, 30.0, 50.0, 70.0, 90.0];

// Color used when a value falls below every inclusive threshold
pub const NEUTRAL_COLOR: &str = "#ccc";

// Circle marker appearance, identical for every earthquake
pub const MARKER_STROKE_COLOR: &str = "black";
pub const MARKER_STROKE_WEIGHT: f64 = 0.3;
pub const MARKER_OPACITY: f64 = 1.0;
pub const MARKER_FILL_OPACITY: f64 = 0.65;
pub const RADIUS_SCALE: f64 = 3.0;
pub const MIN_RADIUS: f64 = 1.0;

pub const LEGEND_POSITION: &str = "bottomright";
