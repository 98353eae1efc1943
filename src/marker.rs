//! Circle marker styles and popup markup for earthquake records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    MARKER_FILL_OPACITY, MARKER_OPACITY, MARKER_STROKE_COLOR, MARKER_STROKE_WEIGHT,
};
use crate::quake::Earthquake;
use crate::scale::{radius_for, ThresholdScale};

/// Which measurement drives the marker fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorKey {
    Magnitude,
    Depth,
}

impl ColorKey {
    /// The scale this key is colored with.
    pub fn scale(self) -> ThresholdScale {
        match self {
            ColorKey::Magnitude => ThresholdScale::magnitude(),
            ColorKey::Depth => ThresholdScale::depth(),
        }
    }

    pub fn legend_title(self) -> &'static str {
        match self {
            ColorKey::Magnitude => "Magnitude",
            ColorKey::Depth => "Depth (km)",
        }
    }

    fn value(self, quake: &Earthquake) -> f64 {
        match self {
            ColorKey::Magnitude => quake.magnitude,
            ColorKey::Depth => quake.depth_km,
        }
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorKey::Magnitude => f.write_str("magnitude"),
            ColorKey::Depth => f.write_str("depth"),
        }
    }
}

impl FromStr for ColorKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <ColorKey as clap::ValueEnum>::from_str(s, true)
    }
}

/// Leaflet `CircleMarker` options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub fill_color: String,
    pub radius: f64,
    #[serde(rename = "color")]
    pub stroke_color: String,
    #[serde(rename = "weight")]
    pub stroke_weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

/// Computes marker styles with one color scale.
#[derive(Debug, Clone)]
pub struct MarkerStyler {
    key: ColorKey,
    scale: ThresholdScale,
}

impl MarkerStyler {
    pub fn new(key: ColorKey) -> Self {
        Self {
            key,
            scale: key.scale(),
        }
    }

    /// Use a custom scale for `key`'s values.
    pub fn with_scale(key: ColorKey, scale: ThresholdScale) -> Self {
        Self { key, scale }
    }

    pub fn key(&self) -> ColorKey {
        self.key
    }

    pub fn scale(&self) -> &ThresholdScale {
        &self.scale
    }

    pub fn style_for(&self, quake: &Earthquake) -> MarkerStyle {
        MarkerStyle {
            fill_color: self.scale.color_for(self.key.value(quake)).to_string(),
            radius: radius_for(quake.magnitude),
            stroke_color: MARKER_STROKE_COLOR.to_string(),
            stroke_weight: MARKER_STROKE_WEIGHT,
            opacity: MARKER_OPACITY,
            fill_opacity: MARKER_FILL_OPACITY,
        }
    }
}

/// Popup markup bound to a marker.
pub fn popup_html(quake: &Earthquake) -> String {
    let place = quake
        .place
        .as_deref()
        .map(escape_html)
        .unwrap_or_else(|| "Unknown location".to_string());

    let mut html = format!(
        "<strong>Magnitude {} -- {}</strong><br><hr>Latitude: {:.3}, Longitude: {:.3}<br>Depth: {:.2} km<br>Time: {}",
        quake.magnitude,
        place,
        quake.latitude,
        quake.longitude,
        quake.depth_km,
        quake.time().format("%a %b %d %Y %H:%M:%S UTC"),
    );

    if let Some(url) = &quake.url {
        html.push_str(&format!(
            "<br><a href=\"{}\" target=\"_blank\" rel=\"noopener\">Details</a>",
            escape_html(url)
        ));
    }
    html
}

/// Escape text for inclusion in HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
