//! Earthquake map generator for the USGS GeoJSON summary feeds.
//!
//! Each earthquake becomes a circle marker: radius from magnitude, fill color
//! from magnitude or depth through a [`scale::ThresholdScale`]. The page
//! itself (Leaflet) only draws the markers and legend computed here.

pub mod cli;
pub mod constants;
pub mod error;
pub mod feed;
pub mod html_template;
pub mod legend;
pub mod marker;
pub mod processing;
pub mod quake;
pub mod scale;
pub mod server;
pub mod settings;
pub mod store;
pub mod utils;
