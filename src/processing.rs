use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

use crate::legend::Legend;
use crate::marker::{popup_html, MarkerStyle, MarkerStyler};
use crate::quake::FeatureCollection;

/// One styled circle marker ready for the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: Option<String>,
    /// `[lat, lng]`
    pub lat_lng: [f64; 2],
    pub style: MarkerStyle,
    pub popup: String,
}

/// A feature that was skipped, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedFeature {
    pub index: usize,
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingStats {
    pub total: usize,
    pub rendered: usize,
    pub rejected: usize,
    pub elapsed_ms: f64,
}

/// Everything the page needs to draw the earthquake layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    pub title: Option<String>,
    /// Feed generation time, epoch milliseconds
    pub generated: Option<i64>,
    pub color_by: String,
    pub markers: Vec<Marker>,
    pub legend: Legend,
    pub rejected: Vec<RejectedFeature>,
    pub stats: ProcessingStats,
}

/// Validate and style every feature of the feed.
///
/// Malformed features never produce a marker; they are logged and listed in
/// [`MapLayer::rejected`].
pub fn build_map_layer(collection: &FeatureCollection, styler: &MarkerStyler) -> MapLayer {
    let start_time = Instant::now();
    let total = collection.features.len();

    let mut markers = Vec::with_capacity(total);
    let mut rejected = Vec::new();

    for result in collection.earthquakes() {
        match result {
            Ok(quake) => markers.push(Marker {
                id: quake.id.clone(),
                lat_lng: quake.lat_lng(),
                style: styler.style_for(&quake),
                popup: popup_html(&quake),
            }),
            Err(e) => {
                warn!("Skipping malformed {}", e);
                rejected.push(RejectedFeature {
                    index: e.index,
                    id: e.id.clone(),
                    reason: e.reason.to_string(),
                });
            }
        }
    }

    let stats = ProcessingStats {
        total,
        rendered: markers.len(),
        rejected: rejected.len(),
        elapsed_ms: start_time.elapsed().as_secs_f64() * 1000.0,
    };

    info!(
        "Processed {} features: {} markers, {} rejected in {:.1} ms",
        stats.total, stats.rendered, stats.rejected, stats.elapsed_ms
    );

    let key = styler.key();
    let metadata = collection.metadata.as_ref();
    MapLayer {
        title: metadata.and_then(|m| m.title.clone()),
        generated: metadata.and_then(|m| m.generated),
        color_by: key.to_string(),
        markers,
        legend: Legend::for_scale(key.legend_title(), styler.scale()),
        rejected,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::ColorKey;
    use crate::scale::ThresholdScale;
    use serde_json::json;

    fn collection(value: serde_json::Value) -> FeatureCollection {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_single_feature_end_to_end() {
        let feed = collection(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-100, 40, 12]},
                "properties": {"mag": 4.2, "place": "Test", "time": 1700000000000i64}
            }]
        }));

        let layer = build_map_layer(&feed, &MarkerStyler::new(ColorKey::Magnitude));

        assert_eq!(layer.markers.len(), 1);
        let marker = &layer.markers[0];
        assert_eq!(marker.lat_lng, [40.0, -100.0]);
        assert!((marker.style.radius - 12.6).abs() < 1e-9);
        assert_eq!(marker.style.fill_color, ThresholdScale::magnitude().colors()[3]);
        assert!(marker.popup.contains("Magnitude 4.2"));
        assert!(marker.popup.contains("Test"));
        assert!(marker.popup.contains("Depth: 12.00 km"));
        assert_eq!(layer.color_by, "magnitude");
        assert_eq!(layer.legend.entries.len(), 6);
    }

    #[test]
    fn test_malformed_features_are_listed_not_drawn() {
        let feed = collection(json!({
            "metadata": {"title": "USGS All Earthquakes, Past Hour", "generated": 1700000100000i64},
            "features": [
                {"id": "ok1", "geometry": {"coordinates": [1.0, 2.0, 3.0]}, "properties": {"mag": 1.5, "time": 0}},
                {"id": "bad", "geometry": {"coordinates": [1.0, 2.0, 3.0]}, "properties": {"mag": null, "time": 0}},
                {"id": "ok2", "geometry": {"coordinates": [4.0, 5.0, 95.0]}, "properties": {"mag": 0.0, "time": 0}}
            ]
        }));

        let layer = build_map_layer(&feed, &MarkerStyler::new(ColorKey::Depth));

        assert_eq!(layer.stats.total, 3);
        assert_eq!(layer.stats.rendered, 2);
        assert_eq!(layer.stats.rejected, 1);
        assert_eq!(layer.rejected[0].id, "bad");
        assert_eq!(layer.rejected[0].index, 1);
        assert_eq!(layer.rejected[0].reason, "magnitude is missing");
        assert_eq!(layer.markers[1].style.fill_color, "#a00");
        assert_eq!(layer.markers[1].style.radius, 1.0);
        assert_eq!(layer.title.as_deref(), Some("USGS All Earthquakes, Past Hour"));
        assert_eq!(layer.generated, Some(1700000100000));
        assert_eq!(layer.legend.title, "Depth (km)");
    }

    #[test]
    fn test_empty_feed() {
        let layer = build_map_layer(
            &FeatureCollection::default(),
            &MarkerStyler::new(ColorKey::Magnitude),
        );
        assert!(layer.markers.is_empty());
        assert_eq!(layer.stats.total, 0);
        assert_eq!(layer.title, None);
    }
}
