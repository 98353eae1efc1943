//! Earthquake records and the GeoJSON feed they come from.
//!
//! Per-feature fields are decoded leniently: a feature with a missing or
//! mistyped field still parses and is rejected by [`Earthquake::from_feature`],
//! so one bad feature never costs the whole collection.

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FeatureError, FeatureProblem};

/// GeoJSON `FeatureCollection` as published by the USGS summary feeds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default, deserialize_with = "lenient")]
    pub metadata: Option<FeedMetadata>,
    #[serde(default, deserialize_with = "lenient_features")]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedMetadata {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    /// Feed generation time, epoch milliseconds
    #[serde(default, deserialize_with = "lenient")]
    pub generated: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "lenient")]
    pub properties: Option<Properties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Geometry {
    /// `[longitude, latitude, depth_km]`
    #[serde(default)]
    pub coordinates: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Properties {
    #[serde(default)]
    pub mag: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub place: Option<String>,
    /// Origin time, epoch milliseconds
    #[serde(default)]
    pub time: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

/// Decode `T`, or `None` when the value has another shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

// A non-object entry becomes an empty feature, rejected later for its
// missing geometry.
fn lenient_features<'de, D>(deserializer: D) -> Result<Vec<Feature>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .map(|value| serde_json::from_value(value).unwrap_or_default())
        .collect())
}

/// `Ok(None)` for null, an error for anything that is not a number.
fn number(value: &Value, name: &'static str) -> Result<Option<f64>, FeatureProblem> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        _ => Err(FeatureProblem::WrongType(name)),
    }
}

/// One validated earthquake event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Earthquake {
    pub id: Option<String>,
    pub magnitude: f64,
    pub depth_km: f64,
    pub longitude: f64,
    pub latitude: f64,
    pub place: Option<String>,
    pub timestamp_ms: i64,
    pub url: Option<String>,
}

impl Earthquake {
    /// Validate the feature at `index` of a collection.
    pub fn from_feature(index: usize, feature: &Feature) -> Result<Self, FeatureError> {
        let fail = |reason| FeatureError {
            index,
            id: feature.id.clone().unwrap_or_else(|| "no id".to_string()),
            reason,
        };

        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| fail(FeatureProblem::MissingGeometry))?;
        let coordinates: &[Value] = match &geometry.coordinates {
            Value::Array(items) => items.as_slice(),
            Value::Null => &[],
            _ => return Err(fail(FeatureProblem::WrongType("coordinates"))),
        };
        if coordinates.len() < 3 {
            return Err(fail(FeatureProblem::ShortCoordinates(coordinates.len())));
        }

        let coordinate = |i: usize, name: &'static str| -> Result<f64, FeatureError> {
            number(&coordinates[i], name)
                .map_err(&fail)?
                .filter(|v| v.is_finite())
                .ok_or_else(|| fail(FeatureProblem::NotFinite(name)))
        };
        let longitude = coordinate(0, "longitude")?;
        let latitude = coordinate(1, "latitude")?;
        let depth_km = coordinate(2, "depth")?;

        let properties = feature
            .properties
            .as_ref()
            .ok_or_else(|| fail(FeatureProblem::MissingProperties))?;

        let magnitude = number(&properties.mag, "magnitude")
            .map_err(&fail)?
            .ok_or_else(|| fail(FeatureProblem::MissingMagnitude))?;
        if !magnitude.is_finite() {
            return Err(fail(FeatureProblem::NotFinite("magnitude")));
        }

        let timestamp_ms = match &properties.time {
            Value::Null => return Err(fail(FeatureProblem::MissingTime)),
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| fail(FeatureProblem::WrongType("time")))?,
            _ => return Err(fail(FeatureProblem::WrongType("time"))),
        };
        if DateTime::<Utc>::from_timestamp_millis(timestamp_ms).is_none() {
            return Err(fail(FeatureProblem::TimeOutOfRange(timestamp_ms)));
        }

        Ok(Earthquake {
            id: feature.id.clone(),
            magnitude,
            depth_km,
            longitude,
            latitude,
            place: properties.place.clone(),
            timestamp_ms,
            url: properties.url.clone(),
        })
    }

    pub fn time(&self) -> DateTime<Utc> {
        // Range was checked in `from_feature`.
        DateTime::<Utc>::from_timestamp_millis(self.timestamp_ms).unwrap_or_default()
    }

    /// Leaflet order: `[lat, lng]`
    pub fn lat_lng(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

impl FeatureCollection {
    /// Validate every feature, keeping the order of the feed.
    pub fn earthquakes(&self) -> impl Iterator<Item = Result<Earthquake, FeatureError>> + '_ {
        self.features
            .iter()
            .enumerate()
            .map(|(index, feature)| Earthquake::from_feature(index, feature))
    }
}
