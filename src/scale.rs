//! Threshold scales: bucket a continuous value (magnitude, depth) into one of
//! a fixed set of colors.
//!
//! A scale is an immutable value. The two scales used by the map are built by
//! [`ThresholdScale::magnitude`] and [`ThresholdScale::depth`] and passed around
//! explicitly.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEPTH_THRESHOLDS, MAGNITUDE_THRESHOLDS, MIN_RADIUS, NEUTRAL_COLOR, RADIUS_SCALE, SCALE_COLORS,
};
use crate::error::ScaleError;

/// How a value is tested against a bucket's lower breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundPolicy {
    /// `value >= threshold`. Values below the first breakpoint match nothing.
    InclusiveLower,
    /// `value > threshold`. Values at or below the first breakpoint fall into
    /// bucket 0.
    StrictLower,
}

impl BoundPolicy {
    fn admits(self, value: f64, threshold: f64) -> bool {
        match self {
            BoundPolicy::InclusiveLower => value >= threshold,
            BoundPolicy::StrictLower => value > threshold,
        }
    }
}

/// Ascending breakpoints paired positionally with display colors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdScale {
    thresholds: Vec<f64>,
    colors: Vec<String>,
    policy: BoundPolicy,
}

impl ThresholdScale {
    pub fn new(
        thresholds: Vec<f64>,
        colors: Vec<String>,
        policy: BoundPolicy,
    ) -> Result<Self, ScaleError> {
        if thresholds.is_empty() {
            return Err(ScaleError::Empty);
        }
        if thresholds.len() != colors.len() {
            return Err(ScaleError::LengthMismatch {
                thresholds: thresholds.len(),
                colors: colors.len(),
            });
        }
        for (index, &value) in thresholds.iter().enumerate() {
            if !value.is_finite() {
                return Err(ScaleError::NotFinite { index });
            }
            if index > 0 && value <= thresholds[index - 1] {
                return Err(ScaleError::NotAscending { index, value });
            }
        }

        Ok(Self {
            thresholds,
            colors,
            policy,
        })
    }

    /// Magnitude scale `0, 1, 2.5, 4, 5, 6`, inclusive lower bounds.
    pub fn magnitude() -> Self {
        Self::from_constants(&MAGNITUDE_THRESHOLDS, BoundPolicy::InclusiveLower)
    }

    /// Depth scale in km `0, 10, 30, 50, 70, 90`, strict lower bounds.
    pub fn depth() -> Self {
        Self::from_constants(&DEPTH_THRESHOLDS, BoundPolicy::StrictLower)
    }

    // Constants satisfy the invariants checked by `new` (see tests).
    fn from_constants(thresholds: &[f64], policy: BoundPolicy) -> Self {
        Self {
            thresholds: thresholds.to_vec(),
            colors: SCALE_COLORS.iter().map(|c| c.to_string()).collect(),
            policy,
        }
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn policy(&self) -> BoundPolicy {
        self.policy
    }

    pub fn bucket_index(&self, value: f64) -> Option<usize> {
        bucket_index(value, &self.thresholds, self.policy)
    }

    pub fn color_for(&self, value: f64) -> &str {
        color_for(value, self)
    }

    /// One `(label, color)` entry per bucket, recomputed on every call.
    pub fn legend_ranges(&self) -> LegendRanges<'_> {
        LegendRanges {
            scale: self,
            next: 0,
        }
    }
}

/// Largest bucket whose lower breakpoint admits `value`, scanning from the
/// highest index down.
///
/// Under [`BoundPolicy::StrictLower`] the result is never `None`: anything at
/// or below the first breakpoint lands in bucket 0.
pub fn bucket_index(value: f64, thresholds: &[f64], policy: BoundPolicy) -> Option<usize> {
    if let Some(index) = thresholds
        .iter()
        .rposition(|&threshold| policy.admits(value, threshold))
    {
        return Some(index);
    }

    match policy {
        BoundPolicy::InclusiveLower => None,
        BoundPolicy::StrictLower if thresholds.is_empty() => None,
        BoundPolicy::StrictLower => Some(0),
    }
}

/// Bucket color for `value`, or the neutral gray when no bucket matched.
pub fn color_for(value: f64, scale: &ThresholdScale) -> &str {
    scale
        .bucket_index(value)
        .and_then(|index| scale.colors.get(index))
        .map(String::as_str)
        .unwrap_or(NEUTRAL_COLOR)
}

/// Marker radius for a magnitude: three units per magnitude step.
///
/// Zero and negative magnitudes get the minimum visible radius.
pub fn radius_for(magnitude: f64) -> f64 {
    if magnitude <= 0.0 {
        return MIN_RADIUS;
    }
    magnitude * RADIUS_SCALE
}

/// A legend line: the value range of a bucket and its color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendRange<'a> {
    pub label: String,
    pub color: &'a str,
}

/// Lazy iterator returned by [`ThresholdScale::legend_ranges`].
#[derive(Debug, Clone)]
pub struct LegendRanges<'a> {
    scale: &'a ThresholdScale,
    next: usize,
}

impl<'a> Iterator for LegendRanges<'a> {
    type Item = LegendRange<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let t = &self.scale.thresholds;
        let i = self.next;
        if i >= t.len() {
            return None;
        }
        self.next += 1;

        let last = t.len() - 1;
        let label = if i == last {
            format!("{}+", t[i])
        } else if i == 0 {
            format!("< {}", t[1])
        } else {
            format!("{}-{}", t[i], t[i + 1])
        };

        Some(LegendRange {
            label,
            color: &self.scale.colors[i],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.scale.thresholds.len().saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for LegendRanges<'_> {}
