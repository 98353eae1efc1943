use serde::Serialize;

use crate::constants::LEGEND_POSITION;
use crate::marker::{escape_html, ColorKey};
use crate::scale::ThresholdScale;

// Legend panel data handed to the page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: String,
    pub position: String,
    pub entries: Vec<LegendEntry>,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

impl Legend {
    pub fn for_scale(title: &str, scale: &ThresholdScale) -> Self {
        let entries: Vec<LegendEntry> = scale
            .legend_ranges()
            .map(|range| LegendEntry {
                label: range.label,
                color: range.color.to_string(),
            })
            .collect();
        let html = legend_html(title, &entries);

        Legend {
            title: title.to_string(),
            position: LEGEND_POSITION.to_string(),
            entries,
            html,
        }
    }

    pub fn for_key(key: ColorKey) -> Self {
        Self::for_scale(key.legend_title(), &key.scale())
    }
}

/// Legend panel markup: a title and one color swatch per bucket.
pub fn legend_html(title: &str, entries: &[LegendEntry]) -> String {
    let mut html = format!("<h4>{}</h4>", escape_html(title));
    html.push_str("<ul style=\"list-style-type: none; padding-left: 10px;\">");
    for entry in entries {
        html.push_str(&format!(
            "<li><span style=\"background-color: {};\">&emsp;</span> {}</li>",
            escape_html(&entry.color),
            escape_html(&entry.label)
        ));
    }
    html.push_str("</ul>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude_legend() {
        let legend = Legend::for_key(ColorKey::Magnitude);
        assert_eq!(legend.title, "Magnitude");
        assert_eq!(legend.position, "bottomright");
        assert_eq!(legend.entries.len(), 6);
        assert_eq!(legend.entries[0].label, "< 1");
        assert_eq!(legend.entries[5].label, "6+");
        assert!(legend.html.starts_with("<h4>Magnitude</h4><ul"));
        assert!(legend
            .html
            .contains("<li><span style=\"background-color: #8f0;\">&emsp;</span> &lt; 1</li>"));
        assert!(legend.html.ends_with("6+</li></ul>"));
    }

    #[test]
    fn test_depth_legend() {
        let legend = Legend::for_key(ColorKey::Depth);
        assert_eq!(legend.title, "Depth (km)");
        let labels: Vec<&str> = legend.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["< 10", "10-30", "30-50", "50-70", "70-90", "90+"]);
        assert_eq!(legend.html.matches("<li>").count(), 6);
    }
}
