use anyhow::{Context, Result};
use rust_embed::RustEmbed;
use serde::Serialize;

use crate::constants::TILE_ATTRIBUTION;
use crate::marker::escape_html;
use crate::processing::MapLayer;
use crate::settings::Settings;

#[derive(RustEmbed)]
#[folder = "frontend/"]
pub struct Asset;

const DEFAULT_TITLE: &str = "QuakeMap - USGS Earthquakes";

/// Base map parameters handed to the page script.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl MapView {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            center: [settings.center_lat, settings.center_lon],
            zoom: settings.zoom,
            tile_url: settings.tile_url.clone(),
            attribution: TILE_ATTRIBUTION.to_string(),
        }
    }
}

/// Text content of an embedded frontend asset.
pub fn asset_text(name: &str) -> Result<String> {
    let file = Asset::get(name).with_context(|| format!("Missing embedded asset {}", name))?;
    String::from_utf8(file.data.into_owned())
        .with_context(|| format!("Embedded asset {} is not UTF-8", name))
}

/// Page served by the web server; data comes from `/api/earthquakes`.
pub fn get_map_html(view: &MapView) -> Result<String> {
    let html = asset_text("index.html")?
        .replace("<!-- TITLE_PLACEHOLDER -->", DEFAULT_TITLE)
        .replace(
            "<!-- STYLE_PLACEHOLDER -->",
            r#"<link rel="stylesheet" href="/style.css" />"#,
        )
        .replace("<!-- VIEW_PLACEHOLDER -->", &view_script(view)?)
        .replace(
            "<!-- SCRIPT_PLACEHOLDER -->",
            r#"<script src="/script.js"></script>"#,
        )
        .replace("<!-- DATA_PLACEHOLDER -->", "");
    Ok(html)
}

/// Single self-contained page with styles, script and the layer inlined.
pub fn get_standalone_html(view: &MapView, layer: &MapLayer) -> Result<String> {
    let title = layer.title.as_deref().unwrap_or(DEFAULT_TITLE);
    let data = format!(
        "<script>window.QUAKEMAP_DATA = {};</script>",
        script_json(layer)?
    );

    let html = asset_text("index.html")?
        .replace("<!-- TITLE_PLACEHOLDER -->", &escape_html(title))
        .replace(
            "<!-- STYLE_PLACEHOLDER -->",
            &format!("<style>\n{}</style>", asset_text("style.css")?),
        )
        .replace("<!-- VIEW_PLACEHOLDER -->", &view_script(view)?)
        .replace(
            "<!-- SCRIPT_PLACEHOLDER -->",
            &format!("<script>\n{}</script>", asset_text("script.js")?),
        )
        // Feed text goes in last so it is never searched for placeholders.
        .replace("<!-- DATA_PLACEHOLDER -->", &data);
    Ok(html)
}

fn view_script(view: &MapView) -> Result<String> {
    Ok(format!(
        "<script>window.QUAKEMAP_VIEW = {};</script>",
        script_json(view)?
    ))
}

// JSON safe to inline in a <script> element. `<` only occurs inside JSON
// strings, where `\u003c` decodes to the same text.
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).context("Failed to serialize page data")?;
    Ok(json.replace('<', "\\u003c"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::{ColorKey, MarkerStyler};
    use crate::processing::build_map_layer;
    use crate::quake::FeatureCollection;
    use serde_json::json;

    #[test]
    fn test_served_page_links_assets() {
        let html = get_map_html(&MapView::from_settings(&Settings::default())).unwrap();
        assert!(html.contains(r#"<script src="/script.js"></script>"#));
        assert!(html.contains(r#"href="/style.css""#));
        assert!(html.contains(r#""center":[37.09,-95.71]"#));
        assert!(html.contains(r#""zoom":5"#));
        assert!(!html.contains("PLACEHOLDER"));
        assert!(!html.contains("QUAKEMAP_DATA ="));
    }

    #[test]
    fn test_standalone_page_inlines_everything() {
        let feed: FeatureCollection = serde_json::from_value(json!({
            "metadata": {"title": "USGS Significant Earthquakes, Past Month"},
            "features": [{
                "geometry": {"coordinates": [142.3, 38.1, 24.0]},
                "properties": {"mag": 6.1, "place": "</script><b>x</b>", "time": 1700000000000i64}
            }]
        }))
        .unwrap();
        let layer = build_map_layer(&feed, &MarkerStyler::new(ColorKey::Magnitude));

        let html = get_standalone_html(&MapView::from_settings(&Settings::default()), &layer)
            .unwrap();

        assert!(html.contains("<title>USGS Significant Earthquakes, Past Month</title>"));
        assert!(html.contains("window.QUAKEMAP_DATA = {"));
        assert!(html.contains(r##""fillColor":"#a00""##));
        assert!(html.contains("L.circleMarker"));
        assert!(html.contains(".legend {"));
        assert!(!html.contains("/script.js"));
        assert!(!html.contains("PLACEHOLDER"));
        // Only the real closing tags remain.
        assert_eq!(html.matches("</script>").count(), 4);
    }

    #[test]
    fn test_feed_text_cannot_open_markup() {
        let feed: FeatureCollection = serde_json::from_value(json!({
            "metadata": {"title": "<!-- SCRIPT_PLACEHOLDER --><script>"},
            "features": [{
                "id": "<!--<script>",
                "geometry": {"coordinates": [1.0, 2.0, 3.0]},
                "properties": {"mag": 3.0, "time": 0}
            }, {
                "id": "<script>bad",
                "geometry": null,
                "properties": {"mag": 3.0, "time": 0}
            }]
        }))
        .unwrap();
        let layer = build_map_layer(&feed, &MarkerStyler::new(ColorKey::Magnitude));

        let html = get_standalone_html(&MapView::from_settings(&Settings::default()), &layer)
            .unwrap();

        let data_start = html.find("window.QUAKEMAP_DATA = ").unwrap();
        let data_end = data_start + html[data_start..].find("</script>").unwrap();
        let data = &html[data_start..data_end];
        assert!(!data.contains('<'));
        assert!(data.contains(r#""id":"\u003c!--\u003cscript>""#));
        assert!(data.contains(r#""id":"\u003cscript>bad""#));

        // The inlined script appears once and the data did not receive a copy.
        assert_eq!(html.matches("L.circleMarker").count(), 1);
        assert_eq!(html.matches("<script>").count(), 3);
        assert_eq!(html.matches("</script>").count(), 4);
    }
}
