use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::error;

use crate::html_template::{asset_text, get_map_html};
use crate::legend::Legend;
use crate::settings::Settings;
use crate::store::Snapshot;

use super::state::AppState;

pub async fn index_html(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    get_map_html(&state.view).map(Html).map_err(|e| {
        error!("Failed to render map page: {:#}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

pub async fn style_css() -> Result<Response, StatusCode> {
    serve_asset("style.css", "text/css")
}

pub async fn script_js() -> Result<Response, StatusCode> {
    serve_asset("script.js", "application/javascript")
}

fn serve_asset(name: &str, content_type: &'static str) -> Result<Response, StatusCode> {
    let content = asset_text(name).map_err(|e| {
        error!("{:#}", e);
        StatusCode::NOT_FOUND
    })?;
    Ok(([(header::CONTENT_TYPE, content_type)], content).into_response())
}

// Styled markers, legend and statistics built at start-up
pub async fn get_earthquakes(State(state): State<AppState>) -> Response {
    match state.store.snapshot() {
        Snapshot::Ready(layer) => Json(layer).into_response(),
        Snapshot::Failed(message) => unavailable(&message),
        Snapshot::Loading => unavailable("Earthquake data is still loading"),
    }
}

fn unavailable(message: &str) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "status": "error",
            "message": message,
        })),
    )
        .into_response()
}

pub async fn get_legend(State(state): State<AppState>) -> Json<Legend> {
    Json(state.legend.as_ref().clone())
}

pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(state.settings.as_ref().clone())
}

#[cfg(test)]
mod tests {
    use crate::marker::{ColorKey, MarkerStyler};
    use crate::processing::build_map_layer;
    use crate::quake::FeatureCollection;
    use crate::server::{create_app, AppState};
    use crate::settings::Settings;
    use crate::store::QuakeStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn get(state: AppState, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = create_app(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn ready_state(color_by: ColorKey) -> AppState {
        let feed: FeatureCollection = serde_json::from_value(json!({
            "features": [
                {"id": "a", "geometry": {"coordinates": [-100, 40, 12]},
                 "properties": {"mag": 4.2, "place": "Test", "time": 1700000000000i64}},
                {"id": "b", "geometry": {"coordinates": [-100, 40]},
                 "properties": {"mag": 1.0, "time": 1700000000000i64}}
            ]
        }))
        .unwrap();
        let store = QuakeStore::new();
        store.set_layer(build_map_layer(&feed, &MarkerStyler::new(color_by)));
        AppState::new(
            store,
            Settings {
                color_by,
                ..Settings::default()
            },
        )
    }

    #[tokio::test]
    async fn test_earthquakes_endpoint() {
        let (status, body) = get(ready_state(ColorKey::Depth), "/api/earthquakes").await;
        assert_eq!(status, StatusCode::OK);

        let layer: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(layer["markers"].as_array().unwrap().len(), 1);
        assert_eq!(layer["markers"][0]["style"]["fillColor"], "#ee0");
        assert_eq!(layer["markers"][0]["lat_lng"], json!([40.0, -100.0]));
        assert_eq!(layer["rejected"][0]["id"], "b");
        assert_eq!(layer["stats"]["total"], 2);
        assert_eq!(layer["legend"]["title"], "Depth (km)");
    }

    #[tokio::test]
    async fn test_failed_fetch_is_reported() {
        let store = QuakeStore::new();
        store.set_failure("HTTP request failed: operation timed out");
        let state = AppState::new(store, Settings::default());

        let (status, body) = get(state, "/api/earthquakes").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["message"], "HTTP request failed: operation timed out");
    }

    #[tokio::test]
    async fn test_loading_state() {
        let state = AppState::new(QuakeStore::new(), Settings::default());
        let (status, _) = get(state, "/api/earthquakes").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_page_and_assets() {
        let state = ready_state(ColorKey::Magnitude);

        let (status, body) = get(state.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("leaflet@1.9.4"));

        let (status, body) = get(state.clone(), "/script.js").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("/api/earthquakes"));

        let (status, _) = get(state, "/style.css").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_legend_and_settings() {
        let state = ready_state(ColorKey::Magnitude);

        let (_, body) = get(state.clone(), "/api/legend").await;
        let legend: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(legend["entries"][0]["label"], "< 1");
        assert_eq!(legend["entries"][5]["label"], "6+");
        assert_eq!(legend["position"], "bottomright");

        let (_, body) = get(state, "/api/settings").await;
        let settings: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(settings["color_by"], "magnitude");
        assert_eq!(settings["port"], 3001);
    }
}
