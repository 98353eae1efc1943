use std::sync::Arc;

use crate::html_template::MapView;
use crate::legend::Legend;
use crate::settings::Settings;
use crate::store::QuakeStore;

// Application state shared by the handlers
#[derive(Clone)]
pub struct AppState {
    pub store: QuakeStore,
    pub settings: Arc<Settings>,
    pub view: Arc<MapView>,
    pub legend: Arc<Legend>,
}

impl AppState {
    pub fn new(store: QuakeStore, settings: Settings) -> Self {
        let view = MapView::from_settings(&settings);
        let legend = Legend::for_key(settings.color_by);
        Self {
            store,
            settings: Arc::new(settings),
            view: Arc::new(view),
            legend: Arc::new(legend),
        }
    }
}
