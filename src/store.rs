use std::sync::{Arc, RwLock};

use crate::processing::MapLayer;

/// Result of the start-up fetch as seen by request handlers.
#[derive(Debug, Clone, Default)]
pub enum Snapshot {
    #[default]
    Loading,
    Ready(Arc<MapLayer>),
    /// Fetch or decode failure, shown to the user
    Failed(String),
}

// Shared holder for the one map layer built per run
#[derive(Clone, Default)]
pub struct QuakeStore {
    snapshot: Arc<RwLock<Snapshot>>,
}

impl QuakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_layer(&self, layer: MapLayer) {
        self.replace(Snapshot::Ready(Arc::new(layer)));
    }

    pub fn set_failure(&self, message: impl Into<String>) {
        self.replace(Snapshot::Failed(message.into()));
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn marker_count(&self) -> usize {
        match self.snapshot() {
            Snapshot::Ready(layer) => layer.markers.len(),
            _ => 0,
        }
    }

    fn replace(&self, snapshot: Snapshot) {
        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::{ColorKey, MarkerStyler};
    use crate::processing::build_map_layer;
    use crate::quake::FeatureCollection;

    #[test]
    fn test_store_transitions() {
        let store = QuakeStore::new();
        assert!(matches!(store.snapshot(), Snapshot::Loading));
        assert_eq!(store.marker_count(), 0);

        store.set_failure("feed answered with HTTP 503");
        match store.snapshot() {
            Snapshot::Failed(message) => assert!(message.contains("503")),
            other => panic!("unexpected snapshot {other:?}"),
        }

        let layer = build_map_layer(
            &FeatureCollection::default(),
            &MarkerStyler::new(ColorKey::Magnitude),
        );
        let shared = store.clone();
        shared.set_layer(layer);
        assert!(matches!(store.snapshot(), Snapshot::Ready(_)));
    }
}
