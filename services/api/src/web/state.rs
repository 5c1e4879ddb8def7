//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use moodify_core::{
    ports::{CatalogService, MoodClassifier, StorageBackend, TrackRanker},
    MoodDetector, Recommender, SessionStore,
};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: SessionStore,
    pub detector: MoodDetector,
    pub recommender: Recommender,
}

impl AppState {
    /// Wires the core services on top of the given port implementations.
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        classifier: Arc<dyn MoodClassifier>,
        catalog: Arc<dyn CatalogService>,
        ranker: Arc<dyn TrackRanker>,
    ) -> Self {
        let store = SessionStore::new(backend);
        Self {
            detector: MoodDetector::new(classifier, store.clone()),
            recommender: Recommender::new(catalog, ranker),
            store,
        }
    }
}
