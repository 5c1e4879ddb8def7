//! crates/moodify_core/src/detection.rs
//!
//! Turns free text into a stored mood session by way of the classifier port.

use std::sync::Arc;
use tracing::info;

use crate::domain::{Detection, ScoredMood, MAX_ALTERNATIVE_MOODS};
use crate::ports::{MoodClassifier, PortError, PortResult};
use crate::store::SessionStore;

#[derive(Clone)]
pub struct MoodDetector {
    classifier: Arc<dyn MoodClassifier>,
    store: SessionStore,
}

impl MoodDetector {
    pub fn new(classifier: Arc<dyn MoodClassifier>, store: SessionStore) -> Self {
        Self { classifier, store }
    }

    /// Classifies `text`, records the result and returns the rounded ranking.
    ///
    /// The text must already have been validated by the caller.
    pub async fn detect(&self, text: &str) -> PortResult<Detection> {
        let predictions: Vec<ScoredMood> = self
            .classifier
            .classify(text)
            .await?
            .iter()
            .map(|p| p.rounded())
            .collect();

        let primary = *predictions.first().ok_or_else(|| {
            PortError::Unexpected("Classifier returned no predictions".to_string())
        })?;

        // Zero-confidence runners-up are kept.
        let alternative_moods = predictions
            .iter()
            .skip(1)
            .take(MAX_ALTERNATIVE_MOODS)
            .map(ScoredMood::to_string)
            .collect();

        let session = self
            .store
            .create_session(text, primary.mood, primary.confidence, alternative_moods)
            .await?;

        info!(
            session_id = %session.id,
            mood = %primary.mood,
            confidence = primary.confidence,
            "Mood detected"
        );

        Ok(Detection {
            mood: primary.mood,
            confidence: primary.confidence,
            predictions,
            session_id: session.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Mood, Prediction};
    use crate::memory::InMemoryBackend;
    use crate::ports::StorageBackend;
    use async_trait::async_trait;

    struct FixedClassifier(Vec<Prediction>);

    #[async_trait]
    impl MoodClassifier for FixedClassifier {
        async fn classify(&self, _text: &str) -> PortResult<Vec<Prediction>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenClassifier;

    #[async_trait]
    impl MoodClassifier for BrokenClassifier {
        async fn classify(&self, _text: &str) -> PortResult<Vec<Prediction>> {
            Err(PortError::Timeout("classifier took too long".to_string()))
        }
    }

    fn detector(classifier: impl MoodClassifier + 'static) -> (MoodDetector, Arc<InMemoryBackend>) {
        let backend = Arc::new(InMemoryBackend::new());
        let store = SessionStore::new(backend.clone());
        (MoodDetector::new(Arc::new(classifier), store), backend)
    }

    #[tokio::test]
    async fn stressed_text_is_recorded_as_anxious() {
        let (detector, backend) = detector(FixedClassifier(vec![
            Prediction::new(Mood::Anxious, 70.0),
            Prediction::new(Mood::Sad, 20.0),
            Prediction::new(Mood::Calm, 10.0),
        ]));

        let detection = detector
            .detect("I feel stressed and overwhelmed")
            .await
            .unwrap();

        assert_eq!(detection.mood, Mood::Anxious);
        assert_eq!(detection.confidence, 70);
        assert_eq!(detection.predictions.len(), 3);

        let stored = backend.scan_recent(10).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, detection.session_id);
        assert_eq!(stored[0].mood, Mood::Anxious);
        assert_eq!(stored[0].confidence, 70);
        assert_eq!(stored[0].alternative_moods, vec!["sad:20", "calm:10"]);
    }

    #[tokio::test]
    async fn at_most_three_alternatives_are_kept() {
        let (detector, backend) = detector(FixedClassifier(vec![
            Prediction::new(Mood::Happy, 51.6),
            Prediction::new(Mood::Energetic, 20.2),
            Prediction::new(Mood::Calm, 14.5),
            Prediction::new(Mood::Sad, 9.1),
            Prediction::new(Mood::Angry, 0.0),
        ]));

        let detection = detector.detect("what a day").await.unwrap();
        assert_eq!(detection.confidence, 52);
        assert_eq!(detection.predictions.len(), 5);

        let stored = backend.scan_recent(1).await.unwrap();
        let alternatives = &stored[0].alternative_moods;
        assert_eq!(alternatives, &vec!["energetic:20", "calm:15", "sad:9"]);
        for entry in alternatives {
            let (mood, confidence) = entry.split_once(':').unwrap();
            assert!(mood.parse::<Mood>().is_ok());
            assert!(confidence.parse::<u8>().is_ok());
        }
    }

    #[tokio::test]
    async fn single_prediction_has_no_alternatives() {
        let (detector, backend) = detector(FixedClassifier(vec![Prediction::new(Mood::Calm, 99.0)]));
        detector.detect("fine").await.unwrap();
        let stored = backend.scan_recent(1).await.unwrap();
        assert!(stored[0].alternative_moods.is_empty());
    }

    #[tokio::test]
    async fn classifier_failure_stores_nothing() {
        let (detector, backend) = detector(BrokenClassifier);
        let err = detector.detect("anything").await.unwrap_err();
        assert!(matches!(err, PortError::Timeout(_)));
        assert_eq!(backend.session_count(), 0);
    }

    #[tokio::test]
    async fn empty_prediction_list_is_an_error() {
        let (detector, backend) = detector(FixedClassifier(Vec::new()));
        assert!(detector.detect("anything").await.is_err());
        assert_eq!(backend.session_count(), 0);
    }
}
