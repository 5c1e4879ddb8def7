//! services/api/src/adapters/classifier.rs
//!
//! This module contains the adapter for the external text classifier.
//! It implements the `MoodClassifier` port by running a script that prints
//! `{mood, confidence, all_predictions}` or `{error}` as JSON on stdout.

use async_trait::async_trait;
use moodify_core::{
    domain::{Mood, Prediction},
    ports::{MoodClassifier, PortError, PortResult},
};
use serde::Deserialize;
use std::ffi::{OsStr, OsString};
use std::time::Duration;
use tracing::warn;

use super::process::BoundedCommand;
use crate::config::{ScriptCommand, MAX_PROCESS_OUTPUT_BYTES};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `MoodClassifier` by shelling out to a script.
///
/// The text to classify is passed as the final argument.
#[derive(Clone, Debug)]
pub struct SubprocessClassifier {
    program: String,
    args: Vec<OsString>,
    timeout: Duration,
    max_output: usize,
}

impl SubprocessClassifier {
    /// Creates a new `SubprocessClassifier`.
    pub fn new(program: impl Into<String>, args: Vec<OsString>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
            max_output: MAX_PROCESS_OUTPUT_BYTES,
        }
    }

    pub fn from_script(command: &ScriptCommand, timeout: Duration) -> Self {
        Self::new(
            command.program.clone(),
            vec![command.script.clone().into_os_string()],
            timeout,
        )
    }

    pub fn with_max_output(mut self, max_output: usize) -> Self {
        self.max_output = max_output;
        self
    }
}

//=========================================================================================
// Wire Records
//=========================================================================================

#[derive(Deserialize)]
struct ClassifierRecord {
    mood: Option<String>,
    confidence: Option<f64>,
    #[serde(default)]
    all_predictions: Vec<PredictionRecord>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct PredictionRecord {
    mood: String,
    confidence: f64,
}

impl PredictionRecord {
    fn to_domain(self) -> PortResult<Prediction> {
        let mood = self
            .mood
            .parse::<Mood>()
            .map_err(|e| PortError::Unexpected(format!("Classifier returned {}", e)))?;
        Ok(Prediction::new(mood, self.confidence))
    }
}

/// Parses classifier stdout into predictions sorted by confidence, highest first.
pub fn parse_classifier_output(stdout: &[u8]) -> PortResult<Vec<Prediction>> {
    let record: ClassifierRecord = serde_json::from_slice(stdout)
        .map_err(|e| PortError::Unexpected(format!("Classifier output is not valid JSON: {}", e)))?;

    if let Some(error) = record.error {
        return Err(PortError::Unexpected(format!("Classifier reported an error: {}", error)));
    }

    let mut predictions = record
        .all_predictions
        .into_iter()
        .map(PredictionRecord::to_domain)
        .collect::<PortResult<Vec<_>>>()?;

    if predictions.is_empty() {
        if let (Some(mood), Some(confidence)) = (record.mood, record.confidence) {
            predictions.push(PredictionRecord { mood, confidence }.to_domain()?);
        }
    }

    if predictions.is_empty() {
        return Err(PortError::Unexpected(
            "Classifier returned no predictions".to_string(),
        ));
    }

    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    Ok(predictions)
}

//=========================================================================================
// `MoodClassifier` Trait Implementation
//=========================================================================================

#[async_trait]
impl MoodClassifier for SubprocessClassifier {
    async fn classify(&self, text: &str) -> PortResult<Vec<Prediction>> {
        let command = self
            .args
            .iter()
            .fold(BoundedCommand::new(self.program.clone()), |cmd, arg| cmd.arg(arg))
            .arg(OsStr::new(text))
            .with_timeout(self.timeout)
            .with_max_output(self.max_output);

        let output = command.run().await?;

        if !output.stderr.trim().is_empty() {
            warn!(stderr = %output.stderr.trim(), "Classifier wrote to stderr");
        }

        if !output.status.success() {
            // The script reports failures as `{error}` before exiting non-zero.
            let detail = parse_classifier_output(&output.stdout)
                .err()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no error detail".to_string());
            return Err(PortError::Unexpected(format!(
                "Classifier exited with {}: {}",
                output.status, detail
            )));
        }

        parse_classifier_output(&output.stdout)
    }
}
