use std::collections::BTreeMap;

use serde_json::Value;

use crate::metrics::Metric;
use crate::model::ScoreRecord;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonValidity;

impl Metric for JsonValidity {
    fn name(&self) -> &'static str {
        "json-validity"
    }

    fn score(&self, prediction: &str, _target: &str) -> ScoreRecord {
        let (score, feedback) = match serde_json::from_str::<Value>(prediction) {
            Ok(_) => (1.0, "Valid JSON.".to_string()),
            Err(err) => (0.0, format!("Invalid JSON: {err}")),
        };

        let mut details = BTreeMap::new();
        details.insert("valid".to_string(), Value::Bool(score == 1.0));

        ScoreRecord {
            score,
            feedback,
            details,
        }
    }
}
