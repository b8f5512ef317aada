use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: f64,
    pub feedback: String,
    #[serde(default)]
    pub details: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringPair {
    pub prediction: String,
    #[serde(default, alias = "reference", alias = "expected")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredCase {
    pub metric: String,
    pub prediction: String,
    pub target: String,
    pub status: String,
    #[serde(flatten)]
    pub record: ScoreRecord,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassCounter {
    pub total: usize,
    pub passed: usize,
}

impl PassCounter {
    pub fn record(&mut self, passed: bool) {
        self.total += 1;
        if passed {
            self.passed += 1;
        }
    }

    pub fn absorb(&mut self, other: PassCounter) {
        self.total += other.total;
        self.passed += other.passed;
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallSummary {
    pub total: usize,
    pub passed: usize,
    pub pass_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeSummary {
    pub recipe: String,
    pub total: usize,
    pub passed: usize,
    pub pass_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub generated_at: String,
    pub source_directory: String,
    pub overall: OverallSummary,
    pub recipes: Vec<RecipeSummary>,
}
