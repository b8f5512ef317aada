use std::collections::BTreeMap;

use serde_json::Value;

use crate::model::ScoreRecord;

const FEEDBACK_SEPARATOR: &str = "; ";

#[derive(Debug, Clone)]
pub struct ScoreComposer {
    cap: f64,
    total: f64,
    feedback: Vec<String>,
    details: BTreeMap<String, Value>,
}

impl ScoreComposer {
    pub fn capped_at(cap: f64) -> Self {
        Self {
            cap,
            total: 0.0,
            feedback: Vec::new(),
            details: BTreeMap::new(),
        }
    }

    pub fn check(
        &mut self,
        passed: bool,
        weight: f64,
        pass_line: impl Into<String>,
        fail_line: impl Into<String>,
    ) -> bool {
        if passed {
            self.total += weight;
            self.feedback.push(pass_line.into());
        } else {
            self.feedback.push(fail_line.into());
        }
        passed
    }

    pub fn detail(&mut self, name: &str, value: impl Into<Value>) {
        self.details.insert(name.to_string(), value.into());
    }

    pub fn finish(self) -> ScoreRecord {
        ScoreRecord {
            score: self.total.clamp(0.0, self.cap),
            feedback: self.feedback.join(FEEDBACK_SEPARATOR),
            details: self.details,
        }
    }
}
