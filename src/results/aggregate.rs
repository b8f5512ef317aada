use std::collections::BTreeMap;

use serde_json::Value;

use crate::model::PassCounter;
use crate::results::LoadedCase;

const DEFAULT_SIGNAL_FIELDS: &[&str] = &["status", "passed", "score"];
const DEFAULT_AFFIRMATIVE_TOKENS: &[&str] = &["pass", "passed", "ok", "true"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassClassifier {
    signal_fields: Vec<String>,
    affirmative_tokens: Vec<String>,
}

impl Default for PassClassifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_SIGNAL_FIELDS.iter().map(|field| field.to_string()),
            DEFAULT_AFFIRMATIVE_TOKENS.iter().map(|token| token.to_string()),
        )
    }
}

impl PassClassifier {
    pub fn new(
        signal_fields: impl IntoIterator<Item = String>,
        affirmative_tokens: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            signal_fields: signal_fields.into_iter().collect(),
            affirmative_tokens: affirmative_tokens
                .into_iter()
                .map(|token| token.to_lowercase())
                .collect(),
        }
    }

    pub fn with_overrides(signal_fields: &[String], affirmative_tokens: &[String]) -> Self {
        let defaults = Self::default();
        Self::new(
            if signal_fields.is_empty() {
                defaults.signal_fields
            } else {
                signal_fields.to_vec()
            },
            if affirmative_tokens.is_empty() {
                defaults.affirmative_tokens
            } else {
                affirmative_tokens.to_vec()
            },
        )
    }

    pub fn signal_fields(&self) -> &[String] {
        &self.signal_fields
    }

    pub fn is_pass(&self, record: &Value) -> bool {
        self.signal(record)
            .map(|signal| self.interpret(signal))
            .unwrap_or(false)
    }

    fn signal<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        let object = record.as_object()?;
        self.signal_fields
            .iter()
            .filter_map(|field| object.get(field))
            .find(|value| !value.is_null())
    }

    fn interpret(&self, signal: &Value) -> bool {
        match signal {
            Value::Bool(flag) => *flag,
            Value::Number(number) => number.as_f64().map(|value| value != 0.0).unwrap_or(false),
            Value::String(text) => {
                let lowered = text.to_lowercase();
                self.affirmative_tokens.iter().any(|token| *token == lowered)
            }
            Value::Null | Value::Array(_) | Value::Object(_) => false,
        }
    }
}

// Overall totals always equal the sum over groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    overall: PassCounter,
    groups: BTreeMap<String, PassCounter>,
}

impl Aggregation {
    pub fn fold(cases: impl IntoIterator<Item = LoadedCase>, classifier: &PassClassifier) -> Self {
        let mut aggregation = Self::default();
        for case in cases {
            let passed = classifier.is_pass(&case.record);
            aggregation.record(&case.group, passed);
        }
        aggregation
    }

    pub fn record(&mut self, group: &str, passed: bool) {
        self.groups.entry(group.to_string()).or_default().record(passed);
        self.overall.record(passed);
    }

    pub fn merge(&mut self, other: Aggregation) {
        self.overall.absorb(other.overall);
        for (group, counter) in other.groups {
            self.groups.entry(group).or_default().absorb(counter);
        }
    }

    pub fn overall(&self) -> PassCounter {
        self.overall
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, PassCounter)> {
        self.groups
            .iter()
            .map(|(name, counter)| (name.as_str(), *counter))
    }

    #[cfg(test)]
    pub fn group(&self, name: &str) -> Option<PassCounter> {
        self.groups.get(name).copied()
    }
}
