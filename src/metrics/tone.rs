use anyhow::Result;

use crate::metrics::{Metric, PhraseConfig, PhraseMatcher, ScoreComposer};
use crate::model::ScoreRecord;

const EMPATHY_WEIGHT: f64 = 0.3;
const PROFESSIONAL_WEIGHT: f64 = 0.2;
const SOLUTION_WEIGHT: f64 = 0.3;
const LENGTH_WEIGHT: f64 = 0.2;
const MIN_WORDS: usize = 20;
const MAX_WORDS: usize = 150;

#[derive(Debug, Clone)]
pub struct ProfessionalTone {
    empathy: PhraseMatcher,
    casual_terms: PhraseMatcher,
    solution: PhraseMatcher,
}

impl ProfessionalTone {
    pub fn from_config(phrases: &PhraseConfig) -> Result<Self> {
        Ok(Self {
            empathy: PhraseMatcher::substring(&phrases.empathy)?,
            casual_terms: PhraseMatcher::whole_word(&phrases.casual_terms)?,
            solution: PhraseMatcher::substring(&phrases.solution)?,
        })
    }
}

impl Metric for ProfessionalTone {
    fn name(&self) -> &'static str {
        "professional-tone"
    }

    fn score(&self, prediction: &str, _target: &str) -> ScoreRecord {
        let mut composer = ScoreComposer::capped_at(1.0);

        let empathy_found = composer.check(
            self.empathy.is_match(prediction),
            EMPATHY_WEIGHT,
            "✓ Shows empathy",
            "✗ Lacks empathetic language",
        );

        let professional_language = composer.check(
            !self.casual_terms.is_match(prediction),
            PROFESSIONAL_WEIGHT,
            "✓ Professional language",
            "✗ Contains unprofessional terms",
        );

        let solution_oriented = composer.check(
            self.solution.is_match(prediction),
            SOLUTION_WEIGHT,
            "✓ Solution-oriented",
            "✗ Not solution-focused",
        );

        let word_count = prediction.split_whitespace().count();
        composer.check(
            (MIN_WORDS..=MAX_WORDS).contains(&word_count),
            LENGTH_WEIGHT,
            "✓ Appropriate response length",
            format!("✗ Response length issue ({word_count} words)"),
        );

        composer.detail("empathy_found", empathy_found);
        composer.detail("professional_language", professional_language);
        composer.detail("solution_oriented", solution_oriented);
        composer.detail("word_count", word_count);
        composer.finish()
    }
}
