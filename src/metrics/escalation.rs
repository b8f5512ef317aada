use anyhow::Result;

use crate::metrics::{Metric, PhraseConfig, PhraseMatcher, ScoreComposer};
use crate::model::ScoreRecord;

const AGREEMENT_WEIGHT: f64 = 0.4;
const HANDOFF_WEIGHT: f64 = 0.3;
const INFORMATION_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone)]
pub struct EscalationDecision {
    escalation: PhraseMatcher,
    handoff_process: PhraseMatcher,
    information_gathering: PhraseMatcher,
}

impl EscalationDecision {
    pub fn from_config(phrases: &PhraseConfig) -> Result<Self> {
        Ok(Self {
            escalation: PhraseMatcher::substring(&phrases.escalation)?,
            handoff_process: PhraseMatcher::substring(&phrases.handoff_process)?,
            information_gathering: PhraseMatcher::substring(&phrases.information_gathering)?,
        })
    }
}

impl Metric for EscalationDecision {
    fn name(&self) -> &'static str {
        "escalation-decision"
    }

    fn score(&self, prediction: &str, target: &str) -> ScoreRecord {
        let mut composer = ScoreComposer::capped_at(1.0);

        let escalation_needed = self.escalation.is_match(target);
        let escalation_identified = self.escalation.is_match(prediction);

        let fail_line = if escalation_needed {
            "✗ Missed required escalation"
        } else {
            "✗ Unnecessary escalation suggested"
        };
        let pass_line = if escalation_needed {
            "✓ Correctly identified escalation need"
        } else {
            "✓ Correctly handled without escalation"
        };
        composer.check(
            escalation_needed == escalation_identified,
            AGREEMENT_WEIGHT,
            pass_line,
            fail_line,
        );

        // Handoff quality is only judged when the reply actually hands off.
        if escalation_identified {
            composer.check(
                self.handoff_process.is_match(prediction),
                HANDOFF_WEIGHT,
                "✓ Proper escalation process",
                "✗ Unclear escalation process",
            );
        }

        let gathers_information = composer.check(
            self.information_gathering.is_match(prediction),
            INFORMATION_WEIGHT,
            "✓ Gathers relevant information",
            "✗ Doesn't gather sufficient information",
        );

        composer.detail("escalation_needed", escalation_needed);
        composer.detail("escalation_identified", escalation_identified);
        composer.detail("gathers_information", gathers_information);
        composer.finish()
    }
}
