mod composer;
mod escalation;
mod json_validity;
pub mod phrases;
mod tone;

use anyhow::Result;

use crate::cli::MetricKind;
use crate::model::ScoreRecord;

pub use composer::ScoreComposer;
pub use escalation::EscalationDecision;
pub use json_validity::JsonValidity;
pub use phrases::{PhraseConfig, PhraseMatcher};
pub use tone::ProfessionalTone;

pub trait Metric: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, prediction: &str, target: &str) -> ScoreRecord;
}

pub fn build_metric(kind: MetricKind, phrases: &PhraseConfig) -> Result<Box<dyn Metric>> {
    let metric: Box<dyn Metric> = match kind {
        MetricKind::JsonValidity => Box::new(JsonValidity),
        MetricKind::ProfessionalTone => Box::new(ProfessionalTone::from_config(phrases)?),
        MetricKind::EscalationDecision => Box::new(EscalationDecision::from_config(phrases)?),
    };
    Ok(metric)
}
