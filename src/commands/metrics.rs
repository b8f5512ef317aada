use std::collections::BTreeMap;
use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::{MetricKind, MetricsArgs};
use crate::metrics::{PhraseConfig, build_metric};

#[derive(Debug, Serialize)]
struct MetricListing<'a> {
    metric: &'static str,
    default_pass_threshold: f64,
    phrase_lists: BTreeMap<&'static str, &'a [String]>,
}

pub fn run(args: MetricsArgs) -> Result<()> {
    let phrases = PhraseConfig::load_or_default(args.phrases.as_deref())?;

    let mut listings = Vec::new();
    for kind in MetricKind::all() {
        // Building surfaces override files that do not compile into matchers.
        build_metric(kind, &phrases)?;
        listings.push(describe(kind, &phrases));
    }

    let rendered =
        serde_json::to_string_pretty(&listings).context("failed to serialize metric listing")?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}").context("failed to write metric listing")?;

    info!(metrics = listings.len(), "listed metrics");
    Ok(())
}

fn describe(kind: MetricKind, phrases: &PhraseConfig) -> MetricListing<'_> {
    let phrase_lists = match kind {
        MetricKind::JsonValidity => BTreeMap::new(),
        MetricKind::ProfessionalTone => BTreeMap::from([
            ("empathy", phrases.empathy.as_slice()),
            ("casual_terms", phrases.casual_terms.as_slice()),
            ("solution", phrases.solution.as_slice()),
        ]),
        MetricKind::EscalationDecision => BTreeMap::from([
            ("escalation", phrases.escalation.as_slice()),
            ("handoff_process", phrases.handoff_process.as_slice()),
            (
                "information_gathering",
                phrases.information_gathering.as_slice(),
            ),
        ]),
    };

    MetricListing {
        metric: kind.as_str(),
        default_pass_threshold: kind.default_pass_threshold(),
        phrase_lists,
    }
}

#[cfg(test)]
mod tests {
    use super::describe;
    use crate::cli::MetricKind;
    use crate::metrics::PhraseConfig;

    #[test]
    fn listing_exposes_only_the_phrase_lists_a_metric_reads() {
        let phrases = PhraseConfig::default();

        let json = describe(MetricKind::JsonValidity, &phrases);
        assert!(json.phrase_lists.is_empty());
        assert_eq!(json.default_pass_threshold, 1.0);

        let tone = describe(MetricKind::ProfessionalTone, &phrases);
        assert_eq!(
            tone.phrase_lists.keys().copied().collect::<Vec<&str>>(),
            vec!["casual_terms", "empathy", "solution"]
        );

        let escalation = describe(MetricKind::EscalationDecision, &phrases);
        assert_eq!(escalation.metric, "escalation-decision");
        assert!(escalation.phrase_lists["handoff_process"].contains(&"transfer".to_string()));
    }
}
