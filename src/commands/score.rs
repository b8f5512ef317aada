use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::ScoreArgs;
use crate::metrics::{Metric, PhraseConfig, build_metric};
use crate::model::{ScoredCase, ScoringPair};
use crate::util::write_text;

// Absorbs float drift in summed sub-check weights.
const THRESHOLD_TOLERANCE: f64 = 1e-9;

pub fn run(args: ScoreArgs) -> Result<()> {
    let phrases = PhraseConfig::load_or_default(args.phrases.as_deref())?;
    let metric = build_metric(args.metric, &phrases)?;
    let threshold = args
        .pass_threshold
        .unwrap_or_else(|| args.metric.default_pass_threshold());

    match (&args.input, &args.output, &args.prediction) {
        (Some(input), Some(output), _) => score_batch(metric.as_ref(), input, output, threshold),
        (None, _, Some(prediction)) => score_single(metric.as_ref(), prediction, &args.target),
        _ => bail!("either --prediction or both --input and --output are required"),
    }
}

fn score_single(metric: &dyn Metric, prediction: &str, target: &str) -> Result<()> {
    let record = metric.score(prediction, target);
    let rendered =
        serde_json::to_string_pretty(&record).context("failed to serialize score record")?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}").context("failed to write score record")?;
    Ok(())
}

fn score_batch(metric: &dyn Metric, input: &Path, output: &Path, threshold: f64) -> Result<()> {
    let raw = fs::read_to_string(input)
        .with_context(|| format!("failed to read scoring input {}", input.display()))?;

    let (scored, skipped) = score_pairs(metric, &raw, threshold);
    let mut lines = String::new();
    for case in &scored {
        let line = serde_json::to_string(case).context("failed to serialize scored case")?;
        lines.push_str(&line);
        lines.push('\n');
    }
    write_text(output, &lines)?;

    let passed = scored.iter().filter(|case| case.status == "pass").count();
    info!(
        metric = metric.name(),
        input = %input.display(),
        output = %output.display(),
        scored = scored.len(),
        passed,
        skipped,
        threshold,
        "scored batch"
    );
    Ok(())
}

pub fn score_pairs(metric: &dyn Metric, raw: &str, threshold: f64) -> (Vec<ScoredCase>, usize) {
    let mut scored = Vec::new();
    let mut skipped = 0usize;

    for (index, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let pair = match serde_json::from_str::<ScoringPair>(line) {
            Ok(pair) => pair,
            Err(err) => {
                warn!(line = index + 1, error = %err, "skipping unparseable scoring pair");
                skipped += 1;
                continue;
            }
        };

        let target = pair.target.unwrap_or_default();
        let record = metric.score(&pair.prediction, &target);
        let status = if record.score + THRESHOLD_TOLERANCE >= threshold {
            "pass"
        } else {
            "fail"
        };

        scored.push(ScoredCase {
            metric: metric.name().to_string(),
            prediction: pair.prediction,
            target,
            status: status.to_string(),
            record,
        });
    }

    (scored, skipped)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::{Value, json};

    use super::{score_batch, score_pairs};
    use crate::commands::summarize::summarize;
    use crate::metrics::{EscalationDecision, JsonValidity, PhraseConfig};
    use crate::results::{ContainerConvention, PassClassifier};

    #[test]
    fn score_pairs_accepts_target_aliases_and_skips_bad_lines() {
        let metric = EscalationDecision::from_config(&PhraseConfig::default()).unwrap();
        let raw = [
            json!({ "prediction": "Let me transfer you to a specialist. What is your account id?", "target": "escalate to tier 2" }).to_string(),
            "not a pair".to_string(),
            String::new(),
            json!({ "prediction": "Restart the router.", "reference": "Restart it." }).to_string(),
            json!({ "prediction": "Please hold.", "expected": "A manager will call you." }).to_string(),
            json!({ "target": "missing prediction" }).to_string(),
        ]
        .join("\n");

        let (scored, skipped) = score_pairs(&metric, &raw, 0.7);
        assert_eq!(skipped, 2);

        let statuses = scored
            .iter()
            .map(|case| (case.target.as_str(), case.status.as_str()))
            .collect::<Vec<(&str, &str)>>();
        assert_eq!(
            statuses,
            vec![
                ("escalate to tier 2", "pass"),
                ("Restart it.", "fail"),
                ("A manager will call you.", "fail"),
            ]
        );
        assert!(scored.iter().all(|case| case.metric == "escalation-decision"));
    }

    #[test]
    fn scored_cases_serialize_with_flattened_record() {
        let (scored, _) = score_pairs(&JsonValidity, r#"{"prediction": "{}"}"#, 1.0);
        let value = serde_json::to_value(&scored[0]).unwrap();

        assert_eq!(value["status"], json!("pass"));
        assert_eq!(value["score"], json!(1.0));
        assert_eq!(value["feedback"], json!("Valid JSON."));
        assert_eq!(value["details"]["valid"], json!(true));
        assert_eq!(value["target"], json!(""));
    }

    #[test]
    fn batch_output_is_a_loadable_result_container() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("pairs.jsonl");
        let output = dir.path().join("results").join("json_checks.jsonl");
        let pairs = [
            json!({ "prediction": "{\"ok\": true}" }),
            json!({ "prediction": "{oops" }),
            json!({ "prediction": "[1, 2, 3]" }),
        ]
        .iter()
        .map(Value::to_string)
        .collect::<Vec<String>>()
        .join("\n");
        fs::write(&input, pairs).unwrap();

        score_batch(&JsonValidity, &input, &output, 1.0).unwrap();

        let report = summarize(
            &dir.path().join("results"),
            &ContainerConvention::default(),
            &PassClassifier::default(),
        );
        assert_eq!(report.recipes.len(), 1);
        assert_eq!(report.recipes[0].recipe, "json_checks");
        assert_eq!(report.recipes[0].total, 3);
        assert_eq!(report.recipes[0].passed, 2);
    }

    #[test]
    fn missing_batch_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = score_batch(
            &JsonValidity,
            &dir.path().join("absent.jsonl"),
            &dir.path().join("out.jsonl"),
            1.0,
        )
        .expect_err("missing input should fail");
        assert!(err.to_string().contains("failed to read scoring input"));
    }
}
