use std::path::Path;

use anyhow::{Result, bail};
use tracing::{debug, info};

use crate::cli::SummarizeArgs;
use crate::model::SummaryReport;
use crate::results::{
    Aggregation, ContainerConvention, PassClassifier, build_summary, discover_containers,
    load_container, render_csv, render_markdown,
};
use crate::util::{ensure_directory, write_json_pretty, write_text};

pub fn run(args: SummarizeArgs) -> Result<()> {
    if !args.root.is_dir() {
        bail!("result directory not found: {}", args.root.display());
    }

    let classifier = PassClassifier::with_overrides(&args.signal_fields, &args.affirmative_tokens);
    debug!(signal_fields = ?classifier.signal_fields(), "classifying cases");
    let report = summarize(&args.root, &ContainerConvention::default(), &classifier);

    info!(
        root = %args.root.display(),
        total = report.overall.total,
        passed = report.overall.passed,
        pass_rate = report.overall.pass_rate,
        recipes = report.recipes.len(),
        "aggregated results"
    );
    for recipe in &report.recipes {
        debug!(
            recipe = %recipe.recipe,
            total = recipe.total,
            passed = recipe.passed,
            pass_rate = recipe.pass_rate,
            "recipe summary"
        );
    }

    if args.no_write {
        return Ok(());
    }

    let out_dir = args.out_dir.as_deref().unwrap_or(&args.root);
    write_reports(&report, out_dir)?;
    info!(path = %out_dir.display(), "wrote summary.json, summary.csv and summary.md");

    Ok(())
}

pub fn summarize(
    root: &Path,
    convention: &ContainerConvention,
    classifier: &PassClassifier,
) -> SummaryReport {
    let containers = discover_containers(root, convention);
    info!(root = %root.display(), containers = containers.len(), "discovered result containers");

    let mut aggregation = Aggregation::default();
    for path in &containers {
        let partial = Aggregation::fold(load_container(path, convention), classifier);
        aggregation.merge(partial);
    }
    build_summary(&aggregation, root)
}

pub fn write_reports(report: &SummaryReport, out_dir: &Path) -> Result<()> {
    ensure_directory(out_dir)?;
    write_json_pretty(&out_dir.join("summary.json"), report)?;
    write_text(&out_dir.join("summary.csv"), &render_csv(report)?)?;
    write_text(&out_dir.join("summary.md"), &render_markdown(report))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::Value;

    use super::run;
    use crate::cli::SummarizeArgs;

    fn args(root: &std::path::Path) -> SummarizeArgs {
        SummarizeArgs {
            root: root.to_path_buf(),
            out_dir: None,
            signal_fields: Vec::new(),
            affirmative_tokens: Vec::new(),
            no_write: false,
        }
    }

    #[test]
    fn writes_reports_next_to_results_and_stays_stable_on_rerun() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("tone.jsonl"),
            "{\"status\": \"pass\"}\n{\"status\": \"fail\"}\n",
        )
        .unwrap();
        fs::write(dir.path().join("escalation.json"), "{\"cases\": [{\"passed\": true}]}")
            .unwrap();

        run(args(dir.path())).unwrap();
        let first = fs::read_to_string(dir.path().join("summary.csv")).unwrap();
        run(args(dir.path())).unwrap();
        let second = fs::read_to_string(dir.path().join("summary.csv")).unwrap();
        assert_eq!(first, second);

        let summary: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("summary.json")).unwrap())
                .unwrap();
        assert_eq!(summary["overall"]["total"], 3);
        assert_eq!(summary["overall"]["passed"], 2);
        assert_eq!(summary["recipes"][0]["recipe"], "escalation");
        assert_eq!(summary["recipes"][1]["recipe"], "tone");

        let markdown = fs::read_to_string(dir.path().join("summary.md")).unwrap();
        assert!(markdown.contains("- tone: 1/2 (50.00%)"));
    }

    #[test]
    fn custom_signal_field_and_out_dir_are_honoured() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("results");
        let out_dir = dir.path().join("reports");
        fs::create_dir_all(&results).unwrap();
        fs::write(
            results.join("judge.jsonl"),
            "{\"verdict\": \"ok\", \"status\": \"fail\"}\n{\"verdict\": \"bad\"}\n",
        )
        .unwrap();

        let mut args = args(&results);
        args.out_dir = Some(out_dir.clone());
        args.signal_fields = vec!["verdict".to_string()];
        run(args).unwrap();

        assert!(!results.join("summary.json").exists());
        let summary: Value =
            serde_json::from_str(&fs::read_to_string(out_dir.join("summary.json")).unwrap())
                .unwrap();
        assert_eq!(summary["overall"]["passed"], 1);
        assert_eq!(summary["overall"]["pass_rate"], 0.5);
    }

    #[test]
    fn no_write_leaves_directory_untouched() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.jsonl"), "{\"status\": true}\n").unwrap();

        let mut args = args(dir.path());
        args.no_write = true;
        run(args).unwrap();

        assert!(!dir.path().join("summary.json").exists());
        assert!(!dir.path().join("summary.md").exists());
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(args(&dir.path().join("nope"))).expect_err("missing root should fail");
        assert!(err.to_string().contains("result directory not found"));
    }
}
