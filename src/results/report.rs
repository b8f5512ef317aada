use std::path::Path;

use anyhow::{Context, Result, anyhow};
use csv::{Writer, WriterBuilder};

use crate::model::{OverallSummary, RecipeSummary, SummaryReport};
use crate::results::Aggregation;
use crate::util::now_utc_string;

pub fn build_summary(aggregation: &Aggregation, source_directory: &Path) -> SummaryReport {
    let overall = aggregation.overall();
    let recipes = aggregation
        .groups()
        .map(|(name, counter)| RecipeSummary {
            recipe: name.to_string(),
            total: counter.total,
            passed: counter.passed,
            pass_rate: counter.pass_rate(),
        })
        .collect();

    SummaryReport {
        generated_at: now_utc_string(),
        source_directory: source_directory.display().to_string(),
        overall: OverallSummary {
            total: overall.total,
            passed: overall.passed,
            pass_rate: overall.pass_rate(),
        },
        recipes,
    }
}

pub fn render_csv(report: &SummaryReport) -> Result<String> {
    let mut overall = WriterBuilder::new().from_writer(Vec::new());
    overall.write_record(["metric", "value"])?;
    overall.write_record(["total", report.overall.total.to_string().as_str()])?;
    overall.write_record(["passed", report.overall.passed.to_string().as_str()])?;
    overall.write_record(["pass_rate", format_rate(report.overall.pass_rate).as_str()])?;

    let mut buffer = finish_csv(overall)?;
    buffer.push(b'\n');

    let mut recipes = WriterBuilder::new().from_writer(buffer);
    recipes.write_record(["recipe", "total", "passed", "pass_rate"])?;
    for recipe in &report.recipes {
        recipes.write_record([
            recipe.recipe.clone(),
            recipe.total.to_string(),
            recipe.passed.to_string(),
            format_rate(recipe.pass_rate),
        ])?;
    }

    String::from_utf8(finish_csv(recipes)?).context("csv summary is not valid UTF-8")
}

pub fn render_markdown(report: &SummaryReport) -> String {
    let mut lines = vec![
        "# Suite Summary".to_string(),
        String::new(),
        format!("- Total cases: {}", report.overall.total),
        format!("- Passed: {}", report.overall.passed),
        format!("- Pass rate: {}", format_percent(report.overall.pass_rate)),
        String::new(),
        "## By Recipe".to_string(),
    ];

    for recipe in &report.recipes {
        lines.push(format!(
            "- {}: {}/{} ({})",
            recipe.recipe,
            recipe.passed,
            recipe.total,
            format_percent(recipe.pass_rate)
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn finish_csv(writer: Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|err| anyhow!("failed to flush csv writer: {err}"))
}

// Debug formatting keeps the trailing ".0" on whole numbers.
fn format_rate(rate: f64) -> String {
    format!("{rate:?}")
}

fn format_percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}
