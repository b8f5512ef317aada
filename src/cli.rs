use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "supportgrade",
    version,
    about = "Rule-based grading of support-agent responses and result aggregation"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Score one prediction or a batch of prediction/target pairs")]
    Score(ScoreArgs),
    #[command(about = "Aggregate result containers into pass/fail summaries")]
    Summarize(SummarizeArgs),
    #[command(about = "List metrics and their effective phrase lists")]
    Metrics(MetricsArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum MetricKind {
    JsonValidity,
    ProfessionalTone,
    EscalationDecision,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JsonValidity => "json-validity",
            Self::ProfessionalTone => "professional-tone",
            Self::EscalationDecision => "escalation-decision",
        }
    }

    pub fn all() -> [Self; 3] {
        [
            Self::JsonValidity,
            Self::ProfessionalTone,
            Self::EscalationDecision,
        ]
    }

    pub fn default_pass_threshold(self) -> f64 {
        match self {
            Self::JsonValidity => 1.0,
            Self::ProfessionalTone | Self::EscalationDecision => 0.7,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    #[arg(long, value_enum)]
    pub metric: MetricKind,

    #[arg(long, required_unless_present = "input", conflicts_with = "input")]
    pub prediction: Option<String>,

    #[arg(long, default_value = "", conflicts_with = "input")]
    pub target: String,

    #[arg(long, requires = "output")]
    pub input: Option<PathBuf>,

    #[arg(long, requires = "input")]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub phrases: Option<PathBuf>,

    #[arg(long)]
    pub pass_threshold: Option<f64>,
}

#[derive(Args, Debug, Clone)]
pub struct SummarizeArgs {
    pub root: PathBuf,

    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    #[arg(long = "signal-field")]
    pub signal_fields: Vec<String>,

    #[arg(long = "affirmative")]
    pub affirmative_tokens: Vec<String>,

    #[arg(long, default_value_t = false)]
    pub no_write: bool,
}

#[derive(Args, Debug, Clone)]
pub struct MetricsArgs {
    #[arg(long)]
    pub phrases: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Commands, MetricKind};

    #[test]
    fn score_accepts_inline_prediction_without_target() {
        let cli = Cli::try_parse_from([
            "supportgrade",
            "score",
            "--metric",
            "json-validity",
            "--prediction",
            "{}",
        ])
        .expect("inline score should parse");

        let Commands::Score(args) = cli.command else {
            panic!("expected score command");
        };
        assert_eq!(args.metric, MetricKind::JsonValidity);
        assert_eq!(args.prediction.as_deref(), Some("{}"));
        assert_eq!(args.target, "");
    }

    #[test]
    fn score_batch_requires_output_path() {
        let result = Cli::try_parse_from([
            "supportgrade",
            "score",
            "--metric",
            "professional-tone",
            "--input",
            "pairs.jsonl",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn summarize_collects_repeated_signal_fields() {
        let cli = Cli::try_parse_from([
            "supportgrade",
            "summarize",
            "reports/quickcheck",
            "--signal-field",
            "verdict",
            "--signal-field",
            "status",
        ])
        .expect("summarize should parse");

        let Commands::Summarize(args) = cli.command else {
            panic!("expected summarize command");
        };
        assert_eq!(args.signal_fields, vec!["verdict", "status"]);
        assert!(args.affirmative_tokens.is_empty());
        assert!(!args.no_write);
    }

    #[test]
    fn metric_names_match_value_enum_spelling() {
        for kind in MetricKind::all() {
            let parsed = <MetricKind as clap::ValueEnum>::from_str(kind.as_str(), false)
                .expect("as_str should round-trip through clap");
            assert_eq!(parsed, kind);
        }
    }
}
