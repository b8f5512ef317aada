pub mod metrics;
pub mod score;
pub mod summarize;
