mod aggregate;
mod loader;
mod report;

pub use aggregate::{Aggregation, PassClassifier};
pub use loader::{ContainerConvention, LoadedCase, discover_containers, load_container};
pub use report::{build_summary, render_csv, render_markdown};
