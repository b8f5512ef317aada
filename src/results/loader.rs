use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

const RESERVED_FILENAMES: &[&str] = &[
    "summary.json",
    "run_metadata.json",
    "placeholder_results.json",
];
const CASES_KEY: &str = "cases";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ContainerFormat {
    LineDelimited,
    Document,
    Opaque,
}

#[derive(Debug, Clone)]
pub struct ContainerConvention {
    pub line_delimited: Vec<String>,
    pub document: Vec<String>,
    pub opaque: Vec<String>,
    pub reserved_filenames: Vec<String>,
}

impl Default for ContainerConvention {
    fn default() -> Self {
        Self {
            line_delimited: vec!["jsonl".to_string(), "ndjson".to_string()],
            document: vec!["json".to_string()],
            opaque: vec!["csv".to_string()],
            reserved_filenames: RESERVED_FILENAMES.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl ContainerConvention {
    pub fn format_of(&self, path: &Path) -> Option<ContainerFormat> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        let listed = |extensions: &[String]| extensions.iter().any(|value| *value == extension);

        if listed(&self.line_delimited) {
            Some(ContainerFormat::LineDelimited)
        } else if listed(&self.document) {
            Some(ContainerFormat::Document)
        } else if listed(&self.opaque) {
            Some(ContainerFormat::Opaque)
        } else {
            None
        }
    }

    fn is_reserved(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| self.reserved_filenames.iter().any(|reserved| reserved == name))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCase {
    pub group: String,
    pub record: Value,
}

// Only place where malformed container content is swallowed.
pub fn parse_or_default<T>(raw: &[u8], origin: impl Display) -> T
where
    T: DeserializeOwned + Default,
{
    match serde_json::from_slice(raw) {
        Ok(value) => value,
        Err(err) => {
            debug!(origin = %origin, error = %err, "skipping unparseable content");
            T::default()
        }
    }
}

pub fn load_container(path: &Path, convention: &ContainerConvention) -> Vec<LoadedCase> {
    let Some(group) = group_name(path) else {
        warn!(path = %path.display(), "container has no usable file stem; skipping");
        return Vec::new();
    };

    let records = match convention.format_of(path) {
        Some(ContainerFormat::LineDelimited) => read_line_delimited(path),
        Some(ContainerFormat::Document) => read_document(path),
        Some(ContainerFormat::Opaque) | None => Vec::new(),
    };

    debug!(path = %path.display(), group = %group, cases = records.len(), "loaded container");
    records
        .into_iter()
        .map(|record| LoadedCase {
            group: group.clone(),
            record,
        })
        .collect()
}

pub fn discover_containers(root: &Path, convention: &ContainerConvention) -> Vec<PathBuf> {
    let mut containers = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %dir.display(), error = %err, "failed to read directory; skipping");
                continue;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(path = %dir.display(), error = %err, "failed to read directory entry");
                    continue;
                }
            };
            let path = entry.path();
            let is_dir = entry
                .file_type()
                .map(|file_type| file_type.is_dir())
                .unwrap_or(false);

            if is_dir {
                pending.push(path);
            } else if path.is_file()
                && convention.format_of(&path).is_some()
                && !convention.is_reserved(&path)
            {
                containers.push(path);
            }
        }
    }

    containers.sort();
    containers
}

fn group_name(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}

fn read_container(path: &Path) -> Option<Vec<u8>> {
    match fs::read(path) {
        Ok(raw) => Some(raw),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read container; skipping");
            None
        }
    }
}

fn read_line_delimited(path: &Path) -> Vec<Value> {
    let Some(raw) = read_container(path) else {
        return Vec::new();
    };

    raw.split(|byte| *byte == b'\n')
        .enumerate()
        .filter(|(_, line)| !line.trim_ascii().is_empty())
        .filter_map(|(index, line)| {
            parse_or_default::<Option<Value>>(
                line,
                format_args!("{}:{}", path.display(), index + 1),
            )
        })
        .collect()
}

fn read_document(path: &Path) -> Vec<Value> {
    let Some(raw) = read_container(path) else {
        return Vec::new();
    };

    match parse_or_default::<Value>(&raw, path.display()) {
        Value::Array(cases) => cases,
        Value::Object(mut document) => match document.remove(CASES_KEY) {
            Some(Value::Array(cases)) => cases,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
