use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

const EMPATHY: &[&str] = &[
    "understand",
    "apologize",
    "sorry",
    "frustrating",
    "appreciate",
    "concern",
];
const CASUAL_TERMS: &[&str] = &[
    "yeah", "nope", "gonna", "wanna", "kinda", "sorta", "hey", "yo", "sup", "lol", "omg", "wtf",
];
const SOLUTION: &[&str] = &[
    "let me",
    "i can",
    "we can",
    "try",
    "step",
    "solution",
    "resolve",
    "fix",
    "help you",
    "assist you",
];
const ESCALATION: &[&str] = &[
    "escalate",
    "specialist",
    "technical team",
    "supervisor",
    "manager",
    "expert",
    "advanced support",
    "tier 2",
];
const HANDOFF_PROCESS: &[&str] = &[
    "connect you",
    "transfer",
    "forward",
    "specialist",
    "technical team",
    "next level",
    "appropriate team",
];
const INFORMATION_GATHERING: &[&str] = &[
    "details",
    "information",
    "tell me",
    "could you",
    "what",
    "when",
    "how",
    "which",
    "account",
    "system",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhraseConfig {
    pub empathy: Vec<String>,
    pub casual_terms: Vec<String>,
    pub solution: Vec<String>,
    pub escalation: Vec<String>,
    pub handoff_process: Vec<String>,
    pub information_gathering: Vec<String>,
}

impl Default for PhraseConfig {
    fn default() -> Self {
        Self {
            empathy: owned(EMPATHY),
            casual_terms: owned(CASUAL_TERMS),
            solution: owned(SOLUTION),
            escalation: owned(ESCALATION),
            handoff_process: owned(HANDOFF_PROCESS),
            information_gathering: owned(INFORMATION_GATHERING),
        }
    }
}

impl PhraseConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path)
            .with_context(|| format!("failed to read phrase overrides {}", path.display()))?;
        serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse phrase overrides {}", path.display()))
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MatchMode {
    Substring,
    WholeWord,
}

#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    pattern: Option<Regex>,
}

impl PhraseMatcher {
    pub fn new(phrases: &[String], mode: MatchMode) -> Result<Self> {
        let alternation = phrases
            .iter()
            .map(|phrase| phrase.trim())
            .filter(|phrase| !phrase.is_empty())
            .map(regex::escape)
            .collect::<Vec<String>>();

        // An empty alternation would match every input.
        if alternation.is_empty() {
            return Ok(Self { pattern: None });
        }

        let body = alternation.join("|");
        let source = match mode {
            MatchMode::Substring => format!("(?:{body})"),
            MatchMode::WholeWord => format!(r"\b(?:{body})\b"),
        };
        let pattern = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .with_context(|| format!("failed to compile phrase matcher: {source}"))?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn substring(phrases: &[String]) -> Result<Self> {
        Self::new(phrases, MatchMode::Substring)
    }

    pub fn whole_word(phrases: &[String]) -> Result<Self> {
        Self::new(phrases, MatchMode::WholeWord)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern
            .as_ref()
            .map(|pattern| pattern.is_match(text))
            .unwrap_or(false)
    }
}
