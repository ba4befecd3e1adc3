//! Mock backend for testing and offline use
//!
//! Without scripted responses it runs a small rule-based extractor built on
//! the same keyword lists as the interpreter, which is enough for demos and
//! for the mock Ollama server. Scripted raw responses go through the real
//! response parser, and every call is recorded for assertions.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use async_trait::async_trait;
use regex::Regex;

use crate::amount::find_amounts;
use crate::error::{Error, Result};
use crate::interpreter::keywords::{
    category_hint, contains_any_phrase, INCOME_HINTS, MULTI_INDICATORS,
};
use crate::models::{Category, ExtractedTransaction, ExtractionSchema, TransactionKind};

use super::parsing::{parse_extraction, parse_recommendation};
use super::AIBackend;

/// A call made against the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Extract {
        text: String,
        schema: ExtractionSchema,
    },
    Recommend {
        summary: String,
    },
}

/// Mock AI backend
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Whether every call should fail
    pub failing: bool,
    scripted: Arc<Mutex<VecDeque<String>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            failing: false,
            scripted: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Create a backend whose calls all fail
    pub fn failing() -> Self {
        Self {
            healthy: false,
            failing: true,
            ..Self::new()
        }
    }

    /// Queue raw model outputs, consumed one per call in order
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let backend = Self::new();
        lock(&backend.scripted).extend(responses.into_iter().map(Into::into));
        backend
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }

    /// Calls recorded so far
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    /// Schemas requested by extraction calls, in order
    pub fn requested_schemas(&self) -> Vec<ExtractionSchema> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                MockCall::Extract { schema, .. } => Some(*schema),
                MockCall::Recommend { .. } => None,
            })
            .collect()
    }

    fn next_scripted(&self) -> Option<String> {
        lock(&self.scripted).pop_front()
    }
}

fn time_regexes() -> &'static [(Regex, TimeRule)] {
    static RES: OnceLock<Vec<(Regex, TimeRule)>> = OnceLock::new();
    RES.get_or_init(|| {
        vec![
            (
                Regex::new(r"\b(?:tanggal|tgl)\s*(\d{1,2})\b").expect("valid regex"),
                TimeRule::DayOfMonth,
            ),
            (
                Regex::new(r"\b(\d+)\s*hari\s*(?:yang\s*)?lalu\b").expect("valid regex"),
                TimeRule::DaysAgo,
            ),
            (
                Regex::new(r"\b(\d+)\s*hari\s*lagi\b").expect("valid regex"),
                TimeRule::DaysAhead,
            ),
            (
                Regex::new(r"\b(?:seminggu|minggu)\s*(?:yang\s*)?lalu\b").expect("valid regex"),
                TimeRule::Fixed(7),
            ),
            (
                Regex::new(r"\b(?:kemarin|kemaren|yesterday)\b").expect("valid regex"),
                TimeRule::Fixed(1),
            ),
            (
                Regex::new(r"\b(?:besok|tomorrow)\b").expect("valid regex"),
                TimeRule::Fixed(-1),
            ),
            (Regex::new(r"\blusa\b").expect("valid regex"), TimeRule::Fixed(-2)),
            (
                Regex::new(r"\b(?:hari ini|tadi|today)\b").expect("valid regex"),
                TimeRule::Fixed(0),
            ),
        ]
    })
}

#[derive(Debug, Clone, Copy)]
enum TimeRule {
    DayOfMonth,
    DaysAgo,
    DaysAhead,
    Fixed(i64),
}

/// Timing mentioned in a lowercase segment: (day_offset, day_of_month)
fn segment_timing(segment: &str) -> Option<(Option<i64>, Option<u32>)> {
    for (re, rule) in time_regexes() {
        let Some(caps) = re.captures(segment) else {
            continue;
        };
        let number = caps.get(1).and_then(|m| m.as_str().parse::<i64>().ok());
        let timing = match rule {
            TimeRule::DayOfMonth => number
                .filter(|d| (1..=31).contains(d))
                .map(|d| (None, Some(d as u32))),
            TimeRule::DaysAgo => number.map(|n| (Some(n), None)),
            TimeRule::DaysAhead => number.map(|n| (Some(-n), None)),
            TimeRule::Fixed(offset) => Some((Some(*offset), None)),
        };
        if timing.is_some() {
            return timing;
        }
    }
    None
}

/// Words dropped when building a description
const FILLER_WORDS: &[&str] = &[
    "tadi", "kemarin", "kemaren", "besok", "lusa", "hari", "ini", "lalu", "lagi", "yang",
    "tanggal", "tgl", "seminggu", "minggu", "terus", "sama", "dan", "juga", "plus",
    "kemudian", "serta", "rp", "rb", "ribu", "juta", "jt", "k", "pada",
];

fn describe(segment: &str) -> String {
    let words: Vec<&str> = segment
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .filter(|w| !w.chars().any(|c| c.is_ascii_digit()))
        .filter(|w| !FILLER_WORDS.contains(w))
        .collect();

    if words.is_empty() {
        return "Transaksi".to_string();
    }

    let joined = words.join(" ");
    let mut chars = joined.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// Rule-based extraction used when no scripted response is queued
///
/// For the multi shape the text is split on list separators; a time mention
/// carries over to later items until a new one appears.
pub fn extract_offline(text: &str, schema: ExtractionSchema) -> Vec<ExtractedTransaction> {
    let lower = text.to_lowercase();

    let segments: Vec<String> = match schema {
        ExtractionSchema::Single => vec![lower],
        ExtractionSchema::Multi => {
            let mut joined = lower;
            for indicator in MULTI_INDICATORS {
                joined = joined.replace(indicator, "\n");
            }
            joined.split('\n').map(str::to_string).collect()
        }
    };

    let mut timing: (Option<i64>, Option<u32>) = (Some(0), None);
    let mut records = Vec::new();

    for segment in segments {
        if let Some(found) = segment_timing(&segment) {
            timing = found;
        }

        // Largest number is the amount; smaller ones are dates and counts
        let Some(amount) = find_amounts(&segment).into_iter().reduce(f64::max) else {
            continue;
        };

        let kind = if contains_any_phrase(&segment, INCOME_HINTS) {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        };

        records.push(ExtractedTransaction {
            amount,
            kind,
            category: category_hint(&segment).unwrap_or(Category::Other),
            description: describe(&segment),
            day_offset: timing.0,
            day_of_month: timing.1,
        });

        if schema == ExtractionSchema::Single {
            break;
        }
    }

    records
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn extract(
        &self,
        text: &str,
        schema: ExtractionSchema,
    ) -> Result<Vec<ExtractedTransaction>> {
        lock(&self.calls).push(MockCall::Extract {
            text: text.to_string(),
            schema,
        });

        if self.failing {
            return Err(Error::InvalidData("Mock backend configured to fail".into()));
        }

        if let Some(raw) = self.next_scripted() {
            return parse_extraction(&raw, schema);
        }

        let records = extract_offline(text, schema);
        if records.is_empty() {
            return Err(Error::InvalidData(
                "Mock backend found no amount in the text".into(),
            ));
        }
        Ok(records)
    }

    async fn recommend(&self, summary: &str, _period: Option<&str>) -> Result<String> {
        lock(&self.calls).push(MockCall::Recommend {
            summary: summary.to_string(),
        });

        if self.failing {
            return Err(Error::InvalidData("Mock backend configured to fail".into()));
        }

        if let Some(raw) = self.next_scripted() {
            return parse_recommendation(&raw);
        }

        Ok(format!(
            "## Analisis Keuangan Kamu\n\nRingkasan yang aku terima:\n\n{}\n\nTerus catat transaksimu biar sarannya makin akurat.",
            summary.trim()
        ))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
