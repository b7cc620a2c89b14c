//! Threshold rule engine.
//!
//! Each [`Rule`] compares a reading's temperature against a fixed threshold.
//! Evaluation is pure: the caller passes a reading in and receives the list
//! of alerts that fired, one per matching rule, in rule-list order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::telemetry::TelemetryReading;
use crate::types::Timestamp;

/// Name given to a rule created without one.
pub const DEFAULT_RULE_NAME: &str = "rule";

/// Maximum length of a rule name.
pub const MAX_RULE_NAME_LEN: usize = 64;

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Comparison operator applied as `temperature <op> threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    /// Exact floating point equality.
    #[serde(rename = "==")]
    Equal,
}

impl Comparison {
    /// Apply the operator. Any comparison involving NaN is false.
    pub fn matches(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::GreaterThan => value > threshold,
            Comparison::LessThan => value < threshold,
            Comparison::Equal => value == threshold,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Comparison::GreaterThan => ">",
            Comparison::LessThan => "<",
            Comparison::Equal => "==",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparison {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ">" => Ok(Comparison::GreaterThan),
            "<" => Ok(Comparison::LessThan),
            "==" => Ok(Comparison::Equal),
            other => Err(CoreError::Validation(format!(
                "Unknown rule condition '{other}', expected one of: >, <, =="
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Threshold parsing
// ---------------------------------------------------------------------------

/// Parse a user-entered threshold leniently.
///
/// Reads the longest leading prefix of the form
/// `[+-](Infinity | digits[.digits][(e|E)[+-]digits])` after any leading
/// whitespace and ignores the rest, so `"30abc"` parses as `30.0` and
/// `"-Infinity!"` as negative infinity. An exponent marker without digits
/// after it is not consumed. Input with no numeric prefix yields NaN, which
/// never matches any rule. The input is scanned once.
pub fn parse_threshold(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();

    let negative = bytes.first() == Some(&b'-');
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    if s[end..].starts_with("Infinity") {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(&bytes[exp..]);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// A user-defined threshold rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub name: String,
    pub condition: Comparison,
    /// May be NaN when the user entered a non-numeric value.
    pub threshold: f64,
}

impl Rule {
    /// Build a rule, substituting [`DEFAULT_RULE_NAME`] for an empty name.
    pub fn new(
        name: impl Into<String>,
        condition: Comparison,
        threshold: f64,
    ) -> Result<Self, CoreError> {
        let mut name = name.into();
        if name.is_empty() {
            name = DEFAULT_RULE_NAME.to_string();
        }
        if name.chars().count() > MAX_RULE_NAME_LEN {
            return Err(CoreError::Validation(format!(
                "Rule name must not exceed {MAX_RULE_NAME_LEN} characters"
            )));
        }
        Ok(Self {
            name,
            condition,
            threshold,
        })
    }

    /// Whether this rule fires for the given temperature.
    pub fn matches(&self, temperature: f64) -> bool {
        self.condition.matches(temperature, self.threshold)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} — {} {}", self.name, self.condition, self.threshold)
    }
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// Emitted when a rule matches a reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleAlert {
    pub rule_name: String,
    pub device_id: String,
    pub condition: Comparison,
    pub threshold: f64,
    /// The observed temperature that triggered the rule.
    pub temperature: f64,
    pub timestamp: Timestamp,
}

impl fmt::Display for RuleAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "⚠ Rule {} triggered on {}", self.rule_name, self.device_id)
    }
}

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

/// Ordered list of active rules. Duplicates are allowed.
#[derive(Debug, Default, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Delete the rule at `index`. Out-of-range indices are a no-op.
    pub fn remove(&mut self, index: usize) -> Option<Rule> {
        (index < self.rules.len()).then(|| self.rules.remove(index))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule against `reading`; each rule fires independently.
    pub fn evaluate(&self, reading: &TelemetryReading) -> Vec<RuleAlert> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(reading.temperature))
            .map(|rule| RuleAlert {
                rule_name: rule.name.clone(),
                device_id: reading.device_id.clone(),
                condition: rule.condition,
                threshold: rule.threshold,
                temperature: reading.temperature,
                timestamp: reading.timestamp,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
