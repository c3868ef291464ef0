//! Condition evaluation against assessment records.
//!
//! A condition references one field of the input record by name and applies
//! one operator to it. Evaluation is total: an unknown field, a shape
//! mismatch or an unparseable value evaluates to `false` rather than
//! erroring, so rule evaluation never fails mid-run.

use crate::types::Assessment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Condition Types
// ============================================================================

/// Literal value carried by a condition.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ConditionValue {
    Number(f64),
    Text(String),
    TextSet(Vec<String>),
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Number(n) => write!(f, "{}", n),
            ConditionValue::Text(s) => write!(f, "{}", s),
            ConditionValue::TextSet(items) => write!(f, "{}", items.join(",")),
        }
    }
}

/// Comparison operator of a condition.
///
/// Operator families are keyed by the field's shape: numeric, text,
/// set-valued and map-valued fields each accept their own subset.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Includes,
    NotIncludes,
    AnyOf,
    NoneOf,
    HasProperty,
    PropertyEquals,
    PropertyGt,
    PropertyLt,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Ge => "ge",
            Operator::Lt => "lt",
            Operator::Le => "le",
            Operator::Includes => "includes",
            Operator::NotIncludes => "not_includes",
            Operator::AnyOf => "any_of",
            Operator::NoneOf => "none_of",
            Operator::HasProperty => "has_property",
            Operator::PropertyEquals => "property_equals",
            Operator::PropertyGt => "property_gt",
            Operator::PropertyLt => "property_lt",
        }
    }
}

/// Logical operator joining a condition to the previous one in a rule.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOp {
    And,
    Or,
}

/// A single typed condition over one input-record field.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    pub value: ConditionValue,
    /// Joins this condition to the *previous* condition in the rule.
    /// Ignored on the first condition; absent means AND.
    #[serde(default)]
    pub logical: Option<LogicalOp>,
}

/// Shape of an input-record field as seen by the evaluator.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
    Map(BTreeMap<String, f64>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::List(items) => write!(f, "[{}]", items.join(",")),
            FieldValue::Map(map) => {
                let pairs: Vec<String> =
                    map.iter().map(|(k, v)| format!("{}:{}", k, v)).collect();
                write!(f, "{{{}}}", pairs.join(","))
            }
        }
    }
}

impl Assessment {
    /// Resolve a condition field name to its value, or None when unknown.
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "frequency_per_week" => {
                Some(FieldValue::Number(f64::from(self.frequency_per_week)))
            }
            "primary_goal" => Some(FieldValue::Text(self.primary_goal.as_str().into())),
            "level" => self
                .level
                .map(|l| FieldValue::Text(l.as_str().into())),
            "complaints" => Some(FieldValue::List(self.complaints.clone())),
            "limiting_capacities" => Some(FieldValue::List(
                self.limiting_capacities
                    .iter()
                    .map(|c| c.as_str().into())
                    .collect(),
            )),
            "movement_scores" => Some(FieldValue::Map(
                self.movement_scores
                    .iter()
                    .map(|(p, s)| (p.as_str().to_string(), *s))
                    .collect(),
            )),
            "pain_map" => {
                let mut map = BTreeMap::new();
                // Duplicate regions keep the worst intensity.
                for pain in &self.pain_map {
                    let entry = map.entry(pain.region.clone()).or_insert(0.0);
                    *entry = f64::max(*entry, f64::from(pain.intensity));
                }
                Some(FieldValue::Map(map))
            }
            "max_pain_intensity" => {
                Some(FieldValue::Number(f64::from(self.max_pain_intensity())))
            }
            _ => None,
        }
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Evaluate a single condition against an assessment. Pure and total.
pub fn evaluate(condition: &Condition, record: &Assessment) -> bool {
    let Some(actual) = record.field(&condition.field) else {
        tracing::debug!(field = %condition.field, "unknown condition field");
        return false;
    };

    match condition.operator {
        Operator::Eq => compare_eq(&actual, &condition.value),
        Operator::Ne => {
            // ne still requires comparable shapes; an incomparable pair is
            // false, not "not equal".
            comparable(&actual, &condition.value) && !compare_eq(&actual, &condition.value)
        }
        Operator::Gt => compare_numeric(&actual, &condition.value, |a, b| a > b),
        Operator::Ge => compare_numeric(&actual, &condition.value, |a, b| a >= b),
        Operator::Lt => compare_numeric(&actual, &condition.value, |a, b| a < b),
        Operator::Le => compare_numeric(&actual, &condition.value, |a, b| a <= b),
        Operator::Includes => list_of(&actual)
            .map(|items| items.contains(&condition.value.to_string()))
            .unwrap_or(false),
        Operator::NotIncludes => list_of(&actual)
            .map(|items| !items.contains(&condition.value.to_string()))
            .unwrap_or(false),
        Operator::AnyOf => {
            let expected = value_set(&condition.value);
            list_of(&actual)
                .map(|items| items.iter().any(|i| expected.contains(i)))
                .unwrap_or(false)
        }
        Operator::NoneOf => {
            let expected = value_set(&condition.value);
            list_of(&actual)
                .map(|items| !items.iter().any(|i| expected.contains(i)))
                .unwrap_or(false)
        }
        Operator::HasProperty => map_of(&actual)
            .map(|map| map.contains_key(property_key(&condition.value)))
            .unwrap_or(false),
        Operator::PropertyEquals => {
            property_check(&actual, &condition.value, |a, b| (a - b).abs() < 1e-9)
        }
        Operator::PropertyGt => property_check(&actual, &condition.value, |a, b| a > b),
        Operator::PropertyLt => property_check(&actual, &condition.value, |a, b| a < b),
    }
}

/// Combine a rule's ordered condition list, strictly left-to-right.
///
/// The running result starts with condition 0; each subsequent condition is
/// joined with its own logical operator. No precedence, no grouping.
pub fn evaluate_all(conditions: &[Condition], record: &Assessment) -> bool {
    let Some(first) = conditions.first() else {
        return false;
    };

    let mut result = evaluate(first, record);
    for condition in &conditions[1..] {
        let current = evaluate(condition, record);
        result = match condition.logical.unwrap_or(LogicalOp::And) {
            LogicalOp::And => result && current,
            LogicalOp::Or => result || current,
        };
    }
    result
}

/// Per-condition evaluation detail, for the rule-testing surface.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConditionTrace {
    pub field: String,
    pub operator: String,
    pub expected: String,
    pub actual: String,
    pub passed: bool,
}

/// Evaluate a condition and report the actual/expected values alongside.
pub fn trace(condition: &Condition, record: &Assessment) -> ConditionTrace {
    let actual = record.field(&condition.field);
    ConditionTrace {
        field: condition.field.clone(),
        operator: condition.operator.as_str().to_string(),
        expected: condition.value.to_string(),
        actual: actual
            .map(|v| v.to_string())
            .unwrap_or_else(|| "<unknown field>".to_string()),
        passed: evaluate(condition, record),
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn number_of(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(n) => Some(*n),
        FieldValue::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn expected_number(value: &ConditionValue) -> Option<f64> {
    match value {
        ConditionValue::Number(n) => Some(*n),
        ConditionValue::Text(s) => s.trim().parse().ok(),
        ConditionValue::TextSet(_) => None,
    }
}

fn list_of(value: &FieldValue) -> Option<Vec<String>> {
    match value {
        FieldValue::List(items) => Some(items.clone()),
        // A scalar text field behaves as a one-element set.
        FieldValue::Text(s) => Some(vec![s.clone()]),
        _ => None,
    }
}

fn map_of(value: &FieldValue) -> Option<&BTreeMap<String, f64>> {
    match value {
        FieldValue::Map(map) => Some(map),
        _ => None,
    }
}

fn compare_numeric(
    actual: &FieldValue,
    expected: &ConditionValue,
    op: impl Fn(f64, f64) -> bool,
) -> bool {
    match (number_of(actual), expected_number(expected)) {
        (Some(a), Some(b)) => op(a, b),
        _ => false,
    }
}

fn comparable(actual: &FieldValue, expected: &ConditionValue) -> bool {
    matches!(
        (actual, expected),
        (FieldValue::Number(_), _) | (FieldValue::Text(_), _)
    )
}

fn compare_eq(actual: &FieldValue, expected: &ConditionValue) -> bool {
    if let (Some(a), Some(b)) = (number_of(actual), expected_number(expected)) {
        return (a - b).abs() < 1e-9;
    }
    match (actual, expected) {
        (FieldValue::Text(a), ConditionValue::Text(b)) => a == b,
        _ => false,
    }
}

/// Parse an `any_of`/`none_of` value: an explicit set, or a comma-separated
/// text literal.
fn value_set(value: &ConditionValue) -> Vec<String> {
    match value {
        ConditionValue::TextSet(items) => items.clone(),
        ConditionValue::Text(s) => s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        ConditionValue::Number(n) => vec![n.to_string()],
    }
}

/// Extract the key part of a `key:value`-encoded condition value.
fn property_key(value: &ConditionValue) -> &str {
    match value {
        ConditionValue::Text(s) => s.split(':').next().unwrap_or("").trim(),
        _ => "",
    }
}

fn property_check(
    actual: &FieldValue,
    expected: &ConditionValue,
    op: impl Fn(f64, f64) -> bool,
) -> bool {
    let Some(map) = map_of(actual) else {
        return false;
    };
    let ConditionValue::Text(encoded) = expected else {
        return false;
    };
    let Some((key, raw)) = encoded.split_once(':') else {
        return false;
    };
    let Ok(expected_value) = raw.trim().parse::<f64>() else {
        return false;
    };
    map.get(key.trim())
        .map(|v| op(*v, expected_value))
        .unwrap_or(false)
}
