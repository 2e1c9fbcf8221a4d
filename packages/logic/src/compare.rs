//! Condition operators over loosely-typed answers

use blockform_model::{LogicCondition, Operator};
use serde_json::Value;

/// Whether `condition` holds for `answer` (`None` when the block has no
/// answer yet). Never fails: anything that cannot be compared is `false`.
pub fn condition_holds(condition: &LogicCondition, answer: Option<&Value>) -> bool {
    let expected = condition.value.as_str();

    match condition.operator {
        Operator::Equals => coerce_to_string(answer).is_some_and(|s| s == expected),
        Operator::NotEquals => coerce_to_string(answer).is_some_and(|s| s != expected),
        Operator::Contains => contains(answer, expected).unwrap_or(false),
        Operator::NotContains => contains(answer, expected).is_some_and(|found| !found),
        Operator::GreaterThan => compare_numbers(answer, expected).is_some_and(|(a, b)| a > b),
        Operator::LessThan => compare_numbers(answer, expected).is_some_and(|(a, b)| a < b),
        Operator::Unknown(_) => false,
    }
}

/// String form of an answer. Missing and null answers are the empty string;
/// arrays join their elements with `,`; objects have no string form.
fn coerce_to_string(answer: Option<&Value>) -> Option<String> {
    match answer {
        None | Some(Value::Null) => Some(String::new()),
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(Value::Number(n)) => Some(number_to_string(n)),
        Some(Value::Array(items)) => {
            let parts: Option<Vec<String>> =
                items.iter().map(|item| coerce_to_string(Some(item))).collect();
            parts.map(|p| p.join(","))
        }
        Some(Value::Object(_)) => None,
    }
}

// 18.0 compares equal to "18"
fn number_to_string(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

/// Membership for arrays, substring otherwise. `None` when the answer has
/// no meaningful containment (objects).
fn contains(answer: Option<&Value>, needle: &str) -> Option<bool> {
    match answer {
        None | Some(Value::Null) => Some(false),
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .any(|item| coerce_to_string(Some(item)).is_some_and(|s| s == needle)),
        ),
        Some(Value::Object(_)) => None,
        other => coerce_to_string(other).map(|s| s.contains(needle)),
    }
}

fn compare_numbers(answer: Option<&Value>, expected: &str) -> Option<(f64, f64)> {
    let lhs = match answer? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }?;
    let rhs = parse_number(expected)?;
    Some((lhs, rhs))
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
