//! Typed decoding of backend `/api/ask` payloads.
//!
//! The backend answers with untyped JSON whose `action` field selects a
//! shape. Each known shape is tried in a fixed order; the first rule whose
//! `action` and required fields all decode wins. Anything else lands in
//! [`ResponsePayload::Raw`], so decoding itself never fails.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

// =============================================================================
// Field shapes
// =============================================================================

/// A monetary value exactly as the backend sent it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(serde_json::Number),
    Text(String),
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Amount::Text(s) => f.write_str(s),
            Amount::Number(n) => {
                if let Some(i) = n.as_i64() {
                    write!(f, "{}", i)
                } else if let Some(u) = n.as_u64() {
                    write!(f, "{}", u)
                } else {
                    let v = n.as_f64().unwrap_or(f64::NAN);
                    // Integral floats (e.g. 10.0 from a SQL SUM) print without a fraction.
                    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
                        write!(f, "{}", v as i64)
                    } else {
                        write!(f, "{}", v)
                    }
                }
            }
        }
    }
}

/// An expense record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExpenseView {
    #[serde(default)]
    pub id: Option<i64>,
    pub amount: Amount,
    pub timestamp: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub participants: Option<Vec<String>>,
}

impl ExpenseView {
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Category, if present and non-empty.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    /// Participants, if present and non-empty.
    pub fn participants(&self) -> Option<&[String]> {
        self.participants.as_deref().filter(|p| !p.is_empty())
    }
}

/// One period of a summary breakdown.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BreakdownEntry {
    pub period: String,
    pub total: Amount,
}

/// Totals over a period, optionally broken down by granularity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SummaryView {
    pub total: Amount,
    #[serde(default)]
    breakdown: Option<Vec<BreakdownEntry>>,
}

impl SummaryView {
    pub fn new(total: Amount, breakdown: Vec<BreakdownEntry>) -> Self {
        Self {
            total,
            breakdown: Some(breakdown),
        }
    }

    pub fn breakdown(&self) -> &[BreakdownEntry] {
        self.breakdown.as_deref().unwrap_or(&[])
    }
}

/// One participant's equal share of an expense.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SplitView {
    pub participant: String,
    pub share: f64,
}

/// Rows produced by a read-only SQL query.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SqlResult {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

// =============================================================================
// ResponsePayload
// =============================================================================

/// A backend payload decoded into one of the known shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    /// `parse_expense`: a new expense was stored.
    ExpenseRecorded(ExpenseView),
    /// `query_expenses`: expenses matching a filter.
    ExpenseList(Vec<ExpenseView>),
    /// `summarize_expenses`.
    Summary(SummaryView),
    /// `get_last_expense`.
    LastExpense(ExpenseView),
    /// `split_expense`.
    Split(SplitView),
    /// `get_most_expensive_expense`.
    MostExpensive(ExpenseView),
    /// `run_sql`.
    Sql(SqlResult),
    /// Plain assistant reply with no function call.
    Text(String),
    /// No known shape matched.
    Raw(Value),
}

type Rule = fn(&Value) -> Option<ResponsePayload>;

/// Decode rules in priority order.
const RULES: &[(&str, Rule)] = &[
    ("parse_expense", parse_expense),
    ("query_expenses", query_expenses),
    ("summarize_expenses", summarize_expenses),
    ("get_last_expense", get_last_expense),
    ("split_expense", split_expense),
    ("get_most_expensive_expense", get_most_expensive_expense),
    ("run_sql", run_sql),
    ("response", plain_response),
];

fn parse_expense(v: &Value) -> Option<ResponsePayload> {
    action_field(v, "parse_expense", "expense").map(ResponsePayload::ExpenseRecorded)
}

fn query_expenses(v: &Value) -> Option<ResponsePayload> {
    action_field(v, "query_expenses", "expenses").map(ResponsePayload::ExpenseList)
}

fn summarize_expenses(v: &Value) -> Option<ResponsePayload> {
    action_field(v, "summarize_expenses", "summary").map(ResponsePayload::Summary)
}

fn get_last_expense(v: &Value) -> Option<ResponsePayload> {
    action_field(v, "get_last_expense", "expense").map(ResponsePayload::LastExpense)
}

fn split_expense(v: &Value) -> Option<ResponsePayload> {
    action_field(v, "split_expense", "split").map(ResponsePayload::Split)
}

fn get_most_expensive_expense(v: &Value) -> Option<ResponsePayload> {
    action_field(v, "get_most_expensive_expense", "expense").map(ResponsePayload::MostExpensive)
}

fn run_sql(v: &Value) -> Option<ResponsePayload> {
    if !has_action(v, "run_sql") {
        return None;
    }
    SqlResult::deserialize(v).ok().map(ResponsePayload::Sql)
}

fn plain_response(v: &Value) -> Option<ResponsePayload> {
    v.get("response")
        .and_then(Value::as_str)
        .map(|s| ResponsePayload::Text(s.to_string()))
}

impl ResponsePayload {
    /// Decode a raw payload. Never fails: unknown or malformed payloads
    /// become [`ResponsePayload::Raw`].
    pub fn decode(value: &Value) -> Self {
        for (name, rule) in RULES {
            if let Some(payload) = rule(value) {
                debug!(rule = *name, "Payload matched");
                return payload;
            }
        }
        debug!("No payload rule matched, using raw fallback");
        ResponsePayload::Raw(value.clone())
    }

    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ResponsePayload::ExpenseRecorded(_) => "parse_expense",
            ResponsePayload::ExpenseList(_) => "query_expenses",
            ResponsePayload::Summary(_) => "summarize_expenses",
            ResponsePayload::LastExpense(_) => "get_last_expense",
            ResponsePayload::Split(_) => "split_expense",
            ResponsePayload::MostExpensive(_) => "get_most_expensive_expense",
            ResponsePayload::Sql(_) => "run_sql",
            ResponsePayload::Text(_) => "response",
            ResponsePayload::Raw(_) => "raw",
        }
    }
}

fn has_action(value: &Value, action: &str) -> bool {
    value.get("action").and_then(Value::as_str) == Some(action)
}

/// Decode `value[key]` as `T` when `value.action == action`.
fn action_field<T: DeserializeOwned>(value: &Value, action: &str, key: &str) -> Option<T> {
    if !has_action(value, action) {
        return None;
    }
    T::deserialize(value.get(key)?).ok()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coffee() -> Value {
        json!({"amount": 4, "timestamp": "2025-04-20", "description": "coffee"})
    }

    // ---- Rule matching ----

    #[test]
    fn test_parse_expense_matches() {
        let value = json!({"action": "parse_expense", "expense": coffee()});
        match ResponsePayload::decode(&value) {
            ResponsePayload::ExpenseRecorded(e) => {
                assert_eq!(e.description(), "coffee");
                assert_eq!(e.timestamp, "2025-04-20");
                assert!(e.category().is_none());
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_query_expenses_matches_empty_list() {
        let value = json!({"action": "query_expenses", "expenses": []});
        assert_eq!(ResponsePayload::decode(&value), ResponsePayload::ExpenseList(vec![]));
    }

    #[test]
    fn test_summary_without_breakdown() {
        let value = json!({"action": "summarize_expenses", "summary": {"total": 0}});
        match ResponsePayload::decode(&value) {
            ResponsePayload::Summary(s) => assert!(s.breakdown().is_empty()),
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_summary_with_null_breakdown() {
        let payload = ResponsePayload::decode(
            &json!({"action": "summarize_expenses", "summary": {"total": 3, "breakdown": null}}),
        );
        assert_eq!(payload.kind(), "summarize_expenses");
    }

    #[test]
    fn test_last_expense_with_participants() {
        let mut expense = coffee();
        expense["participants"] = json!(["Alice", "Bob"]);
        let payload =
            ResponsePayload::decode(&json!({"action": "get_last_expense", "expense": expense}));
        match payload {
            ResponsePayload::LastExpense(e) => {
                assert_eq!(e.participants().unwrap(), ["Alice", "Bob"]);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_split_matches() {
        let payload = ResponsePayload::decode(
            &json!({"action": "split_expense", "split": {"participant": "Alice", "share": 12.5}}),
        );
        assert_eq!(
            payload,
            ResponsePayload::Split(SplitView {
                participant: "Alice".to_string(),
                share: 12.5
            })
        );
    }

    #[test]
    fn test_run_sql_matches() {
        let payload = ResponsePayload::decode(&json!({
            "action": "run_sql",
            "columns": ["amount", "description"],
            "rows": [{"amount": 150, "description": "Z"}]
        }));
        match payload {
            ResponsePayload::Sql(r) => {
                assert_eq!(r.columns, vec!["amount", "description"]);
                assert_eq!(r.rows.len(), 1);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_response_text_matches() {
        let payload = ResponsePayload::decode(&json!({"response": "Hi there"}));
        assert_eq!(payload, ResponsePayload::Text("Hi there".to_string()));
    }

    #[test]
    fn test_unknown_shape_is_raw() {
        let value = json!({"foo": "bar"});
        assert_eq!(ResponsePayload::decode(&value), ResponsePayload::Raw(value));
    }

    #[test]
    fn test_non_object_is_raw() {
        for value in [json!([1, 2]), json!("text"), json!(null), json!(42)] {
            assert_eq!(ResponsePayload::decode(&value), ResponsePayload::Raw(value.clone()));
        }
    }

    // ---- Fall-through ----

    #[test]
    fn test_missing_expense_falls_through_to_raw() {
        let value = json!({"action": "parse_expense"});
        assert_eq!(ResponsePayload::decode(&value), ResponsePayload::Raw(value));
    }

    #[test]
    fn test_missing_expense_falls_through_to_response() {
        let value = json!({"action": "parse_expense", "response": "could not parse"});
        assert_eq!(
            ResponsePayload::decode(&value),
            ResponsePayload::Text("could not parse".to_string())
        );
    }

    #[test]
    fn test_malformed_expense_falls_through() {
        // amount must be a number or string
        let value = json!({
            "action": "parse_expense",
            "expense": {"amount": true, "timestamp": "x"}
        });
        assert_eq!(ResponsePayload::decode(&value).kind(), "raw");
    }

    #[test]
    fn test_expenses_not_a_list_falls_through() {
        let value = json!({"action": "query_expenses", "expenses": {"amount": 1}});
        assert_eq!(ResponsePayload::decode(&value).kind(), "raw");
    }

    #[test]
    fn test_split_with_string_share_falls_through() {
        let value = json!({
            "action": "split_expense",
            "split": {"participant": "A", "share": "5"}
        });
        assert_eq!(ResponsePayload::decode(&value).kind(), "raw");
    }

    #[test]
    fn test_action_not_a_string_falls_through() {
        let value = json!({"action": 1, "expense": coffee()});
        assert_eq!(ResponsePayload::decode(&value).kind(), "raw");
    }

    #[test]
    fn test_response_not_a_string_is_raw() {
        let value = json!({"response": {"nested": true}});
        assert_eq!(ResponsePayload::decode(&value).kind(), "raw");
    }

    // ---- Priority ----

    #[test]
    fn test_action_rule_beats_response() {
        let value = json!({
            "action": "parse_expense",
            "expense": coffee(),
            "response": "ignored"
        });
        assert_eq!(ResponsePayload::decode(&value).kind(), "parse_expense");
    }

    #[test]
    fn test_action_selects_rule_not_field_presence() {
        // get_last_expense shares the `expense` key with parse_expense
        let value = json!({"action": "get_last_expense", "expense": coffee()});
        assert_eq!(ResponsePayload::decode(&value).kind(), "get_last_expense");
    }

    // ---- Amount display ----

    #[test]
    fn test_amount_display() {
        let cases = [
            (json!(4), "4"),
            (json!(-3), "-3"),
            (json!(12.5), "12.5"),
            (json!(10.0), "10"),
            (json!(9.99), "9.99"),
            (json!("4.00"), "4.00"),
        ];
        for (value, expected) in cases {
            let amount: Amount = serde_json::from_value(value).unwrap();
            assert_eq!(amount.to_string(), expected);
        }
    }

    #[test]
    fn test_expense_accessors_filter_empty() {
        let expense: ExpenseView = serde_json::from_value(json!({
            "amount": 1, "timestamp": "t", "category": "", "participants": [], "description": null
        }))
        .unwrap();
        assert!(expense.category().is_none());
        assert!(expense.participants().is_none());
        assert_eq!(expense.description(), "");
    }
}
