//! Rendering of decoded payloads into assistant turns.
//!
//! Pure and stateless apart from the configured currency symbol, so the
//! same payload always renders to the same turns.

use serde_json::Value;
use tally_core::config::ChatConfig;

use crate::payload::{Amount, ExpenseView, ResponsePayload, SqlResult, SummaryView};
use crate::turn::ChatTurn;

const NO_EXPENSES: &str = "No expenses found for that query.";
const NO_ROWS: &str = "Query returned no rows.";

/// Turns backend payloads into display text.
#[derive(Debug, Clone)]
pub struct ResponseInterpreter {
    currency: String,
}

impl Default for ResponseInterpreter {
    fn default() -> Self {
        Self::new("\u{20b9}")
    }
}

impl ResponseInterpreter {
    /// Create an interpreter that prefixes amounts with `currency_symbol`.
    pub fn new(currency_symbol: impl Into<String>) -> Self {
        Self {
            currency: currency_symbol.into(),
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(config.currency_symbol.clone())
    }

    /// Decode and render a raw backend payload.
    pub fn interpret(&self, value: &Value) -> Vec<ChatTurn> {
        self.render(&ResponsePayload::decode(value))
    }

    /// Render an already-decoded payload.
    pub fn render(&self, payload: &ResponsePayload) -> Vec<ChatTurn> {
        let content = match payload {
            ResponsePayload::ExpenseRecorded(e) => format!(
                "Expense recorded: {}{}",
                self.expense_line(e),
                category_suffix(e, "category")
            ),
            ResponsePayload::ExpenseList(list) if list.is_empty() => NO_EXPENSES.to_string(),
            ResponsePayload::ExpenseList(list) => {
                let mut lines = vec!["Expenses:".to_string()];
                for e in list {
                    lines.push(format!(
                        "- {} on {}: {}{}",
                        self.money(&e.amount),
                        e.timestamp,
                        e.description(),
                        category_suffix(e, "cat")
                    ));
                }
                lines.join("\n")
            }
            ResponsePayload::Summary(s) => self.summary(s),
            ResponsePayload::LastExpense(e) => {
                let participants = e
                    .participants()
                    .map(|p| format!(" (participants: {})", p.join(", ")))
                    .unwrap_or_default();
                format!("Last expense: {}{}", self.expense_line(e), participants)
            }
            ResponsePayload::Split(s) => format!(
                "Share for {}: {}{:.2}",
                s.participant, self.currency, s.share
            ),
            ResponsePayload::MostExpensive(e) => format!(
                "Most expensive expense: {}{}",
                self.expense_line(e),
                category_suffix(e, "category")
            ),
            ResponsePayload::Sql(result) => sql_table(result),
            ResponsePayload::Text(text) => text.clone(),
            ResponsePayload::Raw(value) => value.to_string(),
        };
        vec![ChatTurn::assistant(content)]
    }

    /// The turn shown when a request fails before a payload is available.
    pub fn error_turn(message: impl std::fmt::Display) -> ChatTurn {
        ChatTurn::assistant(format!("Error: {}", message))
    }

    fn money(&self, amount: &Amount) -> String {
        format!("{}{}", self.currency, amount)
    }

    fn expense_line(&self, e: &ExpenseView) -> String {
        format!(
            "{} on {} for {}",
            self.money(&e.amount),
            e.timestamp,
            e.description()
        )
    }

    fn summary(&self, s: &SummaryView) -> String {
        let mut lines = vec![format!("Total: {}", self.money(&s.total))];
        let breakdown = s.breakdown();
        if !breakdown.is_empty() {
            lines.push("Breakdown:".to_string());
            for entry in breakdown {
                lines.push(format!("- {}: {}", entry.period, self.money(&entry.total)));
            }
        }
        lines.join("\n")
    }
}

fn category_suffix(e: &ExpenseView, label: &str) -> String {
    e.category()
        .map(|c| format!(" ({}: {})", label, c))
        .unwrap_or_default()
}

fn sql_table(result: &SqlResult) -> String {
    if result.rows.is_empty() {
        return NO_ROWS.to_string();
    }
    let mut lines = vec![result.columns.join(" | ")];
    for row in &result.rows {
        let cells: Vec<String> = result
            .columns
            .iter()
            .map(|col| match row.get(col) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            })
            .collect();
        lines.push(cells.join(" | "));
    }
    lines.join("\n")
}

// =============================================================================
// Tests
// =============================================================================
