use std::sync::Mutex;

use semsql::inference::{build_prompt, DocumentSource, Inference, InferenceError, Translator};
use semsql::sql::Dialect;

/// Replays a fixed response and records the prompts it was sent.
struct Recording {
    response: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl Recording {
    fn ok(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl Inference for Recording {
    fn complete(&self, prompt: &str) -> Result<String, InferenceError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.response.clone().map_err(|e| InferenceError::Request(e.into()))
    }
}

#[test]
fn test_translate_end_to_end() {
    let inference = Recording::ok(
        r#"{"tables": ["users", "orders"],
            "columns": ["users.id", "SUM(orders.amount) as total_amount"],
            "aggregations": [{"function": "SUM", "column": "orders.amount", "alias": "total_amount"}],
            "joins": [{"type": "INNER", "table1": "users", "table2": "orders", "condition": "users.id = orders.user_id"}],
            "group_by": ["users.id"]}"#,
    );

    let translator = Translator::new(&inference, Dialect::MySql)
        .with_schema("users(id, name)\norders(id, user_id, amount)");
    let translation = translator.translate("total order amount per user");

    assert_eq!(translation.source, DocumentSource::Parsed);
    assert_eq!(
        translation.sql(),
        "SELECT users.id, SUM(orders.amount) as total_amount FROM users \
         INNER JOIN orders ON users.id = orders.user_id GROUP BY users.id"
    );
    assert_eq!(
        inference.last_prompt(),
        build_prompt(
            "total order amount per user",
            Some("users(id, name)\norders(id, user_id, amount)")
        )
    );
}

#[test]
fn test_summary_of_translation() {
    let inference = Recording::ok(r#"{"tables": ["orders"], "conditions": [{"column": "status", "operator": "=", "value": "paid"}]}"#);
    let translation = Translator::new(&inference, Dialect::Postgres).translate("paid orders");
    let summary = translation.summary();

    assert_eq!(summary.tables, vec!["orders"]);
    assert_eq!(summary.conditions, 1);
    assert_eq!(summary.dialect, Dialect::Postgres);
    assert!(summary.note.is_none());
    assert!(summary
        .to_string()
        .contains("SELECT * FROM orders WHERE status = 'paid'"));
}

#[test]
fn test_service_error_falls_back() {
    let inference = Recording::failing("timeout after 30s");
    let translation = Translator::new(&inference, Dialect::MySql).translate("anything");

    assert!(translation.is_fallback());
    assert_eq!(
        translation.source,
        DocumentSource::Fallback {
            reason: "Inference request failed: timeout after 30s".into()
        }
    );
    assert_eq!(translation.sql(), "SELECT 1; -- No tables specified");
    assert_eq!(translation.summary().note.as_deref(), Some("No tables specified"));
}

#[test]
fn test_unparseable_response_falls_back() {
    let inference = Recording::ok("{\"tables\": \"orders\"}");
    let translation = Translator::new(&inference, Dialect::MySql).translate("orders");

    match &translation.source {
        DocumentSource::Fallback { reason } => assert!(reason.starts_with("Invalid semantic query document")),
        other => panic!("expected fallback, got {:?}", other),
    }
    assert_eq!(translation.sql(), "SELECT 1; -- No tables specified");
}

#[test]
fn test_degraded_document_is_not_a_fallback() {
    let inference = Recording::ok(r#"{"tables": ["t"], "conditions": [{"column": "a", "operator": "SOUNDS LIKE", "value": "x"}]}"#);
    let translation = Translator::new(&inference, Dialect::MySql).translate("q");

    assert_eq!(translation.source, DocumentSource::Parsed);
    assert!(translation.outcome.is_degraded());
    assert!(translation.sql().starts_with("SELECT 1; -- Error generating SQL: "));
}
