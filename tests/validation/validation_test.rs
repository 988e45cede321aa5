use semsql::document::QueryDocument;
use semsql::model::{JoinType, Operator};
use semsql::sql::Dialect;
use semsql::validation::{self, ValidationError, ValidationWarning, Validator};
use serde_json::json;

fn doc(value: serde_json::Value) -> QueryDocument {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_validate_prompt_example() {
    let report = validation::validate(&doc(json!({
        "tables": ["users", "orders"],
        "columns": ["users.id", "SUM(orders.amount) as total_amount"],
        "conditions": [],
        "aggregations": [{"function": "SUM", "column": "orders.amount", "alias": "total_amount"}],
        "joins": [{"type": "INNER", "table1": "users", "table2": "orders", "condition": "users.id = orders.user_id"}],
        "order_by": [],
        "group_by": ["users.id"],
        "limit": null
    })))
    .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.query.aggregations.len(), 1);
    assert_eq!(report.query.joins[0].join_type, JoinType::Inner);
    assert_eq!(report.query.limit, None);
}

#[test]
fn test_validation_error_display() {
    let error = ValidationError::InvalidOperator {
        column: "orders.status".to_string(),
        operator: Some("<>".to_string()),
    };

    let message = error.to_string();
    assert!(message.contains("orders.status"));
    assert!(message.contains("<>"));

    let missing = ValidationError::InvalidOperator {
        column: "a".to_string(),
        operator: None,
    };
    assert!(missing.to_string().contains("(missing)"));
}

#[test]
fn test_no_tables_checked_first() {
    let err = validation::validate(&doc(json!({
        "tables": [],
        "aggregations": [{"function": "MEDIAN", "column": "x"}],
        "conditions": [{"column": "x", "operator": "~", "value": 1}]
    })))
    .unwrap_err();
    assert_eq!(err, ValidationError::NoTablesSpecified);
}

#[test]
fn test_operator_checked_before_join_type() {
    let err = validation::validate(&doc(json!({
        "tables": ["a", "b"],
        "conditions": [{"column": "x", "operator": "~", "value": 1}],
        "joins": [{"type": "CROSS", "table1": "a", "table2": "b", "condition": "1 = 1"}]
    })))
    .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidOperator { .. }));
}

#[test]
fn test_every_canonical_operator_accepted() {
    for op in Operator::ALL {
        let result = validation::validate(&doc(json!({
            "tables": ["t"],
            "conditions": [{"column": "x", "operator": op.as_str(), "value": [1, 2]}]
        })));
        assert!(result.is_ok(), "{} rejected", op);
    }
}

#[test]
fn test_lowercase_keywords_rejected() {
    let cases = [
        json!({"tables": ["t"], "aggregations": [{"function": "sum", "column": "x"}]}),
        json!({"tables": ["t"], "conditions": [{"column": "x", "operator": "like", "value": "a"}]}),
        json!({"tables": ["a", "b"], "joins": [{"type": "left", "table1": "a", "table2": "b", "condition": "c"}]}),
        json!({"tables": ["t"], "order_by": [{"column": "x", "direction": "desc"}]}),
    ];

    for case in cases {
        assert!(validation::validate(&doc(case.clone())).is_err(), "{}", case);
    }
}

#[test]
fn test_object_value_rejected() {
    let err = validation::validate(&doc(json!({
        "tables": ["t"],
        "conditions": [{"column": "x", "operator": "=", "value": {"nested": true}}]
    })))
    .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidValue { .. }));
}

#[test]
fn test_chain_has_no_warnings() {
    let report = validation::validate(&doc(json!({
        "tables": ["a", "b", "c"],
        "joins": [
            {"type": "INNER", "table1": "b", "table2": "c", "condition": "b.id = c.b_id"},
            {"type": "INNER", "table1": "a", "table2": "b", "condition": "a.id = b.a_id"}
        ]
    })))
    .unwrap();
    assert!(report.is_clean(), "{:?}", report.warnings);
}

#[test]
fn test_redundant_join_warned() {
    let report = validation::validate(&doc(json!({
        "tables": ["a", "b"],
        "joins": [
            {"type": "INNER", "table1": "a", "table2": "b", "condition": "a.id = b.a_id"},
            {"type": "INNER", "table1": "a", "table2": "b", "condition": "a.x = b.x"}
        ]
    })))
    .unwrap();
    assert_eq!(report.warnings, vec![ValidationWarning::RedundantJoin { join: 1 }]);
}

#[test]
fn test_full_join_per_dialect() {
    let input = doc(json!({
        "tables": ["a", "b"],
        "joins": [{"type": "FULL", "table1": "a", "table2": "b", "condition": "a.id = b.id"}]
    }));

    let mysql = Validator::new(Dialect::MySql).validate(&input).unwrap();
    assert_eq!(
        mysql.warnings,
        vec![ValidationWarning::UnsupportedJoinType {
            join: 0,
            join_type: JoinType::Full,
            dialect: Dialect::MySql,
        }]
    );
    assert_eq!(
        mysql.warnings[0].to_string(),
        "join #0: FULL JOIN is not supported by mysql"
    );

    assert!(Validator::new(Dialect::DuckDb)
        .validate(&input)
        .unwrap()
        .is_clean());
}

#[test]
fn test_validate_is_pure() {
    let input = doc(json!({
        "tables": ["t"],
        "conditions": [{"column": "a", "operator": "=", "value": null}]
    }));
    let first = validation::validate(&input);
    assert_eq!(validation::validate(&input), first);
}

#[test]
fn test_between_without_two_values_warned() {
    let report = validation::validate(&doc(json!({
        "tables": ["t"],
        "conditions": [
            {"column": "a", "operator": "BETWEEN", "value": [1, 10]},
            {"column": "b", "operator": "BETWEEN", "value": []},
            {"column": "c", "operator": "BETWEEN", "value": 5}
        ]
    })))
    .unwrap();

    assert_eq!(
        report.warnings,
        vec![
            ValidationWarning::MalformedRange {
                condition: 1,
                column: "b".into()
            },
            ValidationWarning::MalformedRange {
                condition: 2,
                column: "c".into()
            },
        ]
    );
    assert!(report.warnings[0].to_string().contains("exactly two values"));
}

#[test]
fn test_self_join_is_not_redundant() {
    let report = validation::validate(&doc(json!({
        "tables": ["emp"],
        "joins": [{"type": "LEFT", "table1": "emp", "table2": "emp", "condition": "a.m = b.id"}]
    })))
    .unwrap();
    assert!(report.is_clean(), "{:?}", report.warnings);
}
