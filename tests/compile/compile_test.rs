//! Integration tests for document → SQL compilation.

use insta::assert_snapshot;
use semsql::compile::{compile, compile_document, CompileOutcome, Compiler, DegradeReason};
use semsql::document::QueryDocument;
use semsql::model::{
    AggregateFunction, Aggregation, Condition, ConditionValue, Join, JoinType, Operator,
    OrderTerm, Scalar, SemanticQuery,
};
use semsql::sql::Dialect;
use serde_json::json;
use sqlparser::dialect::{DuckDbDialect, MySqlDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;

fn doc(value: serde_json::Value) -> QueryDocument {
    serde_json::from_value(value).unwrap()
}

fn assert_one_statement(sql: &str, dialect: Dialect) {
    let statements = match dialect {
        Dialect::MySql => Parser::parse_sql(&MySqlDialect {}, sql),
        Dialect::Postgres => Parser::parse_sql(&PostgreSqlDialect {}, sql),
        Dialect::DuckDb => Parser::parse_sql(&DuckDbDialect {}, sql),
    }
    .unwrap_or_else(|e| panic!("{} failed to parse: {}\n{}", dialect, e, sql));
    assert_eq!(statements.len(), 1, "{}", sql);
}

// ============================================================================
// Documents
// ============================================================================

#[test]
fn test_prompt_example_document() {
    let outcome = compile_document(&doc(json!({
        "tables": ["users", "orders"],
        "columns": ["users.id", "SUM(orders.amount) as total_amount"],
        "conditions": [],
        "aggregations": [{"function": "SUM", "column": "orders.amount", "alias": "total_amount"}],
        "joins": [{"type": "INNER", "table1": "users", "table2": "orders", "condition": "users.id = orders.user_id"}],
        "order_by": [],
        "group_by": ["users.id"],
        "limit": null
    })));

    assert!(!outcome.is_degraded());
    assert_snapshot!(outcome.sql(), @"SELECT users.id, SUM(orders.amount) as total_amount FROM users INNER JOIN orders ON users.id = orders.user_id GROUP BY users.id");
    assert_one_statement(outcome.sql(), Dialect::MySql);
}

#[test]
fn test_count_only() {
    let outcome = compile_document(&doc(json!({
        "tables": ["orders"],
        "columns": ["COUNT(*) as n"],
        "conditions": [],
        "aggregations": [],
        "joins": []
    })));
    assert_eq!(outcome, CompileOutcome::Compiled("SELECT COUNT(*) as n FROM orders".into()));
}

#[test]
fn test_every_clause() {
    let outcome = compile_document(&doc(json!({
        "tables": ["customers", "orders"],
        "columns": ["customers.region", "SUM(orders.amount) as revenue"],
        "conditions": [
            {"column": "orders.status", "operator": "IN", "value": ["paid", "shipped"]},
            {"column": "orders.created_at", "operator": "BETWEEN", "value": ["2024-01-01", "2024-12-31"]},
            {"column": "customers.name", "operator": "LIKE", "value": "A%"}
        ],
        "aggregations": [{"function": "SUM", "column": "orders.amount", "alias": "revenue"}],
        "joins": [{"type": "LEFT", "table1": "customers", "table2": "orders", "condition": "customers.id = orders.customer_id"}],
        "order_by": [{"column": "revenue", "direction": "DESC"}],
        "group_by": ["customers.region"],
        "limit": 20
    })));

    assert_snapshot!(outcome.sql(), @"SELECT customers.region, SUM(orders.amount) as revenue FROM customers LEFT JOIN orders ON customers.id = orders.customer_id WHERE orders.status IN ('paid', 'shipped') AND orders.created_at BETWEEN '2024-01-01' AND '2024-12-31' AND customers.name LIKE 'A%' GROUP BY customers.region ORDER BY revenue DESC LIMIT 20");
    assert_one_statement(outcome.sql(), Dialect::MySql);
}

#[test]
fn test_lenient_keywords() {
    let outcome = compile_document(&doc(json!({
        "tables": ["t"],
        "conditions": [{"column": "a", "value": 1}, {"column": "b", "operator": "like", "value": "x%"}],
        "order_by": [{"column": "a"}, {"column": "b", "direction": "desc"}]
    })));
    assert_snapshot!(outcome.sql(), @"SELECT * FROM t WHERE a = 1 AND b LIKE 'x%' ORDER BY a ASC, b DESC");
}

#[test]
fn test_zero_and_null_limit_omitted() {
    for limit in [json!(0), json!(null)] {
        let outcome = compile_document(&doc(json!({"tables": ["t"], "limit": limit})));
        assert_eq!(outcome.sql(), "SELECT * FROM t");
    }
    let outcome = compile_document(&doc(json!({"tables": ["t"], "limit": "15"})));
    assert_eq!(outcome.sql(), "SELECT * FROM t LIMIT 15");
}

#[test]
fn test_whole_float_limit_accepted() {
    let outcome = compile_document(&doc(json!({"tables": ["t"], "limit": 10.0})));
    assert_eq!(outcome.sql(), "SELECT * FROM t LIMIT 10");

    let outcome = compile_document(&doc(json!({"tables": ["t"], "limit": 10.5})));
    assert!(outcome.is_degraded());
}

#[test]
fn test_unsigned_ids_keep_every_digit() {
    let outcome = compile_document(&doc(json!({
        "tables": ["t"],
        "conditions": [{"column": "id", "operator": "=", "value": 18446744073709551615_u64}]
    })));
    assert_eq!(outcome.sql(), "SELECT * FROM t WHERE id = 18446744073709551615");
    assert_one_statement(outcome.sql(), Dialect::MySql);
}

#[test]
fn test_empty_identifiers_dropped() {
    let outcome = compile_document(&doc(json!({
        "tables": ["a", ""],
        "columns": ["x", ""],
        "group_by": ["g", ""]
    })));
    assert_eq!(outcome.sql(), "SELECT x FROM a GROUP BY g");
    assert_one_statement(outcome.sql(), Dialect::MySql);

    let outcome = compile_document(&doc(json!({"tables": ["t"], "columns": [""]})));
    assert_eq!(outcome.sql(), "SELECT * FROM t");
}

#[test]
fn test_empty_document_fallback() {
    let outcome = compile_document(&QueryDocument::empty());
    assert_eq!(
        outcome,
        CompileOutcome::Degraded {
            sql: "SELECT 1; -- No tables specified".into(),
            reason: DegradeReason::NoTables,
        }
    );
}

#[test]
fn test_unknown_join_type_degrades() {
    let outcome = compile_document(&doc(json!({
        "tables": ["a", "b"],
        "joins": [{"type": "NATURAL", "table1": "a", "table2": "b", "condition": "a.id = b.id"}]
    })));
    assert!(outcome.is_degraded());
    assert_snapshot!(outcome.sql(), @"SELECT 1; -- Error generating SQL: Invalid join type 'NATURAL'");
    assert_one_statement(outcome.sql(), Dialect::MySql);
}

// ============================================================================
// Typed queries
// ============================================================================

#[test]
fn test_from_lists_tables_without_joins() {
    let query = SemanticQuery::from_tables(["a", "b", "c"]).select(["a.x", "b.y"]);
    assert_eq!(compile(&query).sql(), "SELECT a.x, b.y FROM a, b, c");
}

#[test]
fn test_join_with_anchor_on_right() {
    let query = SemanticQuery::from_tables(["users", "orders"])
        .join(Join::inner("orders", "users", "users.id = orders.user_id"));
    assert_eq!(
        compile(&query).sql(),
        "SELECT * FROM users INNER JOIN orders ON users.id = orders.user_id"
    );
}

#[test]
fn test_join_chain() {
    let query = SemanticQuery::from_tables(["customers", "orders", "items"])
        .join(Join::inner("orders", "items", "orders.id = items.order_id"))
        .join(Join::left("customers", "orders", "customers.id = orders.customer_id"));

    assert_snapshot!(compile(&query).sql(), @"SELECT * FROM customers LEFT JOIN orders ON customers.id = orders.customer_id INNER JOIN items ON orders.id = items.order_id");
}

#[test]
fn test_self_join_on_anchor() {
    let outcome = compile_document(&doc(json!({
        "tables": ["emp"],
        "joins": [{"type": "LEFT", "table1": "emp", "table2": "emp", "condition": "a.m = b.id"}]
    })));
    assert_eq!(outcome.sql(), "SELECT * FROM emp LEFT JOIN emp ON a.m = b.id");
}

#[test]
fn test_unreachable_join_skipped() {
    let query = SemanticQuery::from_tables(["a", "b"])
        .join(Join::inner("x", "y", "x.id = y.x_id"));
    assert_eq!(compile(&query).sql(), "SELECT * FROM a");
}

#[test]
fn test_skipped_conditions() {
    let mut absent = Condition::eq("a", 1);
    absent.value = None;

    let query = SemanticQuery::from_tables(["t"])
        .filter(absent)
        .filter(Condition::eq("", "x"))
        .filter(Condition::in_list::<i64>("c", []))
        .filter(Condition::eq("d", false));
    assert_eq!(compile(&query).sql(), "SELECT * FROM t WHERE d = false");
}

#[test]
fn test_between_wrong_arity_is_one_literal() {
    let query = SemanticQuery::from_tables(["t"]).filter(Condition::new(
        "x",
        Operator::Between,
        ConditionValue::list([1, 2, 3]),
    ));
    assert_eq!(compile(&query).sql(), "SELECT * FROM t WHERE x BETWEEN '[1, 2, 3]'");

    let empty = compile_document(&doc(json!({
        "tables": ["t"],
        "conditions": [{"column": "x", "operator": "BETWEEN", "value": []}]
    })));
    assert!(!empty.is_degraded());
    assert_eq!(empty.sql(), "SELECT * FROM t WHERE x BETWEEN '[]'");
}

#[test]
fn test_aggregations_do_not_change_sql() {
    let base = SemanticQuery::from_tables(["orders"]).select(["SUM(amount) as total"]);
    let with_agg = base
        .clone()
        .aggregate(Aggregation::new(AggregateFunction::Sum, "amount").with_alias("total"));
    assert_eq!(compile(&base), compile(&with_agg));
}

#[test]
fn test_floats_and_nulls() {
    let query = SemanticQuery::from_tables(["t"])
        .filter(Condition::new("price", Operator::Lt, 9.99))
        .filter(Condition::new("deleted_at", Operator::Ne, Scalar::Null));
    assert_eq!(
        compile(&query).sql(),
        "SELECT * FROM t WHERE price < 9.99 AND deleted_at != NULL"
    );
}

// ============================================================================
// Dialects
// ============================================================================

#[test]
fn test_each_dialect_parses() {
    let query = SemanticQuery::from_tables(["users", "orders"])
        .select(["users.name", "COUNT(*) as n"])
        .join(Join::new(JoinType::Left, "users", "orders", "users.id = orders.user_id"))
        .filter(Condition::eq("users.active", true))
        .filter(Condition::between("orders.total", 10, 100))
        .group_by(["users.name"])
        .order_by(vec![OrderTerm::desc("n")])
        .limit(5);

    for dialect in [Dialect::MySql, Dialect::Postgres, Dialect::DuckDb] {
        let outcome = Compiler::new(dialect).compile(&query);
        assert!(!outcome.is_degraded());
        assert_one_statement(outcome.sql(), dialect);
    }
}

#[test]
fn test_backslash_only_escaped_for_mysql() {
    let query = SemanticQuery::from_tables(["files"]).filter(Condition::eq("path", r"C:\temp"));

    assert_eq!(
        Compiler::new(Dialect::MySql).compile(&query).sql(),
        r"SELECT * FROM files WHERE path = 'C:\\temp'"
    );
    assert_eq!(
        Compiler::new(Dialect::Postgres).compile(&query).sql(),
        r"SELECT * FROM files WHERE path = 'C:\temp'"
    );
}

#[test]
fn test_idempotent() {
    let input = doc(json!({
        "tables": ["orders"],
        "conditions": [{"column": "id", "operator": "IN", "value": [3, 1, 2]}],
        "order_by": [{"column": "id"}],
        "limit": 3
    }));
    let compiler = Compiler::new(Dialect::MySql);
    let first = compiler.compile_document(&input);
    for _ in 0..10 {
        assert_eq!(compiler.compile_document(&input), first);
    }
}
