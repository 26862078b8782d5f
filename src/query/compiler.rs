//! Query document compilation
//!
//! Grammar:
//!
//! ```text
//! document   := { (logical | field)* }            empty document matches all
//! logical    := "$and" | "$or" | "$nor" : [document, ...]   (non-empty)
//!             | "$not" : document
//! field      := path : literal                    implicit equality
//!             | path : { operator* }              operators are ANDed
//! operator   := $eq $gt $gte $lt $lte $ne $in $nin $exists $type
//!             | $regex [$options] | $elemMatch | $all | $size | $not
//! ```
//!
//! Any other `$`-prefixed key is rejected here rather than ignored at match
//! time.

use regex::RegexBuilder;
use serde_json::{Map, Value};

use super::ast::{CompareOp, ElemCondition, QueryNode, RegexPattern, ValuePredicate};
use super::errors::{QueryError, QueryResult};
use crate::config::EngineConfig;
use crate::path::FieldPath;
use crate::value::{kind_name, TypeKind};

const REGEX_FLAGS: &str = "imsx";

/// Compiles a query document. `null` is the empty query.
pub fn compile(document: &Value, config: &EngineConfig) -> QueryResult<QueryNode> {
    match document {
        Value::Null => Ok(QueryNode::match_all()),
        Value::Object(clauses) => compile_document(clauses, config),
        other => Err(QueryError::InvalidDocument {
            found: kind_name(other),
        }),
    }
}

fn compile_document(clauses: &Map<String, Value>, config: &EngineConfig) -> QueryResult<QueryNode> {
    let mut nodes = Vec::with_capacity(clauses.len());

    for (key, value) in clauses {
        let node = match key.as_str() {
            "$and" => QueryNode::And(compile_list("$and", value, config)?),
            "$or" => QueryNode::Or(compile_list("$or", value, config)?),
            "$nor" => QueryNode::Nor(compile_list("$nor", value, config)?),
            "$not" => match value {
                Value::Object(inner) => QueryNode::Not(Box::new(compile_document(inner, config)?)),
                other => {
                    return Err(QueryError::operand(
                        "$not",
                        format!("expected a query document, got {}", kind_name(other)),
                    ))
                }
            },
            operator if operator.starts_with('$') => {
                return Err(QueryError::UnknownOperator {
                    operator: operator.to_string(),
                    path: None,
                })
            }
            field => compile_field(FieldPath::new(field), value, config)?,
        };
        nodes.push(node);
    }

    Ok(QueryNode::all_of(nodes))
}

fn compile_list(
    operator: &'static str,
    value: &Value,
    config: &EngineConfig,
) -> QueryResult<Vec<QueryNode>> {
    let items = match value {
        Value::Array(items) if !items.is_empty() => items,
        Value::Array(_) => {
            return Err(QueryError::operand(operator, "expected a non-empty array"))
        }
        other => {
            return Err(QueryError::operand(
                operator,
                format!("expected an array, got {}", kind_name(other)),
            ))
        }
    };

    items
        .iter()
        .map(|item| match item {
            Value::Object(clauses) => compile_document(clauses, config),
            other => Err(QueryError::operand(
                operator,
                format!("expected query documents, got {}", kind_name(other)),
            )),
        })
        .collect()
}

fn compile_field(path: FieldPath, value: &Value, config: &EngineConfig) -> QueryResult<QueryNode> {
    match value {
        Value::Object(operators) if is_operator_object(operators) => {
            compile_operators(&path, operators, config)
        }
        literal => Ok(QueryNode::field(path, ValuePredicate::Equals(literal.clone()))),
    }
}

fn is_operator_object(object: &Map<String, Value>) -> bool {
    object.keys().any(|key| key.starts_with('$'))
}

fn compile_operators(
    path: &FieldPath,
    operators: &Map<String, Value>,
    config: &EngineConfig,
) -> QueryResult<QueryNode> {
    let mut nodes = Vec::with_capacity(operators.len());

    for (key, operand) in operators {
        let predicate = match key.as_str() {
            "$eq" => ValuePredicate::Equals(operand.clone()),
            "$gt" => ValuePredicate::Compare(CompareOp::Gt, operand.clone()),
            "$gte" => ValuePredicate::Compare(CompareOp::Gte, operand.clone()),
            "$lt" => ValuePredicate::Compare(CompareOp::Lt, operand.clone()),
            "$lte" => ValuePredicate::Compare(CompareOp::Lte, operand.clone()),
            "$ne" => ValuePredicate::Compare(CompareOp::Ne, operand.clone()),
            "$in" => ValuePredicate::In(array_operand("$in", operand)?),
            "$nin" => ValuePredicate::NotIn(array_operand("$nin", operand)?),
            "$all" => ValuePredicate::All(array_operand("$all", operand)?),
            "$exists" => ValuePredicate::Exists(flag_operand("$exists", operand)?),
            "$size" => ValuePredicate::Size(size_operand(operand)?),
            "$type" => ValuePredicate::TypeOf(
                TypeKind::from_operand(operand)
                    .ok_or_else(|| QueryError::UnknownType(operand.to_string()))?,
            ),
            "$regex" => ValuePredicate::Regex(compile_regex(
                operand,
                operators.get("$options"),
                config,
            )?),
            "$options" => {
                if !operators.contains_key("$regex") {
                    return Err(QueryError::operand("$options", "requires $regex"));
                }
                continue;
            }
            "$elemMatch" => ValuePredicate::ElemMatch(compile_elem_match(operand, config)?),
            "$not" => {
                nodes.push(QueryNode::Not(Box::new(compile_negated(path, operand, config)?)));
                continue;
            }
            other => {
                return Err(QueryError::UnknownOperator {
                    operator: other.to_string(),
                    path: Some(path.to_string()),
                })
            }
        };
        nodes.push(QueryNode::field(path.clone(), predicate));
    }

    Ok(QueryNode::all_of(nodes))
}

/// Field-level `$not`: an operator object over the same path.
fn compile_negated(path: &FieldPath, operand: &Value, config: &EngineConfig) -> QueryResult<QueryNode> {
    match operand {
        Value::Object(operators) if is_operator_object(operators) => {
            compile_operators(path, operators, config)
        }
        _ => Err(QueryError::operand("$not", "expected an operator object")),
    }
}

fn compile_elem_match(operand: &Value, config: &EngineConfig) -> QueryResult<ElemCondition> {
    let Value::Object(object) = operand else {
        return Err(QueryError::operand(
            "$elemMatch",
            format!("expected an object, got {}", kind_name(operand)),
        ));
    };

    let applies_to_value = !object.is_empty()
        && object
            .keys()
            .all(|key| key.starts_with('$') && !matches!(key.as_str(), "$and" | "$or" | "$nor"));

    if applies_to_value {
        let node = compile_operators(&FieldPath::root(), object, config)?;
        Ok(ElemCondition::Value(Box::new(node)))
    } else {
        Ok(ElemCondition::Document(Box::new(compile_document(object, config)?)))
    }
}

fn compile_regex(
    operand: &Value,
    options: Option<&Value>,
    config: &EngineConfig,
) -> QueryResult<RegexPattern> {
    let Value::String(pattern) = operand else {
        return Err(QueryError::operand("$regex", "expected a string pattern"));
    };

    let flags = match options {
        None => String::new(),
        Some(Value::String(flags)) => flags.clone(),
        Some(_) => return Err(QueryError::operand("$options", "expected a string")),
    };
    if let Some(bad) = flags.chars().find(|c| !REGEX_FLAGS.contains(*c)) {
        return Err(QueryError::InvalidRegexFlags(bad.to_string()));
    }

    let compiled = RegexBuilder::new(pattern)
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'))
        .ignore_whitespace(flags.contains('x'))
        .size_limit(config.regex_size_limit)
        .build()
        .map_err(|source| QueryError::InvalidRegex {
            pattern: pattern.clone(),
            source,
        })?;

    Ok(RegexPattern {
        source: pattern.clone(),
        flags,
        compiled,
    })
}

fn array_operand(operator: &'static str, operand: &Value) -> QueryResult<Vec<Value>> {
    match operand {
        Value::Array(items) => Ok(items.clone()),
        other => Err(QueryError::operand(
            operator,
            format!("expected an array, got {}", kind_name(other)),
        )),
    }
}

fn flag_operand(operator: &'static str, operand: &Value) -> QueryResult<bool> {
    match operand {
        Value::Bool(flag) => Ok(*flag),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        other => Err(QueryError::operand(
            operator,
            format!("expected a boolean, got {}", kind_name(other)),
        )),
    }
}

fn size_operand(operand: &Value) -> QueryResult<usize> {
    let size = match operand {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        _ => None,
    };
    size.and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| QueryError::operand("$size", "expected a non-negative integer"))
}
