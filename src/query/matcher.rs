//! Query evaluation against a single record
//!
//! Field predicates have existential semantics: a path resolves to a set of
//! candidates (see [`crate::path`]) and the predicate holds if it holds for
//! any of them. A candidate that is an array also offers each of its
//! elements to `Equals`, `Compare`, `In`, `Regex` and `TypeOf`.
//!
//! Missing fields:
//! - `$exists: true` fails, `$exists: false` holds
//! - `Equals(null)` holds (missing behaves as null), including when only
//!   some array elements lack the field
//! - `$ne` and `$nin` hold unless their operand includes null

use serde_json::{Map, Value};

use super::ast::{CompareOp, ElemCondition, QueryNode, ValuePredicate};
use crate::path::{self, FieldPath, Resolution};
use crate::value::{compare_values, values_equal, Collation, TypeKind};

/// Anything a field path can be resolved against.
trait Root {
    fn candidates<'a>(&'a self, path: &FieldPath) -> Resolution<'a>;
}

impl Root for Map<String, Value> {
    fn candidates<'a>(&'a self, path: &FieldPath) -> Resolution<'a> {
        path::resolve_with_gaps(self, path)
    }
}

impl Root for Value {
    fn candidates<'a>(&'a self, path: &FieldPath) -> Resolution<'a> {
        path::resolve_value_with_gaps(self, path)
    }
}

/// Evaluates `node` against a record's top-level fields.
pub fn matches(fields: &Map<String, Value>, node: &QueryNode) -> bool {
    eval(fields, node)
}

fn eval<R: Root + ?Sized>(root: &R, node: &QueryNode) -> bool {
    match node {
        QueryNode::FieldMatch { path, predicate } => {
            let resolution = root.candidates(path);
            predicate_holds(&resolution, predicate)
        }
        QueryNode::And(children) => children.iter().all(|child| eval(root, child)),
        QueryNode::Or(children) => children.iter().any(|child| eval(root, child)),
        QueryNode::Nor(children) => !children.iter().any(|child| eval(root, child)),
        QueryNode::Not(child) => !eval(root, child),
    }
}

fn predicate_holds(resolution: &Resolution<'_>, predicate: &ValuePredicate) -> bool {
    let candidates = resolution.values.as_slice();
    match predicate {
        ValuePredicate::Equals(expected) => equals_any(resolution, expected),
        ValuePredicate::Compare(CompareOp::Ne, operand) => !equals_any(resolution, operand),
        ValuePredicate::Compare(op, bound) => expanded(candidates).any(|value| {
            compare_values(value, bound, Collation::Binary)
                .is_some_and(|ordering| op.eval_ordering(ordering))
        }),
        ValuePredicate::In(set) => set.iter().any(|member| equals_any(resolution, member)),
        ValuePredicate::NotIn(set) => !set.iter().any(|member| equals_any(resolution, member)),
        ValuePredicate::Exists(flag) => candidates.is_empty() != *flag,
        ValuePredicate::TypeOf(TypeKind::Array) => {
            candidates.iter().any(|value| value.is_array())
        }
        ValuePredicate::TypeOf(kind) => expanded(candidates).any(|value| kind.matches(value)),
        ValuePredicate::Regex(pattern) => expanded(candidates)
            .any(|value| value.as_str().is_some_and(|s| pattern.is_match(s))),
        ValuePredicate::ElemMatch(condition) => candidates
            .iter()
            .filter_map(|value| value.as_array())
            .any(|items| items.iter().any(|item| element_matches(item, condition))),
        ValuePredicate::All(values) => {
            !values.is_empty() && values.iter().all(|value| equals_any(resolution, value))
        }
        ValuePredicate::Size(size) => candidates
            .iter()
            .any(|value| value.as_array().is_some_and(|items| items.len() == *size)),
    }
}

fn element_matches(item: &Value, condition: &ElemCondition) -> bool {
    match condition {
        ElemCondition::Document(node) => item.is_object() && eval(item, node),
        ElemCondition::Value(node) => eval(item, node),
    }
}

/// Candidates plus the elements of any array candidate.
fn expanded<'a>(candidates: &'a [&'a Value]) -> impl Iterator<Item = &'a Value> + 'a {
    candidates.iter().flat_map(|value| {
        let elements = value.as_array().map(|items| items.iter()).into_iter().flatten();
        std::iter::once(*value).chain(elements)
    })
}

fn equals_any(resolution: &Resolution<'_>, expected: &Value) -> bool {
    if expected.is_null() && (resolution.values.is_empty() || resolution.gap) {
        return true;
    }
    expanded(&resolution.values).any(|value| values_equal(value, expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::query::compiler::compile;
    use serde_json::json;

    fn check(record: Value, query: Value) -> bool {
        let node = compile(&query, &EngineConfig::default()).unwrap();
        match record {
            Value::Object(fields) => matches(&fields, &node),
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_equality() {
        let record = json!({"name": "Alice", "age": 30});
        assert!(check(record.clone(), json!({"name": "Alice"})));
        assert!(!check(record.clone(), json!({"name": "Bob"})));
        assert!(check(record, json!({"age": 30.0})));
    }

    #[test]
    fn test_no_type_coercion() {
        assert!(!check(json!({"value": 123}), json!({"value": "123"})));
    }

    #[test]
    fn test_empty_query_matches() {
        assert!(check(json!({"a": 1}), json!({})));
    }

    #[test]
    fn test_range_predicates() {
        let record = json!({"age": 25});
        assert!(check(record.clone(), json!({"age": {"$gte": 18}})));
        assert!(check(record.clone(), json!({"age": {"$lte": 25}})));
        assert!(!check(record.clone(), json!({"age": {"$gt": 25}})));
        assert!(!check(record, json!({"age": {"$lt": 25}})));
    }

    #[test]
    fn test_range_against_incompatible_type_never_matches() {
        let record = json!({"age": "25"});
        assert!(!check(record.clone(), json!({"age": {"$gt": 1}})));
        assert!(!check(record, json!({"age": {"$lt": 1}})));
    }

    #[test]
    fn test_string_range_is_lexicographic() {
        assert!(check(json!({"name": "bob"}), json!({"name": {"$gt": "alice"}})));
        assert!(!check(json!({"name": "Bob"}), json!({"name": {"$gt": "alice"}})));
    }

    #[test]
    fn test_temporal_range() {
        let record = json!({"at": "2024-06-01T08:00:00+02:00"});
        assert!(check(record.clone(), json!({"at": {"$lt": "2024-06-01T07:00:00Z"}})));
        assert!(check(record, json!({"at": {"$gte": "2024-05-31"}})));
    }

    #[test]
    fn test_exists_on_missing_field() {
        let record = json!({"a": null});
        assert!(check(record.clone(), json!({"a": {"$exists": true}})));
        assert!(!check(record.clone(), json!({"b": {"$exists": true}})));
        assert!(check(record, json!({"b": {"$exists": false}})));
    }

    #[test]
    fn test_null_equality_matches_missing() {
        assert!(check(json!({"a": 1}), json!({"b": null})));
        assert!(check(json!({"b": null}), json!({"b": null})));
        assert!(!check(json!({"b": 0}), json!({"b": null})));
    }

    #[test]
    fn test_null_matches_element_missing_field() {
        let record = json!({"comments": [{"text": "hi"}, {"votes": 2}]});
        assert!(check(record.clone(), json!({"comments.text": null})));
        assert!(check(record.clone(), json!({"comments.text": {"$in": [null]}})));
        assert!(!check(record.clone(), json!({"comments.text": {"$ne": null}})));
        assert!(check(record, json!({"comments.text": "hi"})));

        let complete = json!({"comments": [{"text": "hi"}, {"text": "yo"}]});
        assert!(!check(complete.clone(), json!({"comments.text": null})));
        assert!(check(complete, json!({"comments.text": {"$ne": null}})));
    }

    #[test]
    fn test_positional_path_null_only_when_element_lacks_field() {
        let record = json!({"items": [{"sku": "x"}, {"qty": 1}]});
        assert!(!check(record.clone(), json!({"items.0.sku": null})));
        assert!(check(record, json!({"items.1.sku": null})));
    }

    #[test]
    fn test_ne_and_nin_on_missing_field() {
        let record = json!({"a": 1});
        assert!(check(record.clone(), json!({"b": {"$ne": 5}})));
        assert!(check(record.clone(), json!({"b": {"$nin": [5, 6]}})));
        assert!(!check(record.clone(), json!({"b": {"$ne": null}})));
        assert!(!check(record.clone(), json!({"a": {"$ne": 1}})));
        assert!(!check(record, json!({"a": {"$nin": [1, 2]}})));
    }

    #[test]
    fn test_in() {
        let record = json!({"status": "open"});
        assert!(check(record.clone(), json!({"status": {"$in": ["open", "closed"]}})));
        assert!(!check(record.clone(), json!({"status": {"$in": []}})));
        assert!(!check(record, json!({"missing": {"$in": ["x"]}})));
    }

    #[test]
    fn test_array_field_equality_and_fan_out() {
        let record = json!({
            "tags": ["red", "blue"],
            "comments": [{"text": "hi"}, {"text": "yo"}]
        });
        assert!(check(record.clone(), json!({"tags": "blue"})));
        assert!(check(record.clone(), json!({"tags": ["red", "blue"]})));
        assert!(!check(record.clone(), json!({"tags": "green"})));
        assert!(check(record.clone(), json!({"comments.text": "yo"})));
        assert!(!check(record, json!({"comments.text": "hey"})));
    }

    #[test]
    fn test_compare_over_array_elements() {
        let record = json!({"scores": [40, 95]});
        assert!(check(record.clone(), json!({"scores": {"$gt": 90}})));
        assert!(!check(record, json!({"scores": {"$gt": 99}})));
    }

    #[test]
    fn test_regex_matches_strings_only() {
        assert!(check(json!({"name": "Alice"}), json!({"name": {"$regex": "^A"}})));
        assert!(!check(json!({"name": 42}), json!({"name": {"$regex": "4"}})));
        assert!(check(json!({"tags": ["x", "Alpha"]}), json!({"tags": {"$regex": "alp", "$options": "i"}})));
    }

    #[test]
    fn test_type_of() {
        assert!(check(json!({"a": "x"}), json!({"a": {"$type": "string"}})));
        assert!(check(json!({"a": [1, 2]}), json!({"a": {"$type": "array"}})));
        assert!(check(json!({"a": [1, "x"]}), json!({"a": {"$type": "string"}})));
        assert!(!check(json!({"a": 1}), json!({"a": {"$type": "array"}})));
        assert!(check(json!({"a": null}), json!({"a": {"$type": 10}})));
    }

    #[test]
    fn test_size() {
        let record = json!({"tags": ["a", "b"], "name": "ab"});
        assert!(check(record.clone(), json!({"tags": {"$size": 2}})));
        assert!(!check(record.clone(), json!({"tags": {"$size": 1}})));
        assert!(!check(record, json!({"name": {"$size": 2}})));
    }

    #[test]
    fn test_all() {
        let record = json!({"tags": ["a", "b", "c"]});
        assert!(check(record.clone(), json!({"tags": {"$all": ["c", "a"]}})));
        assert!(!check(record.clone(), json!({"tags": {"$all": ["a", "z"]}})));
        assert!(!check(record, json!({"tags": {"$all": []}})));
    }

    #[test]
    fn test_elem_match_document() {
        let record = json!({
            "comments": [
                {"author": "bob", "votes": 1},
                {"author": "eve", "votes": 9}
            ]
        });
        assert!(check(
            record.clone(),
            json!({"comments": {"$elemMatch": {"author": "eve", "votes": {"$gt": 5}}}})
        ));
        // Conditions must hold on the same element
        assert!(!check(
            record,
            json!({"comments": {"$elemMatch": {"author": "bob", "votes": {"$gt": 5}}}})
        ));
    }

    #[test]
    fn test_elem_match_value() {
        let record = json!({"scores": [70, 85, 99]});
        assert!(check(record.clone(), json!({"scores": {"$elemMatch": {"$gte": 80, "$lt": 90}}})));
        assert!(!check(record, json!({"scores": {"$elemMatch": {"$gte": 90, "$lt": 95}}})));
    }

    #[test]
    fn test_elem_match_requires_array() {
        assert!(!check(json!({"a": {"b": 1}}), json!({"a": {"$elemMatch": {"b": 1}}})));
        assert!(!check(json!({"a": [1, 2]}), json!({"a": {"$elemMatch": {"b": 1}}})));
    }

    #[test]
    fn test_logical_operators() {
        let record = json!({"a": 1, "b": 2});
        assert!(check(record.clone(), json!({"$and": [{"a": 1}, {"b": 2}]})));
        assert!(!check(record.clone(), json!({"$and": [{"a": 1}, {"b": 3}]})));
        assert!(check(record.clone(), json!({"$or": [{"a": 5}, {"b": 2}]})));
        assert!(!check(record.clone(), json!({"$or": [{"a": 5}, {"b": 5}]})));
        assert!(check(record.clone(), json!({"$nor": [{"a": 5}, {"b": 5}]})));
        assert!(!check(record.clone(), json!({"$nor": [{"a": 1}]})));
        assert!(check(record.clone(), json!({"$not": {"a": 5}})));
        assert!(!check(record, json!({"$not": {"a": 1}})));
    }

    #[test]
    fn test_field_level_not() {
        let record = json!({"age": 3});
        assert!(check(record.clone(), json!({"age": {"$not": {"$gt": 5}}})));
        assert!(!check(record, json!({"age": {"$not": {"$lt": 5}}})));
        assert!(check(json!({}), json!({"age": {"$not": {"$gt": 5}}})));
    }

    #[test]
    fn test_nested_path_missing_intermediate() {
        assert!(!check(json!({"a": 1}), json!({"a.b.c": 1})));
        assert!(check(json!({"a": 1}), json!({"a.b.c": {"$exists": false}})));
    }
}
