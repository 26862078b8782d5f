//! Compiled query tree
//!
//! A query document compiles once into a [`QueryNode`]; matching is an
//! exhaustive walk over these variants.

use std::fmt;

use regex::Regex;
use serde_json::Value;

use crate::path::FieldPath;
use crate::value::TypeKind;

/// A (sub)expression of the query language
#[derive(Debug, Clone)]
pub enum QueryNode {
    /// Predicate over the candidates a path resolves to
    FieldMatch {
        path: FieldPath,
        predicate: ValuePredicate,
    },
    /// All children match. An empty `And` matches everything.
    And(Vec<QueryNode>),
    /// At least one child matches
    Or(Vec<QueryNode>),
    /// No child matches
    Nor(Vec<QueryNode>),
    /// The child does not match
    Not(Box<QueryNode>),
}

impl QueryNode {
    /// The node that matches every record
    pub fn match_all() -> Self {
        QueryNode::And(Vec::new())
    }

    /// True if this node trivially matches every record
    pub fn is_match_all(&self) -> bool {
        matches!(self, QueryNode::And(children) if children.is_empty())
    }

    /// Number of nodes in the tree, this one included
    pub fn node_count(&self) -> usize {
        match self {
            QueryNode::FieldMatch { predicate, .. } => 1 + predicate.nested_node_count(),
            QueryNode::And(children) | QueryNode::Or(children) | QueryNode::Nor(children) => {
                1 + children.iter().map(QueryNode::node_count).sum::<usize>()
            }
            QueryNode::Not(child) => 1 + child.node_count(),
        }
    }

    pub(crate) fn field(path: FieldPath, predicate: ValuePredicate) -> Self {
        QueryNode::FieldMatch { path, predicate }
    }

    /// Collapses a clause list into a single node.
    pub(crate) fn all_of(mut clauses: Vec<QueryNode>) -> Self {
        if clauses.len() == 1 {
            clauses.remove(0)
        } else {
            QueryNode::And(clauses)
        }
    }
}

/// Ordering comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Gt,
    Gte,
    Lt,
    Lte,
    /// Not equal. Holds when no candidate equals the operand, including
    /// when the field is missing.
    Ne,
}

impl CompareOp {
    /// Evaluates an ordering between candidate and operand.
    pub fn eval_ordering(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            CompareOp::Gt => ordering == Greater,
            CompareOp::Gte => ordering != Less,
            CompareOp::Lt => ordering == Less,
            CompareOp::Lte => ordering != Greater,
            CompareOp::Ne => ordering != Equal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Gt => "$gt",
            CompareOp::Gte => "$gte",
            CompareOp::Lt => "$lt",
            CompareOp::Lte => "$lte",
            CompareOp::Ne => "$ne",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A compiled `$regex` with the flags it was built from
#[derive(Debug, Clone)]
pub struct RegexPattern {
    pub source: String,
    pub flags: String,
    pub compiled: Regex,
}

impl RegexPattern {
    pub fn is_match(&self, haystack: &str) -> bool {
        self.compiled.is_match(haystack)
    }
}

/// Condition applied to each element by `$elemMatch`
#[derive(Debug, Clone)]
pub enum ElemCondition {
    /// The element is matched as a record in its own right
    Document(Box<QueryNode>),
    /// Operator predicates applied to the element value itself, compiled
    /// against the root path
    Value(Box<QueryNode>),
}

/// Predicate over a field's candidate values
#[derive(Debug, Clone)]
pub enum ValuePredicate {
    Equals(Value),
    Compare(CompareOp, Value),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    Exists(bool),
    TypeOf(TypeKind),
    Regex(RegexPattern),
    ElemMatch(ElemCondition),
    All(Vec<Value>),
    Size(usize),
}

impl ValuePredicate {
    fn nested_node_count(&self) -> usize {
        match self {
            ValuePredicate::ElemMatch(ElemCondition::Document(node))
            | ValuePredicate::ElemMatch(ElemCondition::Value(node)) => node.node_count(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;
    use serde_json::json;

    #[test]
    fn test_match_all() {
        assert!(QueryNode::match_all().is_match_all());
        assert!(!QueryNode::Or(Vec::new()).is_match_all());
    }

    #[test]
    fn test_all_of_collapses_single_clause() {
        let clause = QueryNode::field("a".into(), ValuePredicate::Equals(json!(1)));
        assert!(matches!(
            QueryNode::all_of(vec![clause]),
            QueryNode::FieldMatch { .. }
        ));
        assert!(QueryNode::all_of(Vec::new()).is_match_all());
    }

    #[test]
    fn test_node_count() {
        let node = QueryNode::Or(vec![
            QueryNode::field("a".into(), ValuePredicate::Exists(true)),
            QueryNode::Not(Box::new(QueryNode::field(
                "b".into(),
                ValuePredicate::Size(2),
            ))),
        ]);
        assert_eq!(node.node_count(), 4);
    }

    #[test]
    fn test_compare_op_eval() {
        assert!(CompareOp::Gt.eval_ordering(Ordering::Greater));
        assert!(!CompareOp::Gt.eval_ordering(Ordering::Equal));
        assert!(CompareOp::Gte.eval_ordering(Ordering::Equal));
        assert!(CompareOp::Lt.eval_ordering(Ordering::Less));
        assert!(CompareOp::Lte.eval_ordering(Ordering::Equal));
        assert!(!CompareOp::Lte.eval_ordering(Ordering::Greater));
        assert!(CompareOp::Ne.eval_ordering(Ordering::Less));
        assert!(!CompareOp::Ne.eval_ordering(Ordering::Equal));
    }
}
