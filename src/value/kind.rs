//! Value kinds addressable by `$type`

use std::fmt;

use serde_json::Value;

use super::compare::parse_timestamp;

/// A value kind named by a `$type` predicate.
///
/// Accepts the usual names and the BSON numeric codes:
///
/// | Kind | Names | Code |
/// |------|-------|------|
/// | Double | `double` | 1 |
/// | String | `string` | 2 |
/// | Object | `object` | 3 |
/// | Array | `array` | 4 |
/// | Bool | `bool`, `boolean` | 8 |
/// | Date | `date` | 9 |
/// | Null | `null` | 10 |
/// | Int | `int` | 16 |
/// | Long | `long` | 18 |
/// | Number | `number` | - |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Double,
    String,
    Object,
    Array,
    Bool,
    /// A string holding an RFC 3339 timestamp or `YYYY-MM-DD` date
    Date,
    Null,
    /// Integer within 32-bit range
    Int,
    /// Any integer
    Long,
    /// Any number
    Number,
}

impl TypeKind {
    /// Parses a kind from its name.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "double" => TypeKind::Double,
            "string" => TypeKind::String,
            "object" => TypeKind::Object,
            "array" => TypeKind::Array,
            "bool" | "boolean" => TypeKind::Bool,
            "date" => TypeKind::Date,
            "null" => TypeKind::Null,
            "int" => TypeKind::Int,
            "long" => TypeKind::Long,
            "number" => TypeKind::Number,
            _ => return None,
        };
        Some(kind)
    }

    /// Parses a kind from its BSON numeric code.
    pub fn from_code(code: i64) -> Option<Self> {
        let kind = match code {
            1 => TypeKind::Double,
            2 => TypeKind::String,
            3 => TypeKind::Object,
            4 => TypeKind::Array,
            8 => TypeKind::Bool,
            9 => TypeKind::Date,
            10 => TypeKind::Null,
            16 => TypeKind::Int,
            18 => TypeKind::Long,
            _ => return None,
        };
        Some(kind)
    }

    /// Parses a kind from a `$type` operand (name or code).
    pub fn from_operand(operand: &Value) -> Option<Self> {
        match operand {
            Value::String(name) => Self::from_name(name),
            Value::Number(code) => code.as_i64().and_then(Self::from_code),
            _ => None,
        }
    }

    /// Returns true if `value` is of this kind.
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (TypeKind::Double, Value::Number(n)) => n.is_f64(),
            (TypeKind::String, Value::String(_)) => true,
            (TypeKind::Object, Value::Object(_)) => true,
            (TypeKind::Array, Value::Array(_)) => true,
            (TypeKind::Bool, Value::Bool(_)) => true,
            (TypeKind::Date, Value::String(s)) => parse_timestamp(s).is_some(),
            (TypeKind::Null, Value::Null) => true,
            (TypeKind::Int, Value::Number(n)) => n
                .as_i64()
                .is_some_and(|i| i32::try_from(i).is_ok()),
            (TypeKind::Long, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (TypeKind::Number, Value::Number(_)) => true,
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Double => "double",
            TypeKind::String => "string",
            TypeKind::Object => "object",
            TypeKind::Array => "array",
            TypeKind::Bool => "bool",
            TypeKind::Date => "date",
            TypeKind::Null => "null",
            TypeKind::Int => "int",
            TypeKind::Long => "long",
            TypeKind::Number => "number",
        }
    }
}

/// Name of a JSON value's kind, for error messages
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
