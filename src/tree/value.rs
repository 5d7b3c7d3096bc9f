//! The tagged union of value shapes the format admits.

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::error::Error;

use super::OrderedMap;

/// One node of the parsed tree.
///
/// Strings keep the source token verbatim, surrounding double quotes
/// included when the source quoted it; quoting is a semantic bit, not
/// cosmetic. Integers cover the small flags and encoding codes the format
/// uses. There is no catch-all variant: every consumer names the shape it
/// expects.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Sequence(Vec<Value>),
    Mapping(OrderedMap),
}

impl Value {
    /// The variant name, for diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&OrderedMap> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut OrderedMap> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// The string inside, or a [`Error::TypeMismatch`] naming both tags.
    pub fn try_str(&self) -> Result<&str, Error> {
        self.as_str().ok_or(Error::TypeMismatch {
            expected: "string",
            found: self.tag(),
        })
    }

    /// The integer inside, or a [`Error::TypeMismatch`].
    pub fn try_integer(&self) -> Result<i64, Error> {
        self.as_integer().ok_or(Error::TypeMismatch {
            expected: "integer",
            found: self.tag(),
        })
    }

    /// The sequence inside, or a [`Error::TypeMismatch`].
    pub fn try_sequence(&self) -> Result<&Vec<Value>, Error> {
        match self {
            Value::Sequence(seq) => Ok(seq),
            other => Err(Error::TypeMismatch {
                expected: "sequence",
                found: other.tag(),
            }),
        }
    }

    /// The mapping inside, or a [`Error::TypeMismatch`].
    pub fn try_mapping(&self) -> Result<&OrderedMap, Error> {
        match self {
            Value::Mapping(map) => Ok(map),
            other => Err(Error::TypeMismatch {
                expected: "mapping",
                found: other.tag(),
            }),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<OrderedMap> for Value {
    fn from(map: OrderedMap) -> Self {
        Value::Mapping(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(seq: Vec<Value>) -> Self {
        Value::Sequence(seq)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Integer(n) => serializer.serialize_i64(*n),
            Value::Sequence(seq) => {
                let mut out = serializer.serialize_seq(Some(seq.len()))?;
                for item in seq {
                    out.serialize_element(item)?;
                }
                out.end()
            }
            Value::Mapping(map) => map.serialize(serializer),
        }
    }
}

/// A `{ value, comment }` pair as it appears inside sequences: a UUID
/// reference annotated with the label Xcode renders beside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentedEntry {
    pub value: String,
    pub comment: String,
}

impl CommentedEntry {
    pub fn new(value: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            comment: comment.into(),
        }
    }

    /// The anonymous two-entry mapping this pair is stored as.
    pub fn into_value(self) -> Value {
        Value::Mapping(OrderedMap::from_entries([
            ("value", Value::String(self.value)),
            ("comment", Value::String(self.comment)),
        ]))
    }
}
