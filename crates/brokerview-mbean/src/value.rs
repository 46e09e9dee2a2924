//! Typed attribute values for management replies.
//!
//! The bridge answers in JSON. Replies are converted into [`AttrValue`]
//! at the boundary so the rest of the console never threads raw
//! `serde_json::Value` through its call chain.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A management attribute value.
///
/// Tagged variant over string, number, boolean, mapping, and sequence.
/// `Null` covers unset broker attributes, which the bridge reports as
/// JSON null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Sequence(Vec<AttrValue>),
    Mapping(BTreeMap<String, AttrValue>),
}

impl AttrValue {
    /// Total conversion from a JSON reply. Numbers that do not fit `f64`
    /// exactly degrade to their closest representation, which is all the
    /// views need (counts and percentages).
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => AttrValue::Null,
            Value::Bool(b) => AttrValue::Bool(b),
            Value::Number(n) => AttrValue::Number(n.as_f64().unwrap_or(0.0)),
            Value::String(s) => AttrValue::String(s),
            Value::Array(items) => {
                AttrValue::Sequence(items.into_iter().map(AttrValue::from_json).collect())
            }
            Value::Object(map) => AttrValue::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, AttrValue::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Narrowing accessor for integral attributes (message counts etc).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Number(n) if n.fract() == 0.0 => Some(*n as i64),
            _ => None,
        }
    }

    /// Mapping member by key.
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        match self {
            AttrValue::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Sequence members, empty for non-sequences.
    pub fn iter(&self) -> std::slice::Iter<'_, AttrValue> {
        match self {
            AttrValue::Sequence(items) => items.iter(),
            _ => [].iter(),
        }
    }
}

impl From<Value> for AttrValue {
    fn from(value: Value) -> Self {
        AttrValue::from_json(value)
    }
}
