//! Query parameters: scalar values and an insertion-ordered map.
//!
//! Gumlet parameters end up in a query string, so the map keeps keys in the
//! order they were first inserted. Overwriting an existing key keeps its
//! position; new keys are appended.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A `key=value` parameter string that couldn't be split.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamParseError {
    #[error("expected KEY=VALUE, got {0:?}")]
    MissingEquals(String),
    #[error("parameter key is empty in {0:?}")]
    EmptyKey(String),
}

/// Parses `key=value` into a key and a loosely typed value.
/// Only the first `=` splits; the value may itself contain `=`.
pub fn parse_key_value(s: &str) -> Result<(String, ParamValue), ParamParseError> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| ParamParseError::MissingEquals(s.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParamParseError::EmptyKey(s.to_string()));
    }
    let value = match raw.parse::<ParamValue>() {
        Ok(v) => v,
        Err(never) => match never {},
    };
    Ok((key.to_string(), value))
}

/// A single scalar parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Explicit null. Counts as unset and is dropped from the final URL.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    /// True for values that never make it into the query string (null, "").
    pub fn is_blank(&self) -> bool {
        match self {
            ParamValue::Null => true,
            ParamValue::Str(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => Ok(()),
            // Form encoding has no booleans; 1/0 is what CDNs accept for flags.
            ParamValue::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
            ParamValue::Int(n) => write!(f, "{}", n),
            ParamValue::Float(x) => write!(f, "{}", x),
            ParamValue::Str(s) => f.write_str(s),
        }
    }
}

/// Parses loosely typed input such as a CLI `key=value` value.
///
/// `null`, `true`/`false`, integers and finite floats get their own variant;
/// anything else is kept as a string.
impl FromStr for ParamValue {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = match s {
            "null" => ParamValue::Null,
            "true" => ParamValue::Bool(true),
            "false" => ParamValue::Bool(false),
            _ => {
                if let Ok(n) = s.parse::<i64>() {
                    ParamValue::Int(n)
                } else if let Some(x) = s
                    .parse::<f64>()
                    .ok()
                    .filter(|x| x.is_finite() && s.bytes().any(|b| b.is_ascii_digit()))
                {
                    ParamValue::Float(x)
                } else {
                    ParamValue::Str(s.to_string())
                }
            }
        };
        Ok(value)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        ParamValue::Int(i64::from(n))
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        ParamValue::Float(x)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

/// Insertion-ordered map of query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, ParamValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// True if `key` is present with a non-null value.
    pub fn is_set(&self, key: &str) -> bool {
        matches!(self.get(key), Some(v) if *v != ParamValue::Null)
    }

    /// Inserts or overwrites `key`. An overwritten key keeps its position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Merges `other` over `self`: keys from `other` win.
    pub fn merge(&mut self, other: &QueryParams) {
        for (k, v) in &other.entries {
            self.set(k.clone(), v.clone());
        }
    }

    /// Drops null and empty-string values.
    pub fn retain_non_blank(&mut self) {
        self.entries.retain(|(_, v)| !v.is_blank());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Serializes as `application/x-www-form-urlencoded` in insertion order.
    pub fn to_query_string(&self) -> String {
        let mut ser = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.entries {
            ser.append_pair(k, &v.to_string());
        }
        ser.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

impl Serialize for QueryParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for QueryParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ParamsVisitor;

        impl<'de> Visitor<'de> for ParamsVisitor {
            type Value = QueryParams;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of scalar query parameters")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut params = QueryParams::new();
                while let Some((k, v)) = access.next_entry::<String, ParamValue>()? {
                    params.set(k, v);
                }
                Ok(params)
            }
        }

        deserializer.deserialize_map(ParamsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_in_place() {
        let mut p = QueryParams::new();
        p.set("w", 100u32);
        p.set("h", 50u32);
        p.set("w", 200u32);
        let keys: Vec<&str> = p.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["w", "h"]);
        assert_eq!(p.get("w"), Some(&ParamValue::Int(200)));
    }

    #[test]
    fn merge_appends_new_keys() {
        let mut p: QueryParams = [("w", 100u32), ("q", 90u32)].into_iter().collect();
        let extra: QueryParams = [("dpr", "2"), ("q", "70")].into_iter().collect();
        p.merge(&extra);
        assert_eq!(p.to_query_string(), "w=100&q=70&dpr=2");
    }

    #[test]
    fn null_is_not_set() {
        let mut p = QueryParams::new();
        p.set("q", ParamValue::Null);
        assert!(!p.is_set("q"));
        p.set("q", "");
        assert!(p.is_set("q"));
    }

    #[test]
    fn retain_non_blank_drops_null_and_empty() {
        let mut p = QueryParams::new();
        p.set("a", ParamValue::Null);
        p.set("b", "");
        p.set("c", 0u32);
        p.set("d", false);
        p.retain_non_blank();
        assert_eq!(p.to_query_string(), "c=0&d=0");
    }

    #[test]
    fn query_string_is_form_encoded() {
        let p: QueryParams = [("text", "a b&c"), ("mark", "ü")].into_iter().collect();
        assert_eq!(p.to_query_string(), "text=a+b%26c&mark=%C3%BC");
    }

    #[test]
    fn parse_loose_values() {
        assert_eq!("null".parse::<ParamValue>().unwrap(), ParamValue::Null);
        assert_eq!("true".parse::<ParamValue>().unwrap(), ParamValue::Bool(true));
        assert_eq!("42".parse::<ParamValue>().unwrap(), ParamValue::Int(42));
        assert_eq!("1.5".parse::<ParamValue>().unwrap(), ParamValue::Float(1.5));
        assert_eq!(
            "inf".parse::<ParamValue>().unwrap(),
            ParamValue::Str("inf".to_string())
        );
        assert_eq!(
            "center".parse::<ParamValue>().unwrap(),
            ParamValue::Str("center".to_string())
        );
    }

    #[test]
    fn key_value_pairs() {
        assert_eq!(
            parse_key_value("dpr=2").unwrap(),
            ("dpr".to_string(), ParamValue::Int(2))
        );
        assert_eq!(
            parse_key_value("overlay=a=b").unwrap(),
            ("overlay".to_string(), ParamValue::Str("a=b".to_string()))
        );
        assert_eq!(
            parse_key_value("q=").unwrap(),
            ("q".to_string(), ParamValue::Str(String::new()))
        );
        assert_eq!(
            parse_key_value("dpr"),
            Err(ParamParseError::MissingEquals("dpr".to_string()))
        );
        assert_eq!(
            parse_key_value("=2"),
            Err(ParamParseError::EmptyKey("=2".to_string()))
        );
    }

    #[test]
    fn float_display() {
        assert_eq!(ParamValue::Float(2.5).to_string(), "2.5");
        assert_eq!(ParamValue::Float(2.0).to_string(), "2");
    }

    #[test]
    fn json_keeps_document_order() {
        let p: QueryParams =
            serde_json::from_str(r#"{"z": 1, "a": "x", "m": null, "b": true}"#).unwrap();
        let keys: Vec<&str> = p.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m", "b"]);
        assert_eq!(p.get("m"), Some(&ParamValue::Null));
        assert_eq!(p.get("b"), Some(&ParamValue::Bool(true)));
    }
}
