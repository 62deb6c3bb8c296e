use crate::catalog::{ParameterSpec, ParameterType, CATALOG};
use crate::strategy;
use crate::value::Value;
use crate::{Error, Result};
use log::*;
use std::collections::BTreeMap;

/// The single source of truth for every tunable of the pipeline.
///
/// A store is built once from a static catalog. `defaults` never change after
/// that; `current` starts as a copy of them and is only written through
/// [`ParameterStore::set`], which enforces the declared type of each key.
///
/// The store holds no lock. Share it by reference and serialize writers externally.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    specs: BTreeMap<&'static str, &'static ParameterSpec>,
    defaults: BTreeMap<&'static str, Value>,
    current: BTreeMap<&'static str, Value>,
}

impl ParameterStore {
    pub fn new(catalog: &'static [ParameterSpec]) -> Self {
        let specs: BTreeMap<_, _> = catalog.iter().map(|spec| (spec.key, spec)).collect();
        let defaults: BTreeMap<_, _> = catalog
            .iter()
            .map(|spec| (spec.key, Value::from(spec.default)))
            .collect();
        Self {
            specs,
            current: defaults.clone(),
            defaults,
        }
    }

    fn spec(&self, key: &str) -> Result<&'static ParameterSpec> {
        self.specs
            .get(key)
            .copied()
            .ok_or_else(|| Error::UnknownKey(key.to_owned()))
    }

    pub fn get(&self, key: &str) -> Result<&Value> {
        self.current
            .get(key)
            .ok_or_else(|| Error::UnknownKey(key.to_owned()))
    }

    pub fn default_value(&self, key: &str) -> Result<&Value> {
        self.defaults
            .get(key)
            .ok_or_else(|| Error::UnknownKey(key.to_owned()))
    }

    pub fn parameter_type(&self, key: &str) -> Result<ParameterType> {
        Ok(self.spec(key)?.default.parameter_type())
    }

    pub fn description(&self, key: &str) -> Result<&'static str> {
        Ok(self.spec(key)?.description)
    }

    /// Overwrites the current value of `key`.
    ///
    /// The value must have the declared type of the key. String lists also accept
    /// plain strings, and when they list a different number of alternatives than
    /// the default, only their leading index character is kept on top of the
    /// default list. A list of the same length is kept as given, even when its
    /// names disagree with the default's.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let expected = self.parameter_type(key)?;
        let (&key, default) = self
            .defaults
            .get_key_value(key)
            .ok_or_else(|| Error::UnknownKey(key.to_owned()))?;
        let value = match (expected, value.into()) {
            (ParameterType::StringList, Value::String(text) | Value::StringList(text)) => {
                if !text.contains(':') {
                    return Err(Error::InvalidValue {
                        key: key.to_owned(),
                        expected,
                        text,
                    });
                }
                let default = default.as_str().unwrap_or_default();
                Value::StringList(merge_alternatives(key, default, text))
            }
            (expected, value) if value.parameter_type() == expected => value,
            (expected, value) => {
                return Err(Error::TypeMismatch {
                    key: key.to_owned(),
                    expected,
                    found: value.parameter_type(),
                })
            }
        };
        trace!("{} = {:?}", key, value);
        self.current.insert(key, value);
        Ok(())
    }

    /// Parses `text` according to the declared type of `key` and sets it.
    pub fn set_text(&mut self, key: &str, text: &str) -> Result<()> {
        let expected = self.parameter_type(key)?;
        let value = Value::parse(expected, text).ok_or_else(|| Error::InvalidValue {
            key: key.to_owned(),
            expected,
            text: text.to_owned(),
        })?;
        self.set(key, value)
    }

    /// Restores every current value to its default.
    pub fn reset(&mut self) {
        self.current = self.defaults.clone();
    }

    /// Iterates over the current values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.current.iter().map(|(&key, value)| (key, value))
    }

    pub fn int(&self, key: &str) -> Result<i32> {
        match self.get(key)? {
            Value::Int(value) => Ok(*value),
            other => Err(mismatch(key, ParameterType::Int, other)),
        }
    }

    pub fn float(&self, key: &str) -> Result<f64> {
        match self.get(key)? {
            Value::Float(value) => Ok(*value),
            other => Err(mismatch(key, ParameterType::Float, other)),
        }
    }

    pub fn boolean(&self, key: &str) -> Result<bool> {
        match self.get(key)? {
            Value::Bool(value) => Ok(*value),
            other => Err(mismatch(key, ParameterType::Bool, other)),
        }
    }

    /// The text of a string or string-list parameter.
    pub fn text(&self, key: &str) -> Result<&str> {
        let value = self.get(key)?;
        value
            .as_str()
            .ok_or_else(|| mismatch(key, ParameterType::String, value))
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(CATALOG)
    }
}

fn mismatch(key: &str, expected: ParameterType, found: &Value) -> Error {
    Error::TypeMismatch {
        key: key.to_owned(),
        expected,
        found: found.parameter_type(),
    }
}

/// Keeps the user's choice by position when alternatives were added to or
/// removed from the catalog.
///
/// Assumes the index fits in one character, which holds for every catalog list.
fn merge_alternatives(key: &str, default: &str, text: String) -> String {
    let count = |list: &str| strategy::alternatives(list).map(|names| names.len());
    if count(&text) == count(default) {
        return text;
    }
    let mut merged = String::with_capacity(default.len());
    merged.extend(text.chars().take(1));
    merged.extend(default.chars().skip(1));
    warn!("Updated list of parameter \"{}\"", key);
    merged
}
