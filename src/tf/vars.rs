//! Module input variables
//!
//! A variable value is a string, a boolean, or an ordered list of strings.
//! Values render to `-var name=value` command-line arguments; lists use the
//! `["a","b"]` literal form terraform accepts on the command line.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// A single module input variable value
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    /// Boolean switch (e.g. `use_aurora`)
    Bool(bool),
    /// Plain string value
    String(String),
    /// Ordered list of strings (e.g. subnet IDs)
    List(Vec<String>),
}

impl VarValue {
    /// Render the value as it appears after `name=` in a `-var` argument
    pub fn render(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
            Self::List(items) => {
                let quoted: Vec<String> =
                    items.iter().map(|s| format!("\"{}\"", s)).collect();
                format!("[{}]", quoted.join(","))
            }
        }
    }

    /// Parse a CLI-supplied value
    ///
    /// `true`/`false` become booleans, a `[...]` literal becomes a list
    /// (parsed as JSON), anything else is a plain string.
    pub fn parse_cli(raw: &str) -> crate::common::Result<Self> {
        match raw {
            "true" => return Ok(Self::Bool(true)),
            "false" => return Ok(Self::Bool(false)),
            _ => {}
        }
        if raw.starts_with('[') {
            let items: Vec<String> = serde_json::from_str(raw)?;
            return Ok(Self::List(items));
        }
        Ok(Self::String(raw.to_string()))
    }
}

impl From<&str> for VarValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<bool> for VarValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<&str>> for VarValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(String::from).collect())
    }
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Name -> value mapping for one module invocation
///
/// BTreeMap keeps argument order deterministic across runs, so repeating
/// the same configuration produces an identical command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct VarMap(pub BTreeMap<String, VarValue>);

impl VarMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<VarValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&VarValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as `-var name=value` argument pairs
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.0.len() * 2);
        for (name, value) in &self.0 {
            args.push("-var".to_string());
            args.push(format!("{}={}", name, value.render()));
        }
        args
    }
}
