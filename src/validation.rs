//! Required-field validation.
//!
//! A field spec is either a plain key (`"name"`) or an alternative group
//! (`"email|phone"`) that is satisfied when any member is. Which values count
//! as "present" depends on [`ValidationMode`].
//!
//! Validation only reads the document and spec list; it never mutates them
//! and does no I/O.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::{Document, Value};
use crate::types::{Error, Result, ValidationConfig};

/// Plain-key presence policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Key presence is enough; `null` and `""` count as present.
    PresenceOnly,
    /// Key must be present and non-null; `""` counts only when
    /// `empty_string_valid` is set.
    #[default]
    NullAndEmptyAware,
}

/// One required-field specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    Key(String),
    /// `k1|k2|...`, kept with its original text for reporting.
    AnyOf { text: String, keys: Vec<String> },
}

impl FieldSpec {
    pub fn parse(text: &str) -> Self {
        if text.contains('|') {
            FieldSpec::AnyOf {
                text: text.to_string(),
                keys: text.split('|').map(str::to_string).collect(),
            }
        } else {
            FieldSpec::Key(text.to_string())
        }
    }

    /// The spec as originally written.
    pub fn text(&self) -> &str {
        match self {
            FieldSpec::Key(key) => key,
            FieldSpec::AnyOf { text, .. } => text,
        }
    }
}

impl FromStr for FieldSpec {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for FieldSpec {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Parse a list of textual specs.
pub fn parse_specs<S: AsRef<str>>(specs: &[S]) -> Vec<FieldSpec> {
    specs.iter().map(|s| FieldSpec::parse(s.as_ref())).collect()
}

/// Specs that failed to resolve, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingFieldReport {
    missing: Vec<String>,
}

impl MissingFieldReport {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    /// `Ok(())` when nothing is missing, otherwise one combined
    /// [`Error::Validation`].
    pub fn into_result(self) -> Result<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(Error::validation(self.missing))
        }
    }
}

/// Required-field validator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Validator {
    mode: ValidationMode,
    empty_string_valid: bool,
}

impl Validator {
    pub fn new(mode: ValidationMode, empty_string_valid: bool) -> Self {
        Self {
            mode,
            empty_string_valid,
        }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new(config.mode, config.empty_string_valid)
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Collect every spec the document fails.
    pub fn validate(&self, document: &Document, specs: &[FieldSpec]) -> MissingFieldReport {
        let missing = specs
            .iter()
            .filter(|spec| !self.spec_satisfied(document, spec))
            .map(|spec| spec.text().to_string())
            .collect();
        MissingFieldReport { missing }
    }

    /// Like [`Validator::validate`], failing with one combined error.
    pub fn check(&self, document: &Document, specs: &[FieldSpec]) -> Result<()> {
        self.validate(document, specs).into_result()
    }

    fn spec_satisfied(&self, document: &Document, spec: &FieldSpec) -> bool {
        match spec {
            FieldSpec::Key(key) => self.key_satisfied(document, key),
            FieldSpec::AnyOf { keys, .. } => keys.iter().any(|k| self.key_satisfied(document, k)),
        }
    }

    fn key_satisfied(&self, document: &Document, key: &str) -> bool {
        let Some(value) = document.get(key) else {
            return false;
        };
        match self.mode {
            ValidationMode::PresenceOnly => true,
            ValidationMode::NullAndEmptyAware => match value {
                Value::Null => false,
                Value::Text(s) if s.is_empty() => self.empty_string_valid,
                _ => true,
            },
        }
    }
}

/// Check required params with the null/empty-aware policy.
///
/// `specs` use the textual form, e.g. `&["name", "email|phone"]`.
pub fn check_required_params(
    document: &Document,
    specs: &[&str],
    empty_string_valid: bool,
) -> Result<()> {
    Validator::new(ValidationMode::NullAndEmptyAware, empty_string_valid)
        .check(document, &parse_specs(specs))
}
