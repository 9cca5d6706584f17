//! Argument template compilation.
//!
//! Each `{key}` present in the mapping is substituted once, at its first
//! occurrence. Later identical placeholders and placeholders with no
//! mapping entry are left as written.

use crate::{descriptor::Secret, mapping::SubstitutionMapping};
use serde_json::{json, Value};
use std::path::PathBuf;

/// Separator that switches argument splitting from whitespace to verbatim segments.
pub const ARG_DELIMITER: char = '*';

/// Fills `{key}` placeholders in `template` from `mapping`.
pub fn expand(template: &str, mapping: &SubstitutionMapping) -> String {
    let mut out = template.to_string();
    for (key, value) in mapping.iter() {
        out = out.replacen(&format!("{{{key}}}"), value, 1);
    }
    out
}

/// Splits a compiled argument string into an argument vector.
///
/// With a `*` present, every `*`-separated segment is one argument kept
/// verbatim, spaces included. Otherwise the string is split on whitespace,
/// which breaks apart any value containing spaces.
pub fn split_args(compiled: &str) -> Vec<String> {
    let compiled = compiled.trim();
    if compiled.contains(ARG_DELIMITER) {
        compiled.split(ARG_DELIMITER).map(str::to_string).collect()
    } else {
        compiled.split_whitespace().map(str::to_string).collect()
    }
}

/// A ready-to-spawn process: program, arguments and child-only environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: Vec<(String, Secret)>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self { program: program.into(), args, env: Vec::new() }
    }

    /// Expands `template` and splits it into arguments for `program`.
    pub fn compile(
        program: impl Into<PathBuf>,
        template: &str,
        mapping: &SubstitutionMapping,
    ) -> Self {
        Self::new(program, split_args(&expand(template, mapping)))
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), Secret::new(value)));
        self
    }

    /// JSON view with secret values masked and env values hidden.
    pub fn redacted(&self, mapping: &SubstitutionMapping) -> Value {
        let args: Vec<String> = self.args.iter().map(|a| mapping.redact(a)).collect();
        let env: Vec<&str> = self.env.iter().map(|(k, _)| k.as_str()).collect();
        json!({
            "program": self.program.display().to_string(),
            "args": args,
            "env": env,
        })
    }
}
