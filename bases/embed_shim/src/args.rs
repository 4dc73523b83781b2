// bases/embed_shim/src/args.rs
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Control tokens the orchestrator acts on. They select behavior, so they
/// are not collected as query terms.
const COMMAND_TOKENS: [&str; 1] = ["download"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgError {
    #[error("invalid value for --{key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("missing value for --{key}")]
    MissingValue { key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Text(String),
    Switch,
}

/// Flat token list split into long flags and positional query terms.
#[derive(Debug, Default)]
pub struct ParsedArgs {
    flags: HashMap<String, ArgValue>,
    query: Vec<String>,
}

impl ParsedArgs {
    /// Scan a token list.
    ///
    /// A `--key` token consumes the following token as its value unless that
    /// token also starts with `--`, in which case the flag records a bare
    /// switch. Tokens without a leading dash accumulate as query terms in
    /// input order. Single-dash tokens are skipped entirely: they are
    /// neither flags nor query terms.
    pub fn parse(tokens: &[String]) -> Self {
        let mut flags = HashMap::new();
        let mut query = Vec::new();

        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            if let Some(key) = token.strip_prefix("--") {
                match tokens.get(i + 1) {
                    Some(next) if !next.starts_with("--") => {
                        flags.insert(key.to_string(), ArgValue::Text(next.clone()));
                        i += 1;
                    }
                    _ => {
                        flags.insert(key.to_string(), ArgValue::Switch);
                    }
                }
            } else if !token.starts_with('-') && !COMMAND_TOKENS.contains(&token.as_str()) {
                query.push(token.clone());
            }
            i += 1;
        }

        Self { flags, query }
    }

    pub fn query(&self) -> &[String] {
        &self.query
    }

    /// String value for a key, when one was given.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.flags.get(key) {
            Some(ArgValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn text_or(&self, key: &str, default: &str) -> String {
        self.text(key).unwrap_or(default).to_string()
    }

    /// True when the key appeared at all, with or without a value.
    pub fn switch(&self, key: &str) -> bool {
        self.flags.contains_key(key)
    }

    /// Numeric value for a key, falling back to `default` when the key is
    /// absent. A bare switch or an unparsable value is a reportable error.
    pub fn number<T: FromStr>(&self, key: &str, default: T) -> Result<T, ArgError> {
        match self.flags.get(key) {
            None => Ok(default),
            Some(ArgValue::Switch) => Err(ArgError::MissingValue {
                key: key.to_string(),
            }),
            Some(ArgValue::Text(value)) => value.parse().map_err(|_| ArgError::InvalidValue {
                key: key.to_string(),
                value: value.clone(),
            }),
        }
    }
}
