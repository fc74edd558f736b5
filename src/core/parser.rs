// src/core/parser.rs

use std::collections::{HashMap, HashSet};
use std::env;

use crate::core::{
    error::ParseError,
    flag::{FlagKind, FlagSchema, FlagValue},
};

/// A source of environment-variable defaults. Production parsing reads the
/// process environment; tests inject a closed map.
pub type EnvLookup<'e> = dyn Fn(&str) -> Option<String> + 'e;

/// The outcome of binding one line's trailing tokens against a node's flags.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    /// One entry per declared flag; every flag is always bound, from the
    /// strongest available source.
    pub values: HashMap<String, FlagValue>,
    /// Non-flag tokens, in input order. Interpretation is up to the action.
    pub positionals: Vec<String>,
}

/// A flag parser reconstructed from a node's schemas for a single dispatch.
///
/// Parsers are deliberately never cached between invocations: defaults may
/// come from the environment, which must be re-read at the moment of each
/// dispatch, and the same node may be reached along different paths.
pub struct FlagParser<'a> {
    schemas: &'a [FlagSchema],
}

impl<'a> FlagParser<'a> {
    pub fn build(schemas: &'a [FlagSchema]) -> Self {
        Self { schemas }
    }

    /// Parses against the process environment.
    pub fn parse(&self, tokens: &[String]) -> Result<ParsedLine, ParseError> {
        self.parse_with_env(tokens, &|name| env::var(name).ok())
    }

    /// Parses `tokens`, resolving each flag from the strongest source:
    /// explicit token, then the first set environment variable among the
    /// schema's `env_vars`, then the static default.
    ///
    /// Accepted token forms: `--name value`, `--name=value`, and the
    /// single-dash spellings of both. Boolean flags never consume a
    /// following token; use `--name=false` to unset one explicitly.
    pub fn parse_with_env(
        &self,
        tokens: &[String],
        env: &EnvLookup<'_>,
    ) -> Result<ParsedLine, ParseError> {
        let mut values = HashMap::new();
        for schema in self.schemas {
            values.insert(schema.name.clone(), seed(schema, env)?);
        }

        let mut positionals = Vec::new();
        // List flags replace their seeded default on first explicit
        // occurrence, then accumulate.
        let mut explicit_lists: HashSet<&str> = HashSet::new();

        let mut iter = tokens.iter().map(String::as_str).peekable();
        while let Some(token) = iter.next() {
            let body = token
                .strip_prefix("--")
                .or_else(|| token.strip_prefix('-'))
                .filter(|rest| !rest.is_empty());

            let Some(body) = body else {
                positionals.push(token.to_string());
                continue;
            };

            let (name, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (body, None),
            };

            let schema = self
                .schemas
                .iter()
                .find(|s| s.name == name)
                .ok_or_else(|| ParseError::UnknownFlag(name.to_string()))?;

            match &schema.kind {
                FlagKind::Bool { .. } => {
                    let value = match inline {
                        Some(raw) => parse_bool(name, raw)?,
                        None => true,
                    };
                    values.insert(schema.name.clone(), FlagValue::Bool(value));
                }
                FlagKind::Str { .. } => {
                    let raw = take_value(name, inline, &mut iter)?;
                    values.insert(schema.name.clone(), FlagValue::Str(raw));
                }
                FlagKind::Uint { .. } => {
                    let raw = take_value(name, inline, &mut iter)?;
                    values.insert(schema.name.clone(), parse_uint(name, &raw)?);
                }
                FlagKind::List { .. } => {
                    let raw = take_value(name, inline, &mut iter)?;
                    let entry = values
                        .entry(schema.name.clone())
                        .or_insert_with(|| FlagValue::List(Vec::new()));
                    if let FlagValue::List(items) = entry {
                        if explicit_lists.insert(schema.name.as_str()) {
                            items.clear();
                        }
                        items.push(raw);
                    }
                }
            }
        }

        Ok(ParsedLine {
            values,
            positionals,
        })
    }
}

/// Takes a flag's value: the inline `=value` part if present, otherwise the
/// next token, provided it does not itself look like a flag.
fn take_value<'t, I>(
    flag: &str,
    inline: Option<&str>,
    iter: &mut std::iter::Peekable<I>,
) -> Result<String, ParseError>
where
    I: Iterator<Item = &'t str>,
{
    if let Some(raw) = inline {
        return Ok(raw.to_string());
    }
    match iter.peek() {
        Some(next) if !next.starts_with('-') => {
            let raw = (*next).to_string();
            iter.next();
            Ok(raw)
        }
        _ => Err(ParseError::MissingValue {
            flag: flag.to_string(),
        }),
    }
}

/// Resolves a flag's default: first set environment variable, then the
/// static default.
fn seed(schema: &FlagSchema, env: &EnvLookup<'_>) -> Result<FlagValue, ParseError> {
    for var in &schema.env_vars {
        if let Some(raw) = env(var) {
            return match &schema.kind {
                FlagKind::Str { .. } => Ok(FlagValue::Str(raw)),
                FlagKind::Bool { .. } => Ok(FlagValue::Bool(parse_bool(&schema.name, &raw)?)),
                FlagKind::Uint { .. } => parse_uint(&schema.name, &raw),
                // Environment values for list flags are comma-separated.
                FlagKind::List { .. } => Ok(FlagValue::List(
                    raw.split(',')
                        .filter(|part| !part.is_empty())
                        .map(str::to_string)
                        .collect(),
                )),
            };
        }
    }
    Ok(schema.static_default())
}

fn parse_bool(flag: &str, raw: &str) -> Result<bool, ParseError> {
    match raw {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ParseError::InvalidValue {
            flag: flag.to_string(),
            value: raw.to_string(),
            expected: "boolean",
        }),
    }
}

fn parse_uint(flag: &str, raw: &str) -> Result<FlagValue, ParseError> {
    raw.parse::<u64>()
        .map(FlagValue::Uint)
        .map_err(|_| ParseError::InvalidValue {
            flag: flag.to_string(),
            value: raw.to_string(),
            expected: "unsigned integer",
        })
}

/// Fetches a required positional argument by index, for use by actions.
pub fn required_arg<'s>(args: &'s [String], index: usize, name: &str) -> Result<&'s str, ParseError> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| ParseError::MissingArgument(name.to_string()))
}
