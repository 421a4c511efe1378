//! Parameter extraction shared by all platform parsers.
//!
//! Handles the three shapes a parameter value arrives in (scalar, list,
//! numbered key variants) and coerces them to [`Param`].

use serde_json::{Map, Value};

use super::number::parse_number;
use super::{GetOptions, Param, ParamType};
use crate::error::{AssistantError, Result};

/// Extract `key` from a parameter mapping according to `options`.
pub(crate) fn extract(
    parameters: &Map<String, Value>,
    key: &str,
    options: GetOptions,
) -> Result<Option<Param>> {
    if options.globbing {
        let values = glob(parameters, key);
        if values.is_empty() {
            return Ok(None);
        }

        let mut texts = Vec::new();
        for value in values {
            push_texts(key, value, &mut texts)?;
        }
        return list_param(key, texts, options.kind).map(Some);
    }

    match parameters.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value @ Value::Array(_)) => {
            let mut texts = Vec::new();
            push_texts(key, value, &mut texts)?;
            list_param(key, texts, options.kind).map(Some)
        }
        Some(value) => {
            let text = scalar_text(key, value)?;
            match options.kind {
                ParamType::String => Ok(Some(Param::Text(text))),
                // Platforms send "" for optional parameters the user left unfilled.
                ParamType::Number if text.trim().is_empty() => Ok(None),
                ParamType::Number => coerce(key, &text).map(|n| Some(Param::Number(n))),
            }
        }
    }
}

/// Values of `key` and every `key<digits>` variant, unsuffixed first, then by
/// ascending numeric suffix.
fn glob<'a>(parameters: &'a Map<String, Value>, key: &str) -> Vec<&'a Value> {
    let mut matched: Vec<(Option<u64>, &Value)> = parameters
        .iter()
        .filter(|(_, value)| !value.is_null())
        .filter_map(|(name, value)| {
            let suffix = name.strip_prefix(key)?;
            if suffix.is_empty() {
                return Some((None, value));
            }
            if !suffix.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            suffix.parse().ok().map(|index| (Some(index), value))
        })
        .collect();

    matched.sort_by_key(|(index, _)| *index);
    matched.into_iter().map(|(_, value)| value).collect()
}

fn list_param(key: &str, texts: Vec<String>, kind: ParamType) -> Result<Param> {
    match kind {
        ParamType::String => Ok(Param::TextList(texts)),
        ParamType::Number => texts
            .iter()
            .map(|t| coerce(key, t))
            .collect::<Result<Vec<_>>>()
            .map(Param::NumberList),
    }
}

/// Append the text form of `value` to `out`, flattening one level of list.
fn push_texts(key: &str, value: &Value, out: &mut Vec<String>) -> Result<()> {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items.iter().filter(|item| !item.is_null()) {
                out.push(scalar_text(key, item)?);
            }
        }
        other => out.push(scalar_text(key, other)?),
    }
    Ok(())
}

fn scalar_text(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                (f as i64).to_string()
            }
            _ => n.to_string(),
        }),
        other => Err(parse_error(key, &other.to_string())),
    }
}

fn coerce(key: &str, text: &str) -> Result<i64> {
    parse_number(text).ok_or_else(|| parse_error(key, text))
}

fn parse_error(key: &str, value: &str) -> AssistantError {
    AssistantError::Parse {
        key: key.to_string(),
        value: value.to_string(),
    }
}
