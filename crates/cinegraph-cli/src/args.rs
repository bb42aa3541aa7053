//! `key=value` property arguments.
//!
//! Values are typed by shape: `true`/`false`, integers, decimals,
//! `YYYY-MM-DD` dates, `null`, `[a,b,c]` lists, and anything else as a
//! string. Wrap a value in double quotes to force a string.

use chrono::NaiveDate;
use cinegraph_core::{Properties, PropertyValue};

use crate::error::{CliError, Result};

/// Parse one `key=value` argument.
pub fn parse_property(arg: &str) -> Result<(String, PropertyValue)> {
    let (key, raw) = arg
        .split_once('=')
        .ok_or_else(|| CliError::InvalidProperty(arg.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::InvalidProperty(arg.to_string()));
    }
    Ok((key.to_string(), parse_value(raw.trim())?))
}

/// Parse every argument into a property map, preserving argument order.
pub fn parse_properties<S: AsRef<str>>(args: &[S]) -> Result<Properties> {
    let mut props = Properties::new();
    for arg in args {
        let (k, v) = parse_property(arg.as_ref())?;
        props.insert(k, v);
    }
    Ok(props)
}

fn parse_value(raw: &str) -> Result<PropertyValue> {
    if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        if inner.trim().is_empty() {
            return Ok(PropertyValue::List(Vec::new()));
        }
        let items = inner
            .split(',')
            .map(|item| {
                let item = item.trim();
                if item.starts_with('[') {
                    return Err(CliError::NestedList(raw.to_string()));
                }
                Ok(parse_scalar(item))
            })
            .collect::<Result<Vec<_>>>()?;
        return Ok(PropertyValue::List(items));
    }
    Ok(parse_scalar(raw))
}

fn parse_scalar(raw: &str) -> PropertyValue {
    if let Some(quoted) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        return PropertyValue::String(quoted.to_string());
    }
    match raw {
        "null" => return PropertyValue::Null,
        "true" => return PropertyValue::Boolean(true),
        "false" => return PropertyValue::Boolean(false),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return PropertyValue::Integer(i);
    }
    if raw.contains('.') {
        if let Ok(f) = raw.parse::<f64>() {
            return PropertyValue::Float(f);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return PropertyValue::Date(d);
    }
    PropertyValue::String(raw.to_string())
}
