use mlua::{Table, Value};

use crate::foundation::core::Rgba8;
use crate::foundation::math::clamp_channel;

/// Parse a `{ r = .., g = .., b = .., a = .. }` table.
///
/// `r`, `g` and `b` are required, `a` defaults to 255. Values are rounded and clamped into
/// 0..=255. The error string names the offending channel.
pub(crate) fn color_from_table(table: &Table) -> Result<Rgba8, String> {
    Ok(Rgba8 {
        r: channel(table, "r", None)?,
        g: channel(table, "g", None)?,
        b: channel(table, "b", None)?,
        a: channel(table, "a", Some(255))?,
    })
}

fn channel(table: &Table, key: &str, default: Option<u8>) -> Result<u8, String> {
    let value: Value = table
        .get(key)
        .map_err(|e| format!("failed to read channel `{key}`: {e}"))?;
    match value {
        Value::Nil => default.ok_or_else(|| format!("missing channel `{key}`")),
        Value::Integer(i) => Ok(clamp_channel(i as f64)),
        Value::Number(n) => Ok(clamp_channel(n)),
        other => Err(format!(
            "channel `{key}` must be a number, got {}",
            other.type_name()
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/color.rs"]
mod tests;
