use toml::Value;

/// Collect settings overrides from environment variables matching `{PREFIX}__*`.
///
/// The remainder after `PREFIX__` is the setting name, kept verbatim, so
/// `MYAPP__TEMPLATE_DIRS` targets `TEMPLATE_DIRS` and single underscores stay
/// part of the name. Values are parsed heuristically: bool > integer > float
/// > string. Pairs come back sorted by key so application order is
/// deterministic.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn env_overlay(
    prefix: &str,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Vec<(String, Value)> {
    let needle = format!("{prefix}__");
    let mut pairs = Vec::new();

    for (key, value) in vars {
        let Some(rest) = key.strip_prefix(&needle) else {
            continue;
        };
        if rest.is_empty() {
            continue;
        }
        pairs.push((rest.to_string(), parse_env_value(&value)));
    }

    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
}

/// Parse an env var value into a typed TOML value.
/// Tries: bool → integer → float → string.
fn parse_env_value(s: &str) -> Value {
    if s.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        // Only use float if the string actually contains a dot,
        // to avoid "NaN" / "inf" being parsed as float.
        if s.contains('.') {
            return Value::Float(f);
        }
    }
    Value::String(s.to_string())
}
