use std::str::FromStr;

/// Interpret an optional environment value as an on/off switch. Anything unrecognised falls back to `default`.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let Some(value) = value else {
        return default;
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Parse an optional environment value into `T`. Returns `Err` with the offending text if it is present but invalid,
/// so that callers can log it before substituting their default.
pub fn parse_env_value<T: FromStr>(value: Option<String>, default: T) -> Result<T, String> {
    match value {
        None => Ok(default),
        Some(s) => s.trim().parse::<T>().map_err(|_| s),
    }
}
