//! Environment variable parsing
//!
//! Values are classified in a fixed order: boolean words, URLs, paths, IP
//! addresses, integers, and finally plain strings.

use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;

const TRUE_WORDS: &[&str] = &["1", "true", "yes", "on"];
const FALSE_WORDS: &[&str] = &["0", "false", "no", "off"];

/// A typed view of a string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvValue {
    Bool(bool),
    Url(String),
    Path(PathBuf),
    Ip(IpAddr),
    Int(u64),
    Str(String),
}

impl EnvValue {
    pub fn kind(&self) -> &'static str {
        match self {
            EnvValue::Bool(_) => "bool",
            EnvValue::Url(_) => "url",
            EnvValue::Path(_) => "path",
            EnvValue::Ip(_) => "ip",
            EnvValue::Int(_) => "int",
            EnvValue::Str(_) => "str",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            EnvValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvValue::Bool(b) => write!(f, "{b}"),
            EnvValue::Url(url) => f.write_str(url),
            EnvValue::Path(path) => write!(f, "{}", path.display()),
            EnvValue::Ip(ip) => write!(f, "{ip}"),
            EnvValue::Int(n) => write!(f, "{n}"),
            EnvValue::Str(s) => f.write_str(s),
        }
    }
}

/// Classify `data`.
///
/// - `1 true yes on` / `0 false no off` (any case) are booleans,
/// - anything containing `://` or `@` is a URL,
/// - `.` or values starting with `/`, `~` or `./` without a `:` are paths,
/// - then IPv4/IPv6 addresses, then all-digit integers.
pub fn parse_str(data: &str) -> EnvValue {
    let lower = data.to_lowercase();
    if TRUE_WORDS.contains(&lower.as_str()) {
        return EnvValue::Bool(true);
    }
    if FALSE_WORDS.contains(&lower.as_str()) {
        return EnvValue::Bool(false);
    }
    if data.contains("://") || data.contains('@') {
        return EnvValue::Url(data.to_string());
    }
    let path_like = data.starts_with('/') || data.starts_with('~') || data.starts_with("./");
    if (path_like && !data.contains(':')) || data == "." {
        return EnvValue::Path(PathBuf::from(data));
    }
    if let Ok(ip) = data.parse::<IpAddr>() {
        return EnvValue::Ip(ip);
    }
    if !data.is_empty() && data.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(n) = data.parse::<u64>() {
            return EnvValue::Int(n);
        }
    }
    EnvValue::Str(data.to_string())
}

/// Parse the environment variable `name`; `None` when unset or empty.
pub fn parse_env(name: &str) -> Option<EnvValue> {
    let value = std::env::var(name).ok().filter(|v| !v.is_empty())?;
    Some(parse_str(&value))
}

/// Boolean view of `name`; `None` when unset, empty or not a boolean word.
pub fn parse_bool(name: &str) -> Option<bool> {
    let parsed = parse_env(name)?;
    if parsed.as_bool().is_none() {
        tracing::warn!("Ignoring non-boolean value for {}: {}", name, parsed);
    }
    parsed.as_bool()
}
