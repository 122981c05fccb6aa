// Core data types for rfiscan

use std::fmt;

use serde::Serialize;

/// HTTP methods the probe can issue inclusion requests with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Parse a method name as given on the command line
    pub fn parse(s: &str) -> Option<Method> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            _ => None,
        }
    }

    pub fn as_reqwest(&self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

impl Default for Method {
    fn default() -> Self {
        Method::Get
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// Transformation applied to the script reference before it is placed in
/// the query string, to slip past naive server-side filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Evasion {
    /// Pass the script reference through unchanged
    None,
    /// Append a NUL so PHP path truncation drops anything the application
    /// appends after the parameter (e.g. a forced ".php" suffix)
    NullByte,
    /// Percent-encode the reference an extra time to defeat filters that
    /// decode once before blacklist-checking
    DoubleEncode,
}

impl Evasion {
    /// Canonical trial order for a scan
    pub const ALL: [Evasion; 3] = [Evasion::None, Evasion::NullByte, Evasion::DoubleEncode];

    /// Parse an evasion name as given on the command line
    pub fn parse(s: &str) -> Option<Evasion> {
        match s {
            "none" => Some(Evasion::None),
            "null-byte" => Some(Evasion::NullByte),
            "double-encode" => Some(Evasion::DoubleEncode),
            _ => None,
        }
    }
}

impl fmt::Display for Evasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evasion::None => write!(f, "none"),
            Evasion::NullByte => write!(f, "null-byte"),
            Evasion::DoubleEncode => write!(f, "double-encode"),
        }
    }
}

/// A confirmed (parameter, evasion) combination. The finding carries the
/// exact inclusion URL that triggered detection, so it is the evidence.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub url: String,
    pub param: String,
    pub evasion: Evasion,
    pub inclusion_url: String,
}
