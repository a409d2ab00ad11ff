//! Output parser configuration.

use serde::{Deserialize, Serialize};

/// How the backend splits raw model output into named parsed outputs.
///
/// # Examples
///
/// ```
/// use palimpsest_core::ParsingType;
/// use std::str::FromStr;
///
/// assert_eq!(ParsingType::from_str("square_bracket").unwrap(), ParsingType::SquareBracket);
/// assert_eq!(ParsingType::Html.to_string(), "html");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ParsingType {
    /// `key: value` lines
    Colon,
    /// `[key] value [/key]` blocks
    SquareBracket,
    /// `[[key]] value [[/key]]` blocks
    DoubleSquareBracket,
    /// `<key>value</key>` tags
    Html,
}
