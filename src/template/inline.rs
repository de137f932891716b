//! Inline variable substitution with selectable delimiters.
//!
//! Unlike the block engine, inline rendering never fails on data: a name
//! with no value renders as an empty string. Only the choice of delimiter
//! style can be wrong.
//!
//! Substituted values have their double quotes escaped to `&#34;`, and the
//! rendered text then has every `&#34;` replaced by a single space. The net
//! effect is that quotes in values come out as spaces.

use crate::error::{Result, StageTimeError};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Encoded double quote produced when escaping substituted values.
const ENCODED_QUOTE: &str = "&#34;";

static CURLY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.*?)\}\}").expect("Invalid curly delimiter regex"));

static SQUARE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[(.*?)\]\]").expect("Invalid square delimiter regex"));

/// Delimiter styles supported by inline rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DelimiterStyle {
    /// `{{ name }}`
    #[default]
    Curly,
    /// `[[ name ]]`
    Square,
}

impl DelimiterStyle {
    /// All registered styles.
    pub const ALL: [DelimiterStyle; 2] = [DelimiterStyle::Curly, DelimiterStyle::Square];

    /// Look a style up by its registry name.
    ///
    /// # Errors
    ///
    /// `UnknownDelimiterStyle` for anything other than `curly` or `square`.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|style| style.name() == name)
            .ok_or_else(|| StageTimeError::UnknownDelimiterStyle(name.to_string()))
    }

    /// Registry name of the style.
    pub fn name(self) -> &'static str {
        match self {
            DelimiterStyle::Curly => "curly",
            DelimiterStyle::Square => "square",
        }
    }

    /// Opening marker.
    pub fn open(self) -> &'static str {
        match self {
            DelimiterStyle::Curly => "{{",
            DelimiterStyle::Square => "[[",
        }
    }

    /// Closing marker.
    pub fn close(self) -> &'static str {
        match self {
            DelimiterStyle::Curly => "}}",
            DelimiterStyle::Square => "]]",
        }
    }

    /// Pattern matching one placeholder; group 1 is the expression.
    pub fn pattern(self) -> &'static Regex {
        match self {
            DelimiterStyle::Curly => &CURLY_PATTERN,
            DelimiterStyle::Square => &SQUARE_PATTERN,
        }
    }
}

impl fmt::Display for DelimiterStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Render a template, substituting placeholders of the given style.
///
/// The placeholder expression is trimmed and may be written with or without
/// a leading dot (`{{ name }}` and `{{ .name }}` are the same).
///
/// # Examples
///
/// ```ignore
/// let values = HashMap::from([("name".to_string(), "world".to_string())]);
/// let rendered = render_inline("hello [[ name ]]", DelimiterStyle::Square, &values);
/// assert_eq!(rendered, "hello world");
/// ```
pub fn render_inline(
    template: &str,
    style: DelimiterStyle,
    values: &HashMap<String, String>,
) -> String {
    let rendered = style.pattern().replace_all(template, |caps: &regex::Captures<'_>| {
        let expr = caps[1].trim();
        let name = expr.strip_prefix('.').unwrap_or(expr);
        values
            .get(name)
            .map(|value| value.replace('"', ENCODED_QUOTE))
            .unwrap_or_default()
    });

    rendered.replace(ENCODED_QUOTE, " ")
}

/// Render a template with a style given by name.
///
/// # Errors
///
/// `UnknownDelimiterStyle` if the name is not registered.
pub fn render_inline_named(
    template: &str,
    style_name: &str,
    values: &HashMap<String, String>,
) -> Result<String> {
    let style = DelimiterStyle::from_name(style_name)?;
    Ok(render_inline(template, style, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars<const N: usize>(pairs: [(&str, &str); N]) -> HashMap<String, String> {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_curly_substitution() {
        let result = render_inline_named("hello {{name}}", "curly", &vars([("name", "world")]));
        assert_eq!(result.unwrap(), "hello world");
    }

    #[test]
    fn test_square_substitution() {
        let values = vars([("name", "world")]);
        let result = render_inline("hello [[ name ]]", DelimiterStyle::Square, &values);
        assert_eq!(result, "hello world");
    }

    #[test]
    fn test_leading_dot_is_accepted() {
        let result = render_inline("{{ .name }}", DelimiterStyle::Curly, &vars([("name", "x")]));
        assert_eq!(result, "x");
    }

    #[test]
    fn test_other_style_left_untouched() {
        let values = vars([("name", "world")]);
        assert_eq!(
            render_inline("{{name}} [[name]]", DelimiterStyle::Square, &values),
            "{{name}} world"
        );
        assert_eq!(
            render_inline("{{name}} [[name]]", DelimiterStyle::Curly, &values),
            "world [[name]]"
        );
    }

    #[test]
    fn test_missing_key_renders_empty() {
        let result = render_inline("a={{ missing }};", DelimiterStyle::Curly, &HashMap::new());
        assert_eq!(result, "a=;");
    }

    #[test]
    fn test_multiple_placeholders() {
        let values = vars([("a", "1"), ("b", "2")]);
        assert_eq!(
            render_inline("{{a}}-{{b}}-{{a}}", DelimiterStyle::Curly, &values),
            "1-2-1"
        );
    }

    #[test]
    fn test_quotes_in_values_become_spaces() {
        let values = vars([("msg", "say \"hi\"")]);
        assert_eq!(
            render_inline("msg: {{ msg }}", DelimiterStyle::Curly, &values),
            "msg: say  hi "
        );
    }

    #[test]
    fn test_encoded_quote_in_template_is_normalized() {
        let result = render_inline("a&#34;b", DelimiterStyle::Curly, &HashMap::new());
        assert_eq!(result, "a b");
    }

    #[test]
    fn test_unknown_style_is_error() {
        let err = render_inline_named("x", "diamond", &HashMap::new()).unwrap_err();
        assert_eq!(err, StageTimeError::UnknownDelimiterStyle("diamond".to_string()));
    }

    #[test]
    fn test_style_registry() {
        assert_eq!(DelimiterStyle::from_name("curly").unwrap(), DelimiterStyle::Curly);
        assert_eq!(DelimiterStyle::from_name("square").unwrap(), DelimiterStyle::Square);
        assert!(DelimiterStyle::from_name("Curly").is_err());
        assert_eq!(DelimiterStyle::Square.open(), "[[");
        assert_eq!(DelimiterStyle::Square.close(), "]]");
        assert_eq!(DelimiterStyle::Curly.to_string(), "curly");
    }
}
