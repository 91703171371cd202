//! Configuration file parsing.
//!
//! A `.textquery.toml` holds a single `[syntax]` table. Every entry is optional and
//! overrides the corresponding default; the merged syntax is validated before it is
//! handed out.

use std::{fs, path::Path};

use serde::Deserialize;
use textquery::Syntax;

use crate::ConfigError;

/// Configuration as parsed directly from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Query syntax, merged over the default.
    pub syntax: Syntax,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string and validates its syntax.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    let config: RawConfig = toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;

    config
        .syntax
        .validate()
        .map_err(|source| ConfigError::InvalidSyntax {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use textquery::{Keywords, SyntaxError};

    use super::*;

    fn parse(toml: &str) -> Result<RawConfig, ConfigError> {
        parse_config_str(toml, Path::new("test.toml"))
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse("").unwrap();
        assert_eq!(config.syntax, Syntax::default());
    }

    #[test]
    fn test_parse_full_syntax() {
        let toml = r#"
[syntax]
group = { open = "<", close = ">" }
field_operator = { open = "[", close = "]" }
modifier = { open = "{", close = "}" }
field_delimiter = "="
quote = "'"

[syntax.keywords]
and = "&&"
or = "||"
not = "!"
"#;
        let config = parse(toml).unwrap();
        let expected = Syntax::default()
            .with_group('<', '>')
            .with_field_delimiter('=')
            .with_quote('\'')
            .with_keywords("&&", "||", "!");
        assert_eq!(config.syntax, expected);
    }

    #[test]
    fn test_partial_syntax_keeps_defaults() {
        let toml = r#"
[syntax]
quote = "'"

[syntax.keywords]
not = "-"
"#;
        let config = parse(toml).unwrap();
        assert_eq!(config.syntax.quote, '\'');
        assert_eq!(config.syntax.group, Syntax::default().group);
        assert_eq!(
            config.syntax.keywords,
            Keywords {
                not: "-".into(),
                ..Keywords::default()
            }
        );
    }

    #[test]
    fn test_invalid_toml() {
        let err = parse("[syntax\nquote = 1").unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains("test.toml"));
    }

    #[test]
    fn test_multi_character_delimiter_rejected() {
        let err = parse("[syntax]\nfield_delimiter = \"::\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn test_invalid_syntax() {
        let err = parse("[syntax]\nquote = \"(\"\n").unwrap_err();
        match err {
            ConfigError::InvalidSyntax { path, source } => {
                assert_eq!(path, Path::new("test.toml"));
                assert_eq!(source, SyntaxError::DuplicateCharacter { character: '(' });
            }
            other => panic!("expected InvalidSyntax, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_file_missing() {
        let err = parse_config_file(Path::new("/nonexistent/.textquery.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
