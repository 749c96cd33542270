//! Validated environment selectors.
//!
//! [`EnvTarget`] can only be built through [`EnvTarget::parse`], so holding
//! one proves the input passed the injection gate. Every caller that forwards
//! an environment name to a subprocess takes an `EnvTarget`, never a `&str`.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::ValidationError;

/// An environment selected either by name or by absolute prefix path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnvTarget {
    /// Bare name matching `[A-Za-z0-9_.-]+`.
    Name(String),
    /// Absolute, existing path without parent-traversal components.
    Prefix(PathBuf),
}

impl EnvTarget {
    /// Validate raw input.
    ///
    /// Rules, in order:
    /// 1. empty input is rejected;
    /// 2. absolute paths are rejected if they contain `..` or do not exist;
    /// 3. anything else must consist of ASCII alphanumerics, `_`, `-` or `.`,
    ///    must not be `.`/`..` and must not start with `-`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.is_empty() {
            return Err(ValidationError::Empty);
        }

        if is_absolute_input(input) {
            return Self::parse_prefix(input);
        }

        if !input.chars().all(is_name_char) {
            return Err(ValidationError::InvalidCharacters(input.to_string()));
        }

        if input == "." || input == ".." || input.starts_with('-') {
            return Err(ValidationError::ReservedName(input.to_string()));
        }

        Ok(Self::Name(input.to_string()))
    }

    fn parse_prefix(input: &str) -> Result<Self, ValidationError> {
        let path = Path::new(input);

        if path
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(ValidationError::Traversal(input.to_string()));
        }

        // Lexical normalization: drops `.` components and repeated separators.
        let normalized: PathBuf = path.components().collect();

        if !normalized.exists() {
            return Err(ValidationError::PathNotFound(input.to_string()));
        }

        Ok(Self::Prefix(normalized))
    }

    /// Whether this target selects by prefix path.
    pub const fn is_prefix(&self) -> bool {
        matches!(self, Self::Prefix(_))
    }

    /// The selector value as passed to the manager.
    pub fn as_os_str(&self) -> &OsStr {
        match self {
            Self::Name(name) => OsStr::new(name),
            Self::Prefix(path) => path.as_os_str(),
        }
    }
}

impl fmt::Display for EnvTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Prefix(path) => write!(f, "{}", path.display()),
        }
    }
}

impl std::str::FromStr for EnvTarget {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn is_absolute_input(input: &str) -> bool {
    input.starts_with('/') || Path::new(input).is_absolute()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_names() {
        assert_eq!(
            EnvTarget::parse("my_env").unwrap(),
            EnvTarget::Name("my_env".to_string())
        );
        assert_eq!(
            EnvTarget::parse("my-env.2").unwrap(),
            EnvTarget::Name("my-env.2".to_string())
        );
        assert!(EnvTarget::parse("base").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(EnvTarget::parse(""), Err(ValidationError::Empty));
    }

    #[test]
    fn test_rejects_shell_metacharacters() {
        for input in [
            "env;rm -rf /",
            "env && ls",
            "$(whoami)",
            "`id`",
            "a|b",
            "a b",
            "a\nb",
            "caf\u{e9}",
        ] {
            let err = EnvTarget::parse(input).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidCharacters(_)),
                "{input:?} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn test_rejects_relative_traversal() {
        assert!(EnvTarget::parse("../x").is_err());
        assert!(matches!(
            EnvTarget::parse(".."),
            Err(ValidationError::ReservedName(_))
        ));
        assert!(matches!(
            EnvTarget::parse("-n"),
            Err(ValidationError::ReservedName(_))
        ));
    }

    #[test]
    fn test_rejects_absolute_traversal() {
        let err = EnvTarget::parse("/tmp/../etc").unwrap_err();
        assert_eq!(err, ValidationError::Traversal("/tmp/../etc".to_string()));
    }

    #[test]
    fn test_rejects_missing_absolute_path_naming_it() {
        let err = EnvTarget::parse("/definitely/not/a/real/env/path").unwrap_err();
        assert!(matches!(err, ValidationError::PathNotFound(_)));
        assert!(err.to_string().contains("/definitely/not/a/real/env/path"));
    }

    #[test]
    fn test_accepts_existing_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let raw = format!("{}/./", dir.path().display());

        let target = EnvTarget::parse(&raw).unwrap();

        assert!(target.is_prefix());
        assert_eq!(target, EnvTarget::Prefix(dir.path().to_path_buf()));
    }

    #[test]
    fn test_dotted_directory_names_are_not_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let dotted = dir.path().join("env..v2");
        std::fs::create_dir(&dotted).unwrap();

        let target = EnvTarget::parse(dotted.to_str().unwrap()).unwrap();
        assert_eq!(target, EnvTarget::Prefix(dotted));
    }
}
