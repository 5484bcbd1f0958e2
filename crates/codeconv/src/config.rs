//! Configuration system for codeconv.
//!
//! Loads config from:
//! 1. Global: ~/.config/codeconv/config.toml
//! 2. Per-project: .codeconv/config.toml (overrides global)
//!
//! Command-line flags are merged on top by the caller.
//!
//! Example config.toml:
//! ```toml
//! [output]
//! indent_width = 4
//! line_ending = "lf"
//! pass_empty_bodies = true
//!
//! [calls]
//! arguments = "literals"
//! ```

use codeconv_lower::{CallArgs, LineEnding, PythonOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Shape of the emitted text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Spaces per nesting level. Default: 4
    pub indent_width: Option<usize>,
    /// "crlf" (default) or "lf"
    pub line_ending: Option<LineEnding>,
    /// Emit `pass` for empty bodies. Default: true
    pub pass_empty_bodies: Option<bool>,
}

impl OutputConfig {
    fn merge(self, other: Self) -> Self {
        Self {
            indent_width: other.indent_width.or(self.indent_width),
            line_ending: other.line_ending.or(self.line_ending),
            pass_empty_bodies: other.pass_empty_bodies.or(self.pass_empty_bodies),
        }
    }
}

/// Call-site lowering.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CallsConfig {
    /// "literals" (default) or "expressions"
    pub arguments: Option<CallArgs>,
}

impl CallsConfig {
    fn merge(self, other: Self) -> Self {
        Self {
            arguments: other.arguments.or(self.arguments),
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub output: OutputConfig,
    pub calls: CallsConfig,
}

impl ConvertConfig {
    /// Load configuration for a project rooted at `root`.
    pub fn load(root: &Path) -> Self {
        Self::load_from(Self::global_config_path().as_deref(), root)
    }

    /// Load the global file (if any), then the project file under `root`.
    pub fn load_from(global: Option<&Path>, root: &Path) -> Self {
        let mut config = Self::default();

        if let Some(global) = global.and_then(Self::load_file) {
            config = config.merge(global);
        }

        let project_path = root.join(".codeconv").join("config.toml");
        if let Some(project) = Self::load_file(&project_path) {
            config = config.merge(project);
        }

        config
    }

    /// Get the global config path.
    pub fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("codeconv").join("config.toml"))
    }

    /// Load config from a file path. Missing files are silent, broken ones warn.
    fn load_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Some(config)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
                None
            }
        }
    }

    /// Merge another config into this one. Values set in `other` win.
    pub fn merge(self, other: Self) -> Self {
        Self {
            output: self.output.merge(other.output),
            calls: self.calls.merge(other.calls),
        }
    }

    /// Resolve into writer options, falling back to defaults for unset values.
    pub fn to_options(&self) -> PythonOptions {
        let defaults = PythonOptions::default();
        PythonOptions {
            indent_width: self.output.indent_width.unwrap_or(defaults.indent_width),
            line_ending: self.output.line_ending.unwrap_or(defaults.line_ending),
            pass_empty_bodies: self
                .output
                .pass_empty_bodies
                .unwrap_or(defaults.pass_empty_bodies),
            call_args: self.calls.arguments.unwrap_or(defaults.call_args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(path: &Path, body: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut file = std::fs::File::create(path).unwrap();
        writeln!(file, "{}", body).unwrap();
    }

    #[test]
    fn test_default_options() {
        let config = ConvertConfig::default();
        assert_eq!(config.to_options(), PythonOptions::default());
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join(".codeconv").join("config.toml"),
            r#"
[output]
line_ending = "lf"
indent_width = 2

[calls]
arguments = "expressions"
"#,
        );

        let options = ConvertConfig::load_from(None, dir.path()).to_options();
        assert_eq!(options.line_ending, LineEnding::Lf);
        assert_eq!(options.indent_width, 2);
        assert_eq!(options.call_args, CallArgs::Expressions);
        assert!(options.pass_empty_bodies); // default
    }

    #[test]
    fn test_project_overrides_global() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.toml");
        write_config(
            &global,
            r#"
[output]
indent_width = 8
pass_empty_bodies = false
"#,
        );
        write_config(
            &dir.path().join(".codeconv").join("config.toml"),
            r#"
[output]
indent_width = 3
"#,
        );

        let options = ConvertConfig::load_from(Some(&global), dir.path()).to_options();
        assert_eq!(options.indent_width, 3);
        assert!(!options.pass_empty_bodies); // from global
    }

    #[test]
    fn test_invalid_config_is_skipped() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join(".codeconv").join("config.toml"),
            r#"
[output]
line_ending = "cr"
"#,
        );

        let config = ConvertConfig::load_from(None, dir.path());
        assert_eq!(config, ConvertConfig::default());
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let base = ConvertConfig {
            output: OutputConfig {
                indent_width: Some(2),
                ..Default::default()
            },
            ..Default::default()
        };
        let flags = ConvertConfig {
            calls: CallsConfig {
                arguments: Some(CallArgs::Expressions),
            },
            ..Default::default()
        };

        let merged = base.merge(flags);
        assert_eq!(merged.output.indent_width, Some(2));
        assert_eq!(merged.calls.arguments, Some(CallArgs::Expressions));
    }
}
