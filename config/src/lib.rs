//! cmdsh Configuration System
//!
//! Provides YAML-based configuration for the cmdsh shell.
//!
//! # Configuration Loading Priority
//!
//! 1. Compiled-in defaults
//! 2. `/etc/cmdsh/cmdsh.yaml` (system-wide)
//! 3. `~/.config/cmdsh/cmdsh.yaml` (user)
//! 4. `./cmdsh.yaml` (project-local)
//! 5. `CMDSH_CONFIG=/path/to/config.yaml` (explicit)
//! 6. Environment variables (highest priority)
//!
//! # Example Configuration
//!
//! ```yaml
//! shell:
//!   prompt: "$ "
//!   history:
//!     file: "~/.cmdsh_history"
//!     max_entries: 10000
//!
//! logging:
//!   level: info
//! ```

#![allow(missing_docs)]

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::*;

/// Load configuration from default locations.
///
/// Searches for config files in order and merges them.
/// Environment variables override file values.
pub fn load() -> Result<CmdshConfig, ConfigError> {
    ConfigLoader::new().load()
}

/// Load configuration from a specific file.
pub fn load_from_file(path: &str) -> Result<CmdshConfig, ConfigError> {
    ConfigLoader::new().with_file(path).load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = CmdshConfig::default();
        assert_eq!(config.shell.prompt, "$ ");
        assert!(config.shell.history.enabled);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = r##"
shell:
  prompt: "# "
"##;
        let config: CmdshConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.shell.prompt, "# ");
        assert_eq!(config.shell.history.max_entries, 10000); // default
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
shell:
  prompt: "cmdsh> "
  history:
    enabled: false
    file: "/tmp/hist"
    max_entries: 50

logging:
  level: debug
"#;
        let config: CmdshConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.shell.prompt, "cmdsh> ");
        assert!(!config.shell.history.enabled);
        assert_eq!(config.shell.history.max_entries, 50);
        assert_eq!(config.logging.level, LogLevel::Debug);
    }
}
