//! Command implementations for stagetime.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the config loading every command shares.

mod render;
mod stages;
mod template;

use crate::cli::Command;
use crate::config::Config;
use crate::error::Result;
use std::path::Path;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Render(args) => render::cmd_render(args),
        Command::Template(args) => template::cmd_template(args),
        Command::Stages(args) => stages::cmd_stages(args),
    }
}

/// Load the effective configuration.
///
/// Precedence, lowest first: built-in defaults, the config file,
/// `PIPELINE_WORKSPACE`, then the `--namespace` flag.
fn load_config(path: Option<&Path>, namespace: Option<&str>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    config.apply_process_env();
    if let Some(namespace) = namespace {
        config.namespace = namespace.trim().to_string();
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NAMESPACE_ENV;
    use crate::error::StageTimeError;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_load_config_defaults() {
        unsafe { std::env::remove_var(NAMESPACE_ENV) };

        let config = load_config(None, None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_load_config_flag_beats_env_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stagetime.yaml");
        fs::write(&path, "namespace: from-file\ntimeout: 2h\n").unwrap();

        unsafe { std::env::set_var(NAMESPACE_ENV, "from-env") };
        let from_env = load_config(Some(&path), None).unwrap();
        let from_flag = load_config(Some(&path), Some("from-flag")).unwrap();
        unsafe { std::env::remove_var(NAMESPACE_ENV) };

        assert_eq!(from_env.namespace, "from-env");
        assert_eq!(from_env.timeout, "2h");
        assert_eq!(from_flag.namespace, "from-flag");
    }

    #[test]
    #[serial]
    fn test_load_config_rejects_blank_namespace_flag() {
        let err = load_config(None, Some("  ")).unwrap_err();
        assert!(matches!(err, StageTimeError::UserError(_)));
    }
}
