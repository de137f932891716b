//! Config loading, validation, and utility operations.

use super::model::Config;
use super::types::NAMESPACE_ENV;
use crate::error::{Result, StageTimeError};
use crate::manifest::{ManifestTemplates, RenderSettings};
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(StageTimeError::UserError)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            StageTimeError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    ///
    /// A blank file yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml).map_err(|e| {
            StageTimeError::UserError(format!("failed to parse config YAML: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// Only `PIPELINE_WORKSPACE` is consulted; an empty value is ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(namespace) = lookup(NAMESPACE_ENV)
            && !namespace.trim().is_empty()
        {
            self.namespace = namespace.trim().to_string();
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_process_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `namespace`, `service_account`, and `timeout` must be non-empty
    /// - `name_prefix` must be non-empty and contain only lowercase
    ///   alphanumerics and `-`
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("namespace", &self.namespace),
            ("service_account", &self.service_account),
            ("timeout", &self.timeout),
            ("name_prefix", &self.name_prefix),
        ] {
            if value.trim().is_empty() {
                return Err(StageTimeError::UserError(format!(
                    "config validation failed: {} must not be empty",
                    field
                )));
            }
        }

        if !self
            .name_prefix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(StageTimeError::UserError(format!(
                "config validation failed: name_prefix '{}' may only contain \
                 lowercase letters, digits, and '-'",
                self.name_prefix
            )));
        }

        Ok(())
    }

    /// The per-request settings threaded into the manifest renderer.
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            namespace: self.namespace.clone(),
            service_account: self.service_account.clone(),
            timeout: self.timeout.clone(),
            name_prefix: self.name_prefix.clone(),
        }
    }

    /// Load and parse the manifest and tracking templates.
    ///
    /// Configured template files replace the built-in ones.
    ///
    /// # Returns
    ///
    /// * `Err(StageTimeError::UserError)` - A template file cannot be read
    /// * `Err(StageTimeError::TemplateConfiguration)` - A template does not parse
    pub fn templates(&self) -> Result<ManifestTemplates> {
        let manifest = read_template(self.manifest_template.as_deref())?;
        let tracking = read_template(self.tracking_template.as_deref())?;
        ManifestTemplates::with_overrides(manifest.as_deref(), tracking.as_deref())
    }
}

fn read_template(path: Option<&Path>) -> Result<Option<String>> {
    let Some(path) = path else {
        return Ok(None);
    };

    std::fs::read_to_string(path).map(Some).map_err(|e| {
        StageTimeError::UserError(format!(
            "failed to read template file '{}': {}",
            path.display(),
            e
        ))
    })
}
