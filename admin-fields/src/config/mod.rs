//! Configuration management for admin-fields
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ADMIN_FIELDS_` prefix, `__` for nesting)
//! 2. `./admin-fields.toml` (development)
//! 3. `~/.config/admin-fields/{service}/config.toml` (user config, XDG)
//! 4. `/etc/admin-fields/{service}/config.toml` (system config)
//! 5. Hardcoded defaults (fallback)
//!
//! Environment variable format: `ADMIN_FIELDS_SECTION__FIELD_NAME`,
//! e.g. `ADMIN_FIELDS_UPLOADS__DIR=/var/uploads`.
//!
//! # Example Configuration
//!
//! ```toml
//! time_format = "%d.%m.%Y %H:%M"
//!
//! [uploads]
//! dir = "./uploads"
//! url_prefix = "/uploads"
//! max_file_size = 10485760
//! max_files = 10
//!
//! [layout]
//! default_width = 6
//!
//! [templates]
//! override_dir = "./templates"
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::value::DEFAULT_DATETIME_FORMAT;

/// Upload handling for file fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Directory uploads are written to
    pub dir: PathBuf,

    /// URL prefix uploads are served from
    pub url_prefix: String,

    /// Maximum size of a single uploaded file in bytes
    pub max_file_size: u64,

    /// Maximum number of files in one submission
    pub max_files: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./uploads"),
            url_prefix: "/uploads".to_string(),
            max_file_size: 10 * 1024 * 1024,
            max_files: 10,
        }
    }
}

/// Grid layout defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Column width (1-12) for fields that do not set one
    pub default_width: u8,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self { default_width: 12 }
    }
}

/// Template overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Directory with replacement `fields/*.html` templates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_dir: Option<PathBuf>,
}

/// Complete admin-fields configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldsConfig {
    /// Upload settings
    pub uploads: UploadSettings,

    /// Layout settings
    pub layout: LayoutSettings,

    /// Template settings
    pub templates: TemplateSettings,

    /// Default chrono format for time fields
    pub time_format: String,
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            uploads: UploadSettings::default(),
            layout: LayoutSettings::default(),
            templates: TemplateSettings::default(),
            time_format: DEFAULT_DATETIME_FORMAT.to_string(),
        }
    }
}

impl FieldsConfig {
    /// Load configuration for a specific service
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file cannot be parsed or a
    /// value has the wrong type.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use admin_fields::config::FieldsConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = FieldsConfig::load_for_service("my-admin")?;
    /// println!("uploads go to {}", config.uploads.dir.display());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_for_service(service_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?));

        let system_config = PathBuf::from("/etc/admin-fields")
            .join(service_name)
            .join("config.toml");
        if system_config.exists() {
            figment = figment.merge(Toml::file(&system_config));
        }

        let user_config = Self::recommended_path(service_name);
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        let local_config = PathBuf::from("./admin-fields.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        figment = figment.merge(Env::prefixed("ADMIN_FIELDS_").split("__").lowercase(true));

        let config: Self = figment.extract()?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// A missing file is not an error; defaults and environment apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or a value has the
    /// wrong type.
    pub fn load_from(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let config: Self = Figment::new()
            .merge(Toml::string(&toml::to_string(&Self::default())?))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("ADMIN_FIELDS_").split("__").lowercase(true))
            .extract()?;

        config.check()?;
        Ok(config)
    }

    /// Get the recommended XDG config path for a service
    #[must_use]
    pub fn recommended_path(service_name: &str) -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("./admin-fields.toml"),
            |config_dir| {
                config_dir
                    .join("admin-fields")
                    .join(service_name)
                    .join("config.toml")
            },
        )
    }

    fn check(&self) -> anyhow::Result<()> {
        if !(1..=12).contains(&self.layout.default_width) {
            anyhow::bail!(
                "layout.default_width must be between 1 and 12, got {}",
                self.layout.default_width
            );
        }
        Ok(())
    }
}
