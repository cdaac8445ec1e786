use crate::utils::get_config_dir;
use color_eyre::eyre::{self, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "UPLOADTUI";

/// Where and what the upload screen sends.
///
/// Values are layered: built-in defaults, then `config.toml` from the config
/// directory (or the file given with `--config`), then `UPLOADTUI_*`
/// environment variables, then command line flags.
/// A text field sent alongside the resource.
///
/// The field name lives in a value rather than a table key, since the
/// configuration layer lowercases keys and the server sees the name verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormParam {
    pub name: String,
    pub value: String,
}

impl FormParam {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        FormParam {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    pub destination_url: String,
    pub resource_path: PathBuf,
    pub file_field: String,
    pub params: Vec<FormParam>,
    pub timeout_secs: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        UploadSettings {
            destination_url: "http://localhost:4567/upload".to_string(),
            resource_path: PathBuf::from("assets").join("upload.png"),
            file_field: "image".to_string(),
            params: vec![FormParam::new("Sample Param", "Sample Value")],
            timeout_secs: 30,
        }
    }
}

impl UploadSettings {
    pub fn destination(&self) -> eyre::Result<Url> {
        Url::parse(&self.destination_url)
            .wrap_err_with(|| format!("invalid destination url: {}", self.destination_url))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Applies command line overrides on top of the loaded values
    pub fn with_overrides(mut self, resource: Option<PathBuf>, destination: Option<String>) -> Self {
        if let Some(resource) = resource {
            self.resource_path = resource;
        }
        if let Some(destination) = destination {
            self.destination_url = destination;
        }
        self
    }
}

pub fn load_settings(config_file: Option<PathBuf>) -> eyre::Result<UploadSettings> {
    let path = config_file.unwrap_or_else(|| get_config_dir().join(CONFIG_FILE));
    load_settings_from(&path)
}

fn load_settings_from(path: &Path) -> eyre::Result<UploadSettings> {
    tracing::info!("Loading settings from {}", path.display());
    let settings = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()
        .wrap_err("could not read configuration")?
        .try_deserialize::<UploadSettings>()
        .wrap_err("invalid configuration")?;
    settings.destination()?;
    Ok(settings)
}
