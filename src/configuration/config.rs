#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

use crate::domain::models::GenerationPolicy;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ConfigFile,
    ExtractionModel,
    GeminiToken,
    GeminiURL,
    GenerationPolicy,
    HealthCheckTimeout,
    ImageModel,
    ImagePath,
    OutputDir,
    RequestTimeout,
}

pub struct Config {}

pub fn config_dir() -> Result<path::PathBuf> {
    #[cfg(not(target_os = "macos"))]
    let dir = dirs::config_dir();
    #[cfg(target_os = "macos")]
    let dir = dirs::home_dir().map(|e| return e.join(".config"));

    match dir {
        Some(dir) => return Ok(dir.join("menuviz")),
        None => bail!("Could not resolve a configuration directory for this user"),
    }
}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    /// Reads a millisecond duration key.
    pub fn get_millis(key: ConfigKey) -> Result<u64> {
        let val = Config::get(key);
        match val.parse::<u64>() {
            Ok(millis) => return Ok(millis),
            Err(_) => bail!(format!("{key} must be a number of milliseconds, got '{val}'")),
        }
    }

    pub fn default(key: ConfigKey) -> String {
        let default_policy = GenerationPolicy::default().to_string();
        let config_path = config_dir()
            .map(|e| return e.join("config.toml").to_string_lossy().to_string())
            .unwrap_or_default();

        let res: &str = match key {
            ConfigKey::ExtractionModel => "gemini-2.5-flash",
            ConfigKey::GeminiToken => "",
            ConfigKey::GeminiURL => "https://generativelanguage.googleapis.com",
            ConfigKey::GenerationPolicy => &default_policy,
            ConfigKey::HealthCheckTimeout => "2000",
            ConfigKey::ImageModel => "imagen-3.0-generate-002",
            ConfigKey::OutputDir => "",
            ConfigKey::RequestTimeout => "60000",

            // Special
            ConfigKey::ConfigFile => &config_path,
            ConfigKey::ImagePath => "",
        };

        return res.to_string();
    }

    fn is_special(key: ConfigKey) -> bool {
        return key == ConfigKey::ConfigFile || key == ConfigKey::ImagePath;
    }

    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(&config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if Config::is_special(key) {
                    continue;
                }

                if let Some(val) = doc.get(&key.to_string()) {
                    // Use clap value parsers to do validation.
                    let mut possible_values = vec![];
                    if let Some(arg) = cmd
                        .get_arguments()
                        .find(|e| return e.get_long() == Some(key.to_string().as_str()))
                    {
                        possible_values = arg
                            .get_possible_values()
                            .iter()
                            .map(|e| return e.get_name().to_string())
                            .collect::<Vec<String>>();
                    }

                    if let Some(val_int) = val.as_integer() {
                        Config::set(key, &val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        if !possible_values.is_empty()
                            && !possible_values.contains(&val_str.to_string())
                        {
                            bail!(format!("config.toml has an invalid value for key '{key}': {val_str}\nPossible values are: {}", possible_values.join(", ")));
                        }
                        Config::set(key, val_str);
                    } else {
                        bail!(format!(
                            "config.toml has an invalid value for key '{key}', expected a string or number"
                        ));
                    }
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        tracing::debug!(
            config_file = ?config_path,
            gemini_url = Config::get(ConfigKey::GeminiURL),
            extraction_model = Config::get(ConfigKey::ExtractionModel),
            image_model = Config::get(ConfigKey::ImageModel),
            generation_policy = Config::get(ConfigKey::GenerationPolicy),
            request_timeout = Config::get(ConfigKey::RequestTimeout),
            output_dir = Config::get(ConfigKey::OutputDir),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if Config::is_special(key) {
                    return None;
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))?;

                let mut description = arg
                    .get_help()
                    .map(|e| return e.to_string())
                    .unwrap_or_default();

                description = description
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                if !arg.get_possible_values().is_empty() {
                    let possible_values = arg
                        .get_possible_values()
                        .iter()
                        .map(|e| return e.get_name())
                        .collect::<Vec<_>>()
                        .join(", ");
                    description = format!("{description} [possible values: {}]", possible_values);
                }

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<i64>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
