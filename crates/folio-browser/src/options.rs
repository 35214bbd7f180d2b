#![forbid(unsafe_code)]

//! JSON options accepted by the JS-facing constructors.
//!
//! Every field is optional; omitted fields take the engine defaults. Parsed
//! configs are validated before an engine is built.

use core::fmt;

use folio_fx::{ConfigError, FocusConfig, ParticleConfig, ScrambleConfig, ScrollThresholdConfig};
use serde::de::DeserializeOwned;

/// Rejected constructor options.
#[derive(Debug)]
pub enum OptionsError {
    /// Not valid JSON, or a field has the wrong type.
    Json(serde_json::Error),
    /// Well-formed but unusable values.
    Config(ConfigError),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid options: {err}"),
            Self::Config(err) => write!(f, "invalid options: {err}"),
        }
    }
}

impl std::error::Error for OptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for OptionsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<ConfigError> for OptionsError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

fn parse<T: DeserializeOwned + Default>(json: Option<&str>) -> Result<T, serde_json::Error> {
    match json.map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(text) => serde_json::from_str(text),
    }
}

pub fn scramble_options(json: Option<&str>) -> Result<ScrambleConfig, OptionsError> {
    let config: ScrambleConfig = parse(json)?;
    config.validate()?;
    Ok(config)
}

/// Focus options; `sentence` falls back to the container's text when the
/// JSON does not set it.
pub fn focus_options(json: Option<&str>, sentence: &str) -> Result<FocusConfig, OptionsError> {
    let mut config: FocusConfig = match json.map(str::trim) {
        None | Some("") => FocusConfig::default().sentence(sentence),
        Some(text) => {
            let value: serde_json::Value = serde_json::from_str(text)?;
            let has_sentence = value.get("sentence").is_some();
            let mut config: FocusConfig = serde_json::from_value(value)?;
            if !has_sentence {
                config.sentence = sentence.to_owned();
            }
            config
        }
    };
    config.sentence = config.sentence.trim().to_owned();
    config.validate()?;
    Ok(config)
}

pub fn particle_options(json: Option<&str>) -> Result<ParticleConfig, OptionsError> {
    let config: ParticleConfig = parse(json)?;
    config.validate()?;
    Ok(config)
}

pub fn threshold_options(threshold: Option<f64>) -> Result<ScrollThresholdConfig, OptionsError> {
    let config = threshold.map_or_else(ScrollThresholdConfig::default, ScrollThresholdConfig::new);
    config.validate()?;
    Ok(config)
}
