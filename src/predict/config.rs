use super::{Model, PredictError, Predictor, Session};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Resource options for opening a model session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Fraction of device memory to reserve up front
    pub memory_fraction: f64,
    /// Whether the session may allocate memory beyond the initial reservation
    pub allow_growth: bool,
}

impl Default for SessionConfig {
    /// Start with a small reservation but allow growth.
    fn default() -> Self {
        Self {
            memory_fraction: 0.3,
            allow_growth: true,
        }
    }
}

/// How to initialize the variables of a newly opened session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionInit {
    /// Keep the values the session starts with.
    JustCurrent,
    /// Restore the values from a saved checkpoint.
    Checkpoint(PathBuf),
}

impl Default for SessionInit {
    fn default() -> Self {
        Self::JustCurrent
    }
}

/// Configuration of a [`Predictor`].
///
/// # Example
/// ```
/// use histflow::predict::PredictConfig;
/// use serde_json::json;
///
/// let config = PredictConfig::from_value(json!({
///     "output_var_names": ["logits"],
///     "input_data_mapping": [0],
/// }))
/// .unwrap();
/// assert_eq!(config.input_data_mapping, Some(vec![0]));
/// assert!(!config.return_input);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictConfig {
    #[serde(default)]
    pub session_config: SessionConfig,

    #[serde(default)]
    pub session_init: SessionInit,

    /// Input slot fed by each data point component.
    ///
    /// Component `i` is fed to input slot `input_data_mapping[i]`.
    /// Slots that no component maps to are not fed.
    /// If `None`, component `i` is fed to slot `i` for every input slot of the model.
    #[serde(default)]
    pub input_data_mapping: Option<Vec<usize>>,

    /// Names of the model outputs to compute.
    pub output_var_names: Vec<String>,

    /// Whether [`Predictor::predict_flow`] also returns each input data point.
    #[serde(default)]
    pub return_input: bool,
}

impl PredictConfig {
    /// Key under which a mapping may name the model.
    ///
    /// The model is not part of the serializable configuration; it is passed to
    /// [`PredictConfig::build_predictor`].
    const MODEL_KEY: &'static str = "model";

    /// Configuration keys and whether each is required.
    const KEYS: [(&'static str, bool); 5] = [
        ("session_config", false),
        ("session_init", false),
        ("input_data_mapping", false),
        ("output_var_names", true),
        ("return_input", false),
    ];

    /// Configuration with the given outputs and all other options at their defaults.
    pub fn new<I, S>(output_var_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            session_config: SessionConfig::default(),
            session_init: SessionInit::default(),
            input_data_mapping: None,
            output_var_names: output_var_names.into_iter().map(Into::into).collect(),
            return_input: false,
        }
    }

    /// Parse a configuration from a key-value mapping.
    ///
    /// # Errors
    /// * [`ConfigError::NotAMapping`] if `value` is not a JSON object.
    /// * [`ConfigError::UnknownKeys`] naming every unrecognized key.
    /// * [`ConfigError::ModelInMapping`] if the mapping has a `model` key.
    /// * [`ConfigError::MissingKeys`] naming every required key that is absent.
    /// * [`ConfigError::InvalidValue`] if a value has the wrong form.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let map = value.as_object().ok_or(ConfigError::NotAMapping)?;

        let unknown: Vec<String> = map
            .keys()
            .filter(|key| {
                key.as_str() != Self::MODEL_KEY
                    && !Self::KEYS.iter().any(|&(name, _)| name == key.as_str())
            })
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(ConfigError::UnknownKeys(unknown));
        }
        if map.contains_key(Self::MODEL_KEY) {
            return Err(ConfigError::ModelInMapping);
        }

        let missing: Vec<String> = Self::KEYS
            .iter()
            .filter(|(name, required)| *required && !map.contains_key(*name))
            .map(|(name, _)| (*name).to_owned())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingKeys(missing));
        }

        serde_json::from_value(value).map_err(ConfigError::InvalidValue)
    }

    /// Open a session on `model` and build a predictor from this configuration.
    ///
    /// The session is initialized according to `session_init`.
    ///
    /// # Errors
    /// * [`PredictError::InvalidInputMapping`] if a mapped slot does not exist in the model.
    /// * [`PredictError::UnknownOutput`] if an output name does not exist in the model.
    /// * [`PredictError::Session`] if the session cannot be opened or initialized.
    pub fn build_predictor<M>(
        &self,
        model: &M,
    ) -> Result<Predictor<M::Session>, PredictError<<M::Session as Session>::Error>>
    where
        M: Model + ?Sized,
    {
        let num_inputs = model.input_names().len();
        let input_slots: Vec<usize> = match &self.input_data_mapping {
            Some(mapping) => {
                if let Some(&index) = mapping.iter().find(|&&index| index >= num_inputs) {
                    return Err(PredictError::InvalidInputMapping { index, num_inputs });
                }
                mapping.clone()
            }
            None => (0..num_inputs).collect(),
        };

        if let Some(name) = self
            .output_var_names
            .iter()
            .find(|name| !model.has_output(name))
        {
            return Err(PredictError::UnknownOutput(name.clone()));
        }

        let mut session = model
            .build_session(&self.session_config)
            .map_err(PredictError::Session)?;
        if let SessionInit::Checkpoint(path) = &self.session_init {
            session.restore(path).map_err(PredictError::Session)?;
        }

        Ok(Predictor::new(
            session,
            input_slots,
            self.output_var_names.clone(),
            self.return_input,
        ))
    }
}

/// Error parsing a [`PredictConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown configuration keys: {}", .0.join(", "))]
    UnknownKeys(Vec<String>),
    #[error("missing required configuration keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),
    #[error("the model is passed to build_predictor, not set in the configuration")]
    ModelInMapping,
    #[error("configuration must be a key-value mapping")]
    NotAMapping,
    #[error("invalid configuration value: {0}")]
    InvalidValue(#[source] serde_json::Error),
}
