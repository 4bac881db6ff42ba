//! Configuration types for scheduling and the analysis service.

use pyo3::prelude::*;

/// Environment variable holding the analysis service credential.
pub const API_KEY_ENV: &str = "API_KEY";
/// Optional override for the analysis model.
pub const MODEL_ENV: &str = "CRITPATH_ANALYSIS_MODEL";
/// Optional override for the analysis endpoint base URL.
pub const ENDPOINT_ENV: &str = "CRITPATH_ANALYSIS_ENDPOINT";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for a scheduling run.
#[pyclass]
#[derive(Clone, Debug, Default)]
pub struct SchedulerConfig {
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

#[pymethods]
impl SchedulerConfig {
    #[new]
    #[pyo3(signature = (verbosity=0))]
    pub fn new(verbosity: u8) -> Self {
        Self { verbosity }
    }

    fn __repr__(&self) -> String {
        format!("SchedulerConfig(verbosity={})", self.verbosity)
    }
}

/// Connection settings for the external analysis service.
///
/// Passed explicitly to the client at construction; nothing is read from the
/// process environment unless `from_env` is called.
#[pyclass]
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    #[pyo3(get, set)]
    pub api_key: Option<String>,
    #[pyo3(get, set)]
    pub model: String,
    /// Base URL; the model path is appended per request.
    #[pyo3(get, set)]
    pub endpoint: String,
    /// Per-request timeout.
    #[pyo3(get, set)]
    pub timeout_secs: u64,
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 60,
            verbosity: 0,
        }
    }
}

impl AnalysisConfig {
    /// Build a config from explicit lookups, used by `from_env` and tests.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            api_key: non_empty(API_KEY_ENV),
            model: non_empty(MODEL_ENV).unwrap_or(defaults.model),
            endpoint: non_empty(ENDPOINT_ENV).unwrap_or(defaults.endpoint),
            ..defaults
        }
    }
}

#[pymethods]
impl AnalysisConfig {
    #[new]
    #[pyo3(signature = (
        api_key=None,
        model=None,
        endpoint=None,
        timeout_secs=None,
        verbosity=None
    ))]
    pub fn new(
        api_key: Option<String>,
        model: Option<String>,
        endpoint: Option<String>,
        timeout_secs: Option<u64>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            api_key,
            model: model.unwrap_or(defaults.model),
            endpoint: endpoint.unwrap_or(defaults.endpoint),
            timeout_secs: timeout_secs.unwrap_or(defaults.timeout_secs),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    /// Read the credential and optional overrides from the environment.
    #[staticmethod]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn __repr__(&self) -> String {
        // Never echo the key itself.
        format!(
            "AnalysisConfig(model={:?}, endpoint={:?}, api_key_set={})",
            self.model,
            self.endpoint,
            self.api_key.is_some()
        )
    }
}
