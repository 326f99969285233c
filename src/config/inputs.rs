//! Sources of action inputs.

use std::collections::HashMap;

/// Read-only view over action inputs.
///
/// Runners pass each input `foo-bar` as the environment variable
/// `INPUT_FOO-BAR`. Empty values are treated as unset.
pub trait Inputs {
    /// Raw value of the input, if set and non-empty
    fn get(&self, name: &str) -> Option<String>;
}

/// Environment variable name for an action input.
pub fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Inputs from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvInputs;

impl Inputs for EnvInputs {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(input_env_name(name))
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// In-memory inputs, keyed by input name.
#[derive(Debug, Clone, Default)]
pub struct MapInputs(HashMap<String, String>);

impl MapInputs {
    /// Create an empty input set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    #[must_use]
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.0.insert(name.to_string(), value.to_string());
        self
    }
}

impl Inputs for MapInputs {
    fn get(&self, name: &str) -> Option<String> {
        self.0
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
