//! Session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fastest allowed step.
pub const MIN_STEP_MS: u64 = 10;

/// Slowest allowed step.
pub const MAX_STEP_MS: u64 = 500;

/// Most bars a sequence may have.
pub const MAX_SEQUENCE_LEN: usize = 200;

/// Tunables for one visualizer session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisConfig {
    /// Number of bars in a generated sequence.
    pub sequence_len: usize,

    /// Delay between animation steps, in milliseconds.
    pub step_delay_ms: u64,

    /// Default target for searches.
    pub search_target: Option<i64>,

    /// Upper bound (exclusive) of generated bar heights.
    pub max_value: f64,

    /// Items generated per knapsack run.
    pub knapsack_items: usize,

    /// Default knapsack capacity.
    pub knapsack_capacity: f64,

    /// Default Huffman input.
    pub huffman_text: String,

    /// Drawing surface size used for the graph layout.
    pub surface_width: f64,
    pub surface_height: f64,

    /// Seed for reproducible data; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            sequence_len: 25,
            step_delay_ms: 250,
            search_target: None,
            max_value: 400.0,
            knapsack_items: 5,
            knapsack_capacity: 50.0,
            huffman_text: "hello huffman".to_string(),
            surface_width: 800.0,
            surface_height: 600.0,
            seed: None,
        }
    }
}

impl VisConfig {
    /// Defaults overridden by `ALGOVIZ_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("ALGOVIZ_SEQUENCE_LEN") {
            config.sequence_len = parse_var("ALGOVIZ_SEQUENCE_LEN", &raw)?;
        }
        if let Some(raw) = lookup("ALGOVIZ_STEP_MS") {
            config.step_delay_ms = parse_var("ALGOVIZ_STEP_MS", &raw)?;
        }
        if let Some(raw) = lookup("ALGOVIZ_SEARCH_TARGET") {
            config.search_target = Some(parse_var("ALGOVIZ_SEARCH_TARGET", &raw)?);
        }
        if let Some(raw) = lookup("ALGOVIZ_SEED") {
            config.seed = Some(parse_var("ALGOVIZ_SEED", &raw)?);
        }

        config.step_delay_ms = clamp_step(config.step_delay_ms);
        config.validate()?;
        Ok(config)
    }

    /// Reject values no run can work with.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SEQUENCE_LEN).contains(&self.sequence_len) {
            return Err(Error::invalid(format!(
                "sequence_len must be between 1 and {}",
                MAX_SEQUENCE_LEN
            )));
        }
        if !(MIN_STEP_MS..=MAX_STEP_MS).contains(&self.step_delay_ms) {
            return Err(Error::invalid(format!(
                "step_delay_ms must be between {} and {}",
                MIN_STEP_MS, MAX_STEP_MS
            )));
        }
        if !(self.max_value.is_finite() && self.max_value > 0.0) {
            return Err(Error::invalid("max_value must be positive"));
        }
        if !(self.knapsack_capacity.is_finite() && self.knapsack_capacity > 0.0) {
            return Err(Error::invalid("knapsack_capacity must be positive"));
        }
        if self.huffman_text.is_empty() {
            return Err(Error::invalid("huffman_text must not be empty"));
        }
        if !(self.surface_width > 0.0 && self.surface_height > 0.0) {
            return Err(Error::invalid("surface size must be positive"));
        }
        Ok(())
    }

    /// Step delay as a duration.
    pub fn step(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

/// Clamp a step delay into [`MIN_STEP_MS`]..=[`MAX_STEP_MS`].
pub fn clamp_step(ms: u64) -> u64 {
    ms.clamp(MIN_STEP_MS, MAX_STEP_MS)
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::invalid(format!("{} has invalid value {:?}", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = VisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.step(), Duration::from_millis(250));
    }

    #[test]
    fn env_overrides_apply() {
        let config = VisConfig::from_lookup(lookup(&[
            ("ALGOVIZ_SEQUENCE_LEN", "40"),
            ("ALGOVIZ_SEARCH_TARGET", "-12"),
            ("ALGOVIZ_SEED", " 99 "),
        ]))
        .unwrap();

        assert_eq!(config.sequence_len, 40);
        assert_eq!(config.search_target, Some(-12));
        assert_eq!(config.seed, Some(99));
    }

    #[test]
    fn step_is_clamped() {
        let fast = VisConfig::from_lookup(lookup(&[("ALGOVIZ_STEP_MS", "1")])).unwrap();
        assert_eq!(fast.step_delay_ms, MIN_STEP_MS);

        let slow = VisConfig::from_lookup(lookup(&[("ALGOVIZ_STEP_MS", "10000")])).unwrap();
        assert_eq!(slow.step_delay_ms, MAX_STEP_MS);
    }

    #[test]
    fn bad_values_rejected() {
        assert!(VisConfig::from_lookup(lookup(&[("ALGOVIZ_SEARCH_TARGET", "abc")])).is_err());
        assert!(VisConfig::from_lookup(lookup(&[("ALGOVIZ_SEQUENCE_LEN", "0")])).is_err());
        assert!(VisConfig::from_lookup(lookup(&[("ALGOVIZ_SEQUENCE_LEN", "201")])).is_err());

        let config = VisConfig {
            huffman_text: String::new(),
            ..VisConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: VisConfig = serde_json::from_str(r#"{"sequence_len": 8}"#).unwrap();
        assert_eq!(config.sequence_len, 8);
        assert_eq!(config.huffman_text, "hello huffman");
    }
}
