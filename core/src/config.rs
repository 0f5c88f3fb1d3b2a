use serde::{Deserialize, Serialize};
use std::{num::NonZeroUsize, thread, time::Duration};

/// Tuning of the refresh pass.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Live sets larger than this use the parallel coordinator.
    pub parallel_threshold: usize,
    /// Worker count; `None` means the available parallelism.
    pub workers: Option<usize>,
    /// Upper bound for one distribution pass.
    pub deadline: Option<Duration>,
    /// How often a progress monitor samples the counter.
    pub progress_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 2000,
            workers: None,
            deadline: None,
            progress_interval: Duration::from_millis(200),
        }
    }
}

impl EngineConfig {
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
            ..Self::default()
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
            .filter(|&w| w > 0)
            .unwrap_or_else(|| thread::available_parallelism().map_or(1, NonZeroUsize::get))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "parallel_threshold": 10, "workers": 3 }"#).unwrap();
        assert_eq!(config.parallel_threshold, 10);
        assert_eq!(config.workers(), 3);
        assert_eq!(config.deadline, None);
        assert_eq!(config.progress_interval, Duration::from_millis(200));
    }

    #[test]
    fn zero_workers_falls_back_to_available_parallelism() {
        let config = EngineConfig {
            workers: Some(0),
            ..EngineConfig::default()
        };
        assert!(config.workers() >= 1);
    }
}
