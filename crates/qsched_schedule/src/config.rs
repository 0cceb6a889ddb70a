//! Scheduler configuration
//!
//! Gantree: L4_Scheduling → SchedulerConfig
//!
//! Every scheduling call receives its mode and search knobs explicitly;
//! nothing here is process-wide state.

use qsched_core::{search, SchedError, SchedResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scheduling direction
/// Gantree: SchedulingMode // 스케줄 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SchedulingMode {
    /// As soon as possible
    /// Gantree: Earliest // ASAP
    #[default]
    #[serde(alias = "asap")]
    Earliest,

    /// As late as possible without growing the makespan
    /// Gantree: Latest // ALAP
    #[serde(alias = "alap")]
    Latest,
}

impl SchedulingMode {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "earliest" | "asap" => Some(SchedulingMode::Earliest),
            "latest" | "alap" => Some(SchedulingMode::Latest),
            _ => None,
        }
    }
}

impl fmt::Display for SchedulingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulingMode::Earliest => write!(f, "earliest"),
            SchedulingMode::Latest => write!(f, "latest"),
        }
    }
}

/// Scheduler configuration
/// Gantree: SchedulerConfig // 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Scheduling direction
    /// Gantree: mode: SchedulingMode // earliest/latest
    pub mode: SchedulingMode,

    /// Number of scheduling trials
    /// Gantree: repeat_num: usize // 반복 횟수 (1)
    pub repeat_num: usize,

    /// Shuffle the tie-break order in each trial
    /// Gantree: random_shuffle: bool // 무작위
    pub random_shuffle: bool,

    /// Base seed for shuffled trials
    /// Gantree: seed: Option<u64> // 시드
    pub seed: Option<u64>,

    /// Run trials on the rayon pool
    pub parallel: bool,

    /// Prefer ready operations with the longest remaining chain
    pub critical_path_priority: bool,
}

impl SchedulerConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Deterministic single-pass configuration for a mode
    pub fn new(mode: SchedulingMode) -> Self {
        Self {
            mode,
            repeat_num: search::DEFAULT_REPEAT_NUM,
            random_shuffle: false,
            seed: None,
            parallel: true,
            critical_path_priority: true,
        }
    }

    /// Earliest-first configuration
    pub fn earliest() -> Self {
        Self::new(SchedulingMode::Earliest)
    }

    /// Latest-first configuration
    pub fn latest() -> Self {
        Self::new(SchedulingMode::Latest)
    }

    /// Randomized search with `repeat_num` trials
    pub fn randomized(mode: SchedulingMode, repeat_num: usize, seed: u64) -> Self {
        Self::new(mode)
            .with_repeat_num(repeat_num)
            .with_random_shuffle(true)
            .with_seed(seed)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set mode
    pub fn with_mode(mut self, mode: SchedulingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set repeat count
    pub fn with_repeat_num(mut self, repeat_num: usize) -> Self {
        self.repeat_num = repeat_num;
        self
    }

    /// Enable or disable shuffled tie-breaking
    pub fn with_random_shuffle(mut self, enabled: bool) -> Self {
        self.random_shuffle = enabled;
        self
    }

    /// Set base seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable parallel trials
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Enable or disable critical-path priority
    pub fn with_critical_path_priority(mut self, enabled: bool) -> Self {
        self.critical_path_priority = enabled;
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Whether shuffled trials run at all
    ///
    /// A single trial is always the deterministic identity order.
    pub fn is_randomized(&self) -> bool {
        self.random_shuffle && self.repeat_num > 1
    }

    /// Number of trials actually run
    pub fn effective_trials(&self) -> usize {
        if self.is_randomized() {
            self.repeat_num
        } else {
            1
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> SchedResult<()> {
        if !search::is_valid_repeat_num(self.repeat_num) {
            return Err(SchedError::InvalidConfig(format!(
                "repeat_num must be in [1, {}], got {}",
                search::MAX_REPEAT_NUM,
                self.repeat_num
            )));
        }
        Ok(())
    }

    // ========================================================================
    // JSON
    // ========================================================================

    /// Load from JSON and validate
    pub fn from_json(json: &str) -> SchedResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> SchedResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::earliest()
    }
}

impl fmt::Display for SchedulerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SchedulerConfig({}, trials={}, shuffle={}, seed={:?})",
            self.mode, self.repeat_num, self.random_shuffle, self.seed
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.mode, SchedulingMode::Earliest);
        assert_eq!(config.repeat_num, 1);
        assert!(!config.random_shuffle);
        assert!(config.critical_path_priority);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(SchedulingMode::parse("ASAP"), Some(SchedulingMode::Earliest));
        assert_eq!(SchedulingMode::parse("alap"), Some(SchedulingMode::Latest));
        assert_eq!(SchedulingMode::parse("latest"), Some(SchedulingMode::Latest));
        assert_eq!(SchedulingMode::parse("soon"), None);
    }

    #[test]
    fn test_zero_repeat_rejected() {
        let config = SchedulerConfig::earliest().with_repeat_num(0);
        assert!(matches!(config.validate(), Err(SchedError::InvalidConfig(_))));
    }

    #[test]
    fn test_effective_trials() {
        assert_eq!(SchedulerConfig::earliest().with_repeat_num(8).effective_trials(), 1);
        assert_eq!(
            SchedulerConfig::randomized(SchedulingMode::Latest, 8, 1).effective_trials(),
            8
        );

        let single = SchedulerConfig::randomized(SchedulingMode::Earliest, 1, 7);
        assert!(!single.is_randomized());
        assert_eq!(single.effective_trials(), 1);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = SchedulerConfig::randomized(SchedulingMode::Latest, 16, 42);
        let json = config.to_json().unwrap();
        assert_eq!(SchedulerConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_json_partial_and_alias() {
        let config = SchedulerConfig::from_json(r#"{"mode": "alap", "repeat_num": 4}"#).unwrap();
        assert_eq!(config.mode, SchedulingMode::Latest);
        assert_eq!(config.repeat_num, 4);
        assert!(config.parallel);

        assert!(SchedulerConfig::from_json(r#"{"repeat_num": 0}"#).is_err());
    }
}
