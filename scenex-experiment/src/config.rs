use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Blank screen between a response and the next trial.
    pub inter_trial_interval_ms: u64,
    pub results_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inter_trial_interval_ms: 1000,
            results_path: PathBuf::from("scene_choice_results.json"),
        }
    }
}
