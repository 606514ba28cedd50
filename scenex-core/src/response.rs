use crate::choice::Choice;
use crate::prompt::PromptType;
use crate::trial::{Referents, TrialSpec};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of one trial as handed back to the host.
///
/// `choice` and `rt` are both `None` until the resolving click and both
/// `Some` afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub prompt_type: PromptType,
    pub prompt: String,

    pub scene: Value,
    pub frame: Value,
    pub relation: Value,
    pub referents: Referents,

    /// Reaction time in milliseconds.
    pub rt: Option<f64>,
    pub choice: Option<Choice>,
}

impl ResponseRecord {
    /// Unanswered record carrying the trial's metadata.
    pub fn pending(spec: &TrialSpec) -> Self {
        Self {
            prompt_type: spec.prompt_type.clone(),
            prompt: spec.prompt.clone(),
            scene: spec.scene.clone(),
            frame: spec.frame.clone(),
            relation: spec.relation.clone(),
            referents: spec.referents.clone(),
            rt: None,
            choice: None,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.choice.is_some() && self.rt.is_some()
    }
}
