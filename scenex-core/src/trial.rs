use crate::choice::ChoiceSet;
use crate::prompt::PromptType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Referent label to descriptor, in the order the labels were written.
pub type Referents = Map<String, Value>;

/// One presentation + response cycle as handed over by the host.
///
/// Decoding never fails on missing fields: absent paths stay `None` and an
/// absent referent map is empty. A spec like that renders without an image
/// or without buttons instead of being rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialSpec {
    #[serde(default)]
    pub prompt_type: PromptType,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub referents: Referents,

    #[serde(default)]
    pub scene: Value,
    #[serde(default)]
    pub frame: Value,
    #[serde(default)]
    pub relation: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labeled_frame_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow_frame_path: Option<String>,
}

impl TrialSpec {
    /// Image shown for this prompt type, relative to the render root.
    pub fn stimulus_path(&self) -> Option<&str> {
        match self.prompt_type {
            PromptType::Pick => self.labeled_frame_path.as_deref(),
            PromptType::Count => self.frame_path.as_deref(),
            PromptType::Confirm => self.arrow_frame_path.as_deref(),
            PromptType::Other(_) => None,
        }
    }

    pub fn choices(&self) -> ChoiceSet {
        ChoiceSet::derive(&self.prompt_type, &self.referents)
    }
}
