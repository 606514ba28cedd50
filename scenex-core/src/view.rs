use crate::choice::ChoiceSet;
use serde::{Deserialize, Serialize};

/// URL prefix under which rendered scene images are served.
pub const RENDER_PREFIX: &str = "/renders/";

pub fn asset_url(path: &str) -> String {
    format!("{RENDER_PREFIX}{path}")
}

/// Inverse of [`asset_url`]. Returns `None` for URLs outside the render root.
pub fn asset_relative(url: &str) -> Option<&str> {
    url.strip_prefix(RENDER_PREFIX)
}

/// One selectable button, tagged with the label it reports when clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceButton {
    pub label: String,
    pub disabled: bool,
}

/// Everything mounted into the display region for one trial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneView {
    /// Asset URL of the stimulus image; `None` when the trial has no image
    /// for its prompt type.
    pub image: Option<String>,
    /// Set once a response was recorded.
    pub responded: bool,
    pub prompt: String,
    pub buttons: Vec<ChoiceButton>,
}

impl SceneView {
    pub fn new(image: Option<String>, prompt: impl Into<String>, choices: &ChoiceSet) -> Self {
        Self {
            image,
            responded: false,
            prompt: prompt.into(),
            buttons: choices
                .iter()
                .map(|label| ChoiceButton {
                    label: label.to_string(),
                    disabled: false,
                })
                .collect(),
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.buttons.iter().map(|b| b.label.as_str())
    }

    pub fn button(&self, index: usize) -> Option<&ChoiceButton> {
        self.buttons.get(index)
    }

    pub fn disable_all(&mut self) {
        for button in &mut self.buttons {
            button.disabled = true;
        }
    }

    pub fn all_disabled(&self) -> bool {
        self.buttons.iter().all(|b| b.disabled)
    }
}
