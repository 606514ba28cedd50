use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of question asked about a scene. Decides which image is shown and
/// which buttons are offered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PromptType {
    /// Choose one of the labeled referents.
    Pick,
    /// Count referents, answered with a number from zero to the referent count.
    Count,
    /// Yes/No judgement over the arrow-annotated frame.
    Confirm,
    /// Any tag this crate does not know. Kept verbatim so it round-trips.
    Other(String),
}

impl PromptType {
    pub fn as_str(&self) -> &str {
        match self {
            PromptType::Pick => "pick",
            PromptType::Count => "count",
            PromptType::Confirm => "confirm",
            PromptType::Other(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, PromptType::Other(_))
    }
}

impl Default for PromptType {
    fn default() -> Self {
        PromptType::Other(String::new())
    }
}

impl From<String> for PromptType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "pick" => PromptType::Pick,
            "count" => PromptType::Count,
            "confirm" => PromptType::Confirm,
            _ => PromptType::Other(tag),
        }
    }
}

impl From<&str> for PromptType {
    fn from(tag: &str) -> Self {
        PromptType::from(tag.to_string())
    }
}

impl From<PromptType> for String {
    fn from(prompt_type: PromptType) -> Self {
        match prompt_type {
            PromptType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PromptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
