use crate::prompt::PromptType;
use crate::trial::Referents;
use serde::{Deserialize, Serialize};
use std::fmt;

const CONFIRM_LABELS: [&str; 2] = ["Yes", "No"];

/// Ordered button labels for one trial. Rebuilt for every trial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceSet {
    labels: Vec<String>,
}

impl ChoiceSet {
    /// Derives the labels from the prompt type and the referent keys.
    ///
    /// `pick` offers the referent keys in their stored order, `count` offers
    /// `"0"..="N"` for `N` referents and `confirm` offers `Yes`/`No`. Unknown
    /// prompt types fall back to the referent keys.
    pub fn derive(prompt_type: &PromptType, referents: &Referents) -> Self {
        let labels = match prompt_type {
            PromptType::Count => (0..=referents.len()).map(|n| n.to_string()).collect(),
            PromptType::Confirm => CONFIRM_LABELS.iter().map(|s| s.to_string()).collect(),
            PromptType::Pick | PromptType::Other(_) => referents.keys().cloned().collect(),
        };
        Self { labels }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a ChoiceSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}

/// The recorded answer. Serialized as a bare JSON number for counts and a
/// string otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Choice {
    Count(u64),
    Label(String),
}

impl Choice {
    /// Coerces a clicked label into the recorded choice. Only `count` trials
    /// produce numbers; a label that does not parse stays a label.
    pub fn from_label(prompt_type: &PromptType, label: &str) -> Self {
        match prompt_type {
            PromptType::Count => label
                .trim()
                .parse::<u64>()
                .map(Choice::Count)
                .unwrap_or_else(|_| Choice::Label(label.to_string())),
            _ => Choice::Label(label.to_string()),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Count(n) => write!(f, "{n}"),
            Choice::Label(label) => f.write_str(label),
        }
    }
}
