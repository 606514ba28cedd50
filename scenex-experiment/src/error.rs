use scenex_core::PromptType;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExperimentError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode results")]
    Encode(#[source] serde_json::Error),
    #[error("scene {scene:?} has no prompt template for {prompt_type}")]
    MissingPrompt {
        scene: String,
        prompt_type: PromptType,
    },
    #[error("no relation could be drawn for the {prompt_type} part")]
    NoRelation { prompt_type: PromptType },
}
