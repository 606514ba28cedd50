//! Building trial lists from rendered scene frames.
//!
//! Each rendered frame comes with a metadata file describing its referents,
//! image paths and the prompt templates of its scene. A plan samples frames
//! from one catalog per part, fills in the prompt and shuffles the result.

use crate::error::ExperimentError;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use scenex_core::{PromptType, Referents, TrialSpec};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct StimuliFile {
    stimuli: Vec<TrialSpec>,
}

/// Reads a ready-made trial list of the form `{"stimuli": [...]}`.
pub fn load_stimuli_file(path: &Path) -> Result<Vec<TrialSpec>, ExperimentError> {
    let text = fs::read_to_string(path).map_err(|source| ExperimentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: StimuliFile = serde_json::from_str(&text).map_err(|source| ExperimentError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), trials = file.stimuli.len(), "stimuli loaded");
    Ok(file.stimuli)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneData {
    /// Prompt template per prompt type, with `{relation}` and `{ground}`
    /// placeholders.
    #[serde(default)]
    pub prompts: BTreeMap<String, String>,
    #[serde(default)]
    pub ground: String,
}

/// Metadata written next to every rendered frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub scene: String,
    pub frame: String,
    #[serde(default)]
    pub referents: Referents,
    #[serde(default)]
    pub frame_path: Option<String>,
    #[serde(default)]
    pub labeled_frame_path: Option<String>,
    #[serde(default)]
    pub arrow_frame_path: Option<String>,
    #[serde(default)]
    pub scene_data: SceneData,
}

/// All frames of one scene found in a render directory, keyed by
/// `(scene, frame)`.
#[derive(Debug, Clone, Default)]
pub struct SceneCatalog {
    frames: BTreeMap<(String, String), FrameRecord>,
}

impl SceneCatalog {
    /// Loads every `<scene_name>.*.json` in `dir`. Files are read in name
    /// order and a later file replaces an earlier one for the same frame.
    pub fn load(dir: &Path, scene_name: &str) -> Result<Self, ExperimentError> {
        let read_err = |source| ExperimentError::Read {
            path: dir.to_path_buf(),
            source,
        };
        let prefix = format!("{scene_name}.");
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(read_err)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix) && name.ends_with(".json"))
            })
            .collect();
        paths.sort();

        let mut catalog = SceneCatalog::default();
        for path in paths {
            let text = fs::read_to_string(&path).map_err(|source| ExperimentError::Read {
                path: path.clone(),
                source,
            })?;
            let record: FrameRecord =
                serde_json::from_str(&text).map_err(|source| ExperimentError::Json {
                    path: path.clone(),
                    source,
                })?;
            debug!(path = %path.display(), frame = %record.frame, "frame metadata");
            catalog.insert(scene_name, record);
        }

        if catalog.is_empty() {
            warn!(dir = %dir.display(), scene = scene_name, "no frames found");
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, scene_name: &str, record: FrameRecord) {
        self.frames
            .insert((scene_name.to_string(), record.frame.clone()), record);
    }

    pub fn frames(&self) -> impl Iterator<Item = &FrameRecord> {
        self.frames.values()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Turns one frame into a trial asking `prompt_type` about `relation`.
pub fn prepare_trial(
    frame: &FrameRecord,
    relation: &str,
    prompt_type: PromptType,
) -> Result<TrialSpec, ExperimentError> {
    let template = frame
        .scene_data
        .prompts
        .get(prompt_type.as_str())
        .ok_or_else(|| ExperimentError::MissingPrompt {
            scene: frame.scene.clone(),
            prompt_type: prompt_type.clone(),
        })?;
    let prompt = template
        .replace("{relation}", relation)
        .replace("{ground}", &frame.scene_data.ground);

    Ok(TrialSpec {
        prompt_type,
        prompt,
        referents: frame.referents.clone(),
        scene: Value::String(frame.scene.clone()),
        frame: Value::String(frame.frame.clone()),
        relation: Value::String(relation.to_string()),
        labeled_frame_path: frame.labeled_frame_path.clone(),
        frame_path: frame.frame_path.clone(),
        arrow_frame_path: frame.arrow_frame_path.clone(),
    })
}

/// One block of trials drawn from a single catalog.
#[derive(Debug, Clone)]
pub struct PartPlan {
    pub catalog: SceneCatalog,
    pub prompt_type: PromptType,
    /// Relation phrases with their draw weights.
    pub relations: Vec<(String, f64)>,
    pub max_requests: usize,
}

#[derive(Debug, Clone, Default)]
pub struct StimulusPlan {
    pub parts: Vec<PartPlan>,
}

impl StimulusPlan {
    pub const MAX_REQUESTS_PER_PART: usize = 3;

    /// Confirmation trials over "in front of" (mostly) or "near", then
    /// counting trials over "near".
    pub fn two_part(confirm: SceneCatalog, count: SceneCatalog) -> Self {
        Self {
            parts: vec![
                PartPlan {
                    catalog: confirm,
                    prompt_type: PromptType::Confirm,
                    relations: vec![("in front of".into(), 0.75), ("near".into(), 0.25)],
                    max_requests: Self::MAX_REQUESTS_PER_PART,
                },
                PartPlan {
                    catalog: count,
                    prompt_type: PromptType::Count,
                    relations: vec![("near".into(), 1.0)],
                    max_requests: Self::MAX_REQUESTS_PER_PART,
                },
            ],
        }
    }
}

/// Samples each part without replacement and shuffles the combined list.
pub fn build_stimuli<R: Rng + ?Sized>(
    plan: &StimulusPlan,
    rng: &mut R,
) -> Result<Vec<TrialSpec>, ExperimentError> {
    let mut trials = Vec::new();

    for part in &plan.parts {
        let frames: Vec<&FrameRecord> = part.catalog.frames().collect();
        if frames.len() < part.max_requests {
            warn!(
                prompt_type = %part.prompt_type,
                available = frames.len(),
                requested = part.max_requests,
                "fewer frames than requested"
            );
        }
        let picked: Vec<&FrameRecord> = frames
            .choose_multiple(rng, part.max_requests)
            .copied()
            .collect();

        for frame in picked {
            let (relation, _) = part
                .relations
                .choose_weighted(rng, |(_, weight)| *weight)
                .map_err(|_| ExperimentError::NoRelation {
                    prompt_type: part.prompt_type.clone(),
                })?;
            trials.push(prepare_trial(frame, relation, part.prompt_type.clone())?);
        }
    }

    trials.shuffle(rng);
    info!(trials = trials.len(), "stimuli built");
    Ok(trials)
}
