pub mod choice;
pub mod phase;
pub mod prompt;
pub mod response;
pub mod trial;
pub mod view;

pub use choice::{Choice, ChoiceSet};
pub use phase::{Phase, SessionPhase};
pub use prompt::PromptType;
pub use response::ResponseRecord;
pub use trial::{Referents, TrialSpec};
pub use view::{asset_relative, asset_url, ChoiceButton, SceneView, RENDER_PREFIX};
