pub mod config;
pub mod display;
pub mod error;
pub mod presenter;
pub mod results;
pub mod session;
pub mod stimuli;

pub use config::SessionConfig;
pub use display::{DisplayRegion, SceneDisplay};
pub use error::ExperimentError;
pub use presenter::{RunningTrial, ScenePresenter, SceneTrial, TrialHost, TrialPlugin, TrialStage};
pub use results::{write_results, ResultSummary};
pub use session::{Session, SessionEvent};
pub use stimuli::{
    build_stimuli, load_stimuli_file, prepare_trial, FrameRecord, PartPlan, SceneCatalog,
    StimulusPlan,
};
