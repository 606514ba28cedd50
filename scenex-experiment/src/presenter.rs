//! The `scene-choice` trial: one image, one prompt, one button per choice,
//! resolved by the first click on any of them.

use crate::display::DisplayRegion;
use scenex_core::{asset_url, Choice, ChoiceSet, ResponseRecord, SceneView, TrialSpec};
use scenex_timing::Timer;
use tracing::{debug, info, warn};

/// What a running trial reports back to the host that started it.
pub trait TrialHost {
    /// Cancels every timer the host has pending for the current trial.
    fn clear_all_timeouts(&mut self);
    /// Called exactly once per trial, after the display was cleared.
    fn finish_trial(&mut self, record: ResponseRecord);
}

/// A trial type the host can run. Handed to the host as a value; there is
/// no global plugin table.
pub trait TrialPlugin {
    type Trial: RunningTrial;

    fn name(&self) -> &'static str;
    fn present<D: DisplayRegion>(&self, spec: TrialSpec, display: &mut D) -> Self::Trial;
}

pub trait RunningTrial {
    /// Delivers a click on the button tagged `label`. Returns true only for
    /// the click that resolved the trial.
    fn on_click<D, H>(&mut self, label: &str, display: &mut D, host: &mut H) -> bool
    where
        D: DisplayRegion,
        H: TrialHost;

    fn is_resolved(&self) -> bool;
    fn choices(&self) -> &ChoiceSet;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialStage {
    AwaitingResponse,
    Resolved,
}

/// Factory for scene-choice trials.
#[derive(Debug, Clone)]
pub struct ScenePresenter<T: Timer> {
    timer: T,
}

impl<T: Timer> ScenePresenter<T> {
    pub const NAME: &'static str = "scene-choice";

    pub fn new(timer: T) -> Self {
        Self { timer }
    }
}

impl<T: Timer> TrialPlugin for ScenePresenter<T> {
    type Trial = SceneTrial<T>;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn present<D: DisplayRegion>(&self, spec: TrialSpec, display: &mut D) -> SceneTrial<T> {
        let choices = spec.choices();
        let image = spec.stimulus_path().map(asset_url);
        if image.is_none() {
            warn!(prompt_type = %spec.prompt_type, "trial has no stimulus image");
        }
        if choices.is_empty() {
            warn!(prompt_type = %spec.prompt_type, "trial has no choices and cannot be answered");
        }

        display.mount(SceneView::new(image, spec.prompt.clone(), &choices));
        let start = self.timer.now();

        debug!(
            prompt_type = %spec.prompt_type,
            choices = ?choices.labels(),
            start_ns = start,
            "trial presented"
        );

        SceneTrial {
            timer: self.timer.clone(),
            start,
            record: ResponseRecord::pending(&spec),
            choices,
            stage: TrialStage::AwaitingResponse,
        }
    }
}

/// A presented scene-choice trial waiting for its one click.
#[derive(Debug)]
pub struct SceneTrial<T: Timer> {
    timer: T,
    start: u64,
    choices: ChoiceSet,
    record: ResponseRecord,
    stage: TrialStage,
}

impl<T: Timer> SceneTrial<T> {
    pub fn stage(&self) -> TrialStage {
        self.stage
    }

    pub fn record(&self) -> &ResponseRecord {
        &self.record
    }
}

impl<T: Timer> RunningTrial for SceneTrial<T> {
    fn on_click<D, H>(&mut self, label: &str, display: &mut D, host: &mut H) -> bool
    where
        D: DisplayRegion,
        H: TrialHost,
    {
        if self.stage == TrialStage::Resolved {
            debug!(label, "click after resolution ignored");
            return false;
        }
        if !self.choices.contains(label) {
            warn!(label, "click on a label this trial does not offer");
            return false;
        }

        let rt = self.timer.elapsed(self.start);
        self.record.rt = Some(rt.as_secs_f64() * 1e3);
        self.record.choice = Some(Choice::from_label(&self.record.prompt_type, label));
        self.stage = TrialStage::Resolved;

        display.mark_responded();
        display.disable_choices();
        host.clear_all_timeouts();
        display.clear();

        info!(
            prompt_type = %self.record.prompt_type,
            choice = %label,
            rt_ms = rt.as_secs_f64() * 1e3,
            "response recorded"
        );
        host.finish_trial(self.record.clone());
        true
    }

    fn is_resolved(&self) -> bool {
        self.stage == TrialStage::Resolved
    }

    fn choices(&self) -> &ChoiceSet {
        &self.choices
    }
}
