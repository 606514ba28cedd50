use crate::config::SessionConfig;
use crate::display::{DisplayRegion, SceneDisplay};
use crate::presenter::{RunningTrial, TrialHost, TrialPlugin};
use crate::results::ResultSummary;
use scenex_core::{Phase, ResponseRecord, SessionPhase, TrialSpec};
use scenex_timing::{TimeoutQueue, Timer};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StartPressed,
    /// Click on the button tagged with this label.
    Click(String),
    NextTrial,
    PhaseComplete,
    ExitRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostTimeout {
    NextTrial,
}

/// The half of the session a running trial talks to.
#[derive(Debug, Default)]
struct HostLink {
    timeouts: TimeoutQueue<HostTimeout>,
    finished: Option<ResponseRecord>,
}

impl TrialHost for HostLink {
    fn clear_all_timeouts(&mut self) {
        let cleared = self.timeouts.clear_all();
        if cleared > 0 {
            debug!(cleared, "pending timeouts cleared");
        }
    }

    fn finish_trial(&mut self, record: ResponseRecord) {
        if self.finished.is_some() {
            warn!("trial finished twice before the host collected it; keeping the first");
            return;
        }
        self.finished = Some(record);
    }
}

/// Host sequencer: feeds trials to the plugin one at a time and collects
/// their records.
pub struct Session<Pl, T, P = SessionPhase>
where
    Pl: TrialPlugin,
    T: Timer,
    P: Phase,
{
    pub phase: P,
    pub config: SessionConfig,
    pub timer: T,
    plugin: Pl,
    queue: VecDeque<TrialSpec>,
    total_trials: usize,
    current: Option<Pl::Trial>,
    display: SceneDisplay,
    host: HostLink,
    results: Vec<ResponseRecord>,
    exit_requested: bool,
}

impl<Pl, T, P> Session<Pl, T, P>
where
    Pl: TrialPlugin,
    T: Timer,
    P: Phase,
{
    pub fn new(config: SessionConfig, plugin: Pl, timer: T, trials: Vec<TrialSpec>) -> Self {
        Self {
            phase: P::default(),
            config,
            timer,
            plugin,
            total_trials: trials.len(),
            queue: trials.into(),
            current: None,
            display: SceneDisplay::new(),
            host: HostLink::default(),
            results: Vec::new(),
            exit_requested: false,
        }
    }

    pub fn advance_phase(&mut self) -> bool {
        let Some(next) = self.phase.next() else {
            return false;
        };
        info!(from = ?self.phase, to = ?next, "phase change");
        self.phase = next;
        if next.is_debrief() {
            self.current = None;
            self.display.clear();
            ResultSummary::from_records(&self.results).log();
        }
        true
    }

    /// Polls host timers. The returned events are meant to be fed back
    /// through [`Session::handle_event`].
    pub fn update(&mut self) -> Vec<SessionEvent> {
        let now = self.timer.now();
        self.host
            .timeouts
            .drain_due(now)
            .into_iter()
            .map(|timeout| match timeout {
                HostTimeout::NextTrial => SessionEvent::NextTrial,
            })
            .collect()
    }

    /// Returns whether the event did anything in the current phase.
    pub fn handle_event(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::ExitRequested => {
                self.exit_requested = true;
                true
            }
            SessionEvent::StartPressed if self.phase.is_welcome() => {
                self.advance_phase();
                self.start_next_trial();
                true
            }
            SessionEvent::StartPressed if self.phase.is_debrief() => {
                self.exit_requested = true;
                true
            }
            SessionEvent::Click(label) if self.phase.is_trials() => self.deliver_click(&label),
            SessionEvent::NextTrial if self.phase.is_trials() => {
                self.start_next_trial();
                true
            }
            SessionEvent::PhaseComplete => self.advance_phase(),
            other => {
                debug!(event = ?other, phase = ?self.phase, "event ignored");
                false
            }
        }
    }

    fn deliver_click(&mut self, label: &str) -> bool {
        let Some(trial) = self.current.as_mut() else {
            debug!(label, "click with no trial on screen");
            return false;
        };
        let resolved = trial.on_click(label, &mut self.display, &mut self.host);
        if let Some(record) = self.host.finished.take() {
            self.complete_trial(record);
        }
        resolved
    }

    fn complete_trial(&mut self, record: ResponseRecord) {
        self.results.push(record);
        self.current = None;

        let due = self
            .timer
            .now()
            .saturating_add(self.config.inter_trial_interval_ms.saturating_mul(1_000_000));
        self.host.timeouts.set_timeout(due, HostTimeout::NextTrial);
        debug!(
            completed = self.results.len(),
            remaining = self.queue.len(),
            "trial complete"
        );
    }

    fn start_next_trial(&mut self) {
        match self.queue.pop_front() {
            Some(spec) => {
                let number = self.total_trials - self.queue.len();
                info!(
                    plugin = self.plugin.name(),
                    trial = number,
                    total = self.total_trials,
                    "trial started"
                );
                self.current = Some(self.plugin.present(spec, &mut self.display));
            }
            None => {
                self.handle_event(SessionEvent::PhaseComplete);
            }
        }
    }

    pub fn current_phase(&self) -> &P {
        &self.phase
    }

    pub fn display(&self) -> &SceneDisplay {
        &self.display
    }

    pub fn current_trial(&self) -> Option<&Pl::Trial> {
        self.current.as_ref()
    }

    pub fn results(&self) -> &[ResponseRecord] {
        &self.results
    }

    pub fn pending_timeouts(&self) -> usize {
        self.host.timeouts.len()
    }

    /// `(trial number, total)` while the trial block runs. Between trials
    /// this is still the number of the trial just answered.
    pub fn trial_progress(&self) -> Option<(usize, usize)> {
        if !self.phase.is_trials() {
            return None;
        }
        Some((self.total_trials - self.queue.len(), self.total_trials))
    }

    pub fn should_exit(&self) -> bool {
        self.exit_requested
    }
}
