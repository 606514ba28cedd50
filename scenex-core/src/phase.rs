/// Outer stage of a session around the trial block.
///
/// Clicks only reach a trial while `is_trials()` holds.
pub trait Phase: Copy + Clone + PartialEq + Send + Sync + std::fmt::Debug + Default {
    fn next(&self) -> Option<Self>;

    fn is_welcome(&self) -> bool {
        false
    }
    fn is_trials(&self) -> bool {
        false
    }
    fn is_debrief(&self) -> bool {
        false
    }
}

#[derive(Copy, Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Welcome,
    Trials,
    Debrief,
}

impl Phase for SessionPhase {
    fn next(&self) -> Option<Self> {
        use SessionPhase::*;
        Some(match self {
            Welcome => Trials,
            Trials => Debrief,
            Debrief => return None,
        })
    }

    fn is_welcome(&self) -> bool {
        matches!(self, SessionPhase::Welcome)
    }

    fn is_trials(&self) -> bool {
        matches!(self, SessionPhase::Trials)
    }

    fn is_debrief(&self) -> bool {
        matches!(self, SessionPhase::Debrief)
    }
}
