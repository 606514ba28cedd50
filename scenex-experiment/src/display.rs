use scenex_core::SceneView;

/// The region a trial renders into. A trial owns it exclusively from
/// `mount` until it calls `clear`.
pub trait DisplayRegion {
    /// Replaces whatever the region currently shows.
    fn mount(&mut self, view: SceneView);
    fn mark_responded(&mut self);
    fn disable_choices(&mut self);
    fn clear(&mut self);
    fn view(&self) -> Option<&SceneView>;

    fn is_empty(&self) -> bool {
        self.view().is_none()
    }
}

/// In-memory region read by the renderer each frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SceneDisplay {
    view: Option<SceneView>,
}

impl SceneDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplayRegion for SceneDisplay {
    fn mount(&mut self, view: SceneView) {
        self.view = Some(view);
    }

    fn mark_responded(&mut self) {
        if let Some(view) = &mut self.view {
            view.responded = true;
        }
    }

    fn disable_choices(&mut self) {
        if let Some(view) = &mut self.view {
            view.disable_all();
        }
    }

    fn clear(&mut self) {
        self.view = None;
    }

    fn view(&self) -> Option<&SceneView> {
        self.view.as_ref()
    }
}
