use eframe::egui::Id;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusRestore {
    trigger: Option<Id>,
}

impl FocusRestore {
    pub fn resolve(self, is_attached: impl Fn(Id) -> bool, fallback: Id) -> Id {
        match self.trigger {
            Some(id) if is_attached(id) => id,
            _ => fallback,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusRequest {
    DrawerDismiss,
    Restore(FocusRestore),
}

#[derive(Clone, Debug, Default)]
pub(super) struct FocusTracker {
    trigger: Option<Id>,
    pending: Option<FocusRequest>,
}

impl FocusTracker {
    /// Re-opening onto another stage keeps the trigger that opened the
    /// drawer in the first place.
    pub(super) fn opened(&mut self, trigger: Option<Id>, was_open: bool) {
        if !was_open {
            self.trigger = trigger;
        }
        self.pending = Some(FocusRequest::DrawerDismiss);
    }

    pub(super) fn closed(&mut self) {
        self.pending = Some(FocusRequest::Restore(FocusRestore {
            trigger: self.trigger.take(),
        }));
    }

    pub(super) fn take(&mut self) -> Option<FocusRequest> {
        self.pending.take()
    }
}
