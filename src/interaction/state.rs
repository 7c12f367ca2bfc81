use eframe::egui::Pos2;

use crate::catalog::StageId;

use super::transition::Phase;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    pub(super) hovered: Option<StageId>,
    pub(super) open: Option<StageId>,
    pub(super) tooltip_position: Option<Pos2>,
}

impl InteractionState {
    pub fn hovered(&self) -> Option<&StageId> {
        self.hovered.as_ref()
    }

    pub fn open(&self) -> Option<&StageId> {
        self.open.as_ref()
    }

    pub fn tooltip_position(&self) -> Option<Pos2> {
        self.tooltip_position
    }

    pub fn phase(&self) -> Phase {
        match (&self.open, &self.hovered) {
            (Some(id), _) => Phase::Open(id.clone()),
            (None, Some(id)) => Phase::Hovered(id.clone()),
            (None, None) => Phase::Idle,
        }
    }

    pub fn render_state(&self) -> RenderState {
        match (&self.open, &self.hovered, self.tooltip_position) {
            (Some(id), _, position) => RenderState::Open {
                stage_id: id.clone(),
                position,
            },
            (None, Some(id), Some(position)) => RenderState::Hovered {
                stage_id: id.clone(),
                position,
            },
            _ => RenderState::Idle,
        }
    }

    pub fn invariants_hold(&self) -> bool {
        let open_implies_hover = self.open.is_none() || self.hovered == self.open;
        let tooltip_implies_hover = self.tooltip_position.is_none() || self.hovered.is_some();
        open_implies_hover && tooltip_implies_hover
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RenderState {
    Idle,
    Hovered { stage_id: StageId, position: Pos2 },
    Open {
        stage_id: StageId,
        position: Option<Pos2>,
    },
}

impl RenderState {
    pub fn stage_id(&self) -> Option<&StageId> {
        match self {
            Self::Idle => None,
            Self::Hovered { stage_id, .. } | Self::Open { stage_id, .. } => Some(stage_id),
        }
    }

    pub fn is_active(&self, id: &StageId) -> bool {
        self.stage_id() == Some(id)
    }

    pub fn tooltip(&self) -> Option<(&StageId, Pos2)> {
        match self {
            Self::Hovered { stage_id, position } => Some((stage_id, *position)),
            _ => None,
        }
    }

    pub fn open_stage(&self) -> Option<&StageId> {
        match self {
            Self::Open { stage_id, .. } => Some(stage_id),
            _ => None,
        }
    }
}
