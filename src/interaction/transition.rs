use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::StageId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[default]
    EaseOutCubic,
    EaseInOutCubic,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 };
        match self {
            Self::Linear => t,
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) * 0.5
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Hovered(StageId),
    Open(StageId),
}

impl Phase {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    pub duration: Duration,
    pub easing: Easing,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionTimings {
    pub hover: Duration,
    pub drawer: Duration,
    pub easing: Easing,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            hover: Duration::from_millis(120),
            drawer: Duration::from_millis(220),
            easing: Easing::default(),
        }
    }
}

impl TransitionTimings {
    pub fn between(&self, from: Phase, to: Phase) -> Transition {
        let duration = if from.is_open() || to.is_open() {
            self.drawer
        } else {
            self.hover
        };
        Transition {
            from,
            to,
            duration,
            easing: self.easing,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TransitionLog {
    entries: VecDeque<Transition>,
    capacity: usize,
}

impl TransitionLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, transition: Transition) {
        self.entries.push_back(transition);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn last(&self) -> Option<&Transition> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.entries.iter()
    }
}
