use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::{BusinessModel, BusinessModelId, Stage, StageCatalog, StageId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageSlot {
    Funnel(usize),
    Bridge,
    Flywheel(usize),
}

#[derive(Clone, Debug, Default)]
pub struct StageLookup {
    slots: HashMap<StageId, StageSlot>,
}

impl StageLookup {
    fn build(catalog: &StageCatalog, model: BusinessModelId) -> Self {
        let mut slots = HashMap::with_capacity(catalog.stage_count(model));
        for (index, stage) in catalog.funnel.iter().enumerate() {
            slots.insert(stage.id.clone(), StageSlot::Funnel(index));
        }
        slots.insert(catalog.bridge.id.clone(), StageSlot::Bridge);
        for (index, stage) in catalog.flywheel_for(model).iter().enumerate() {
            slots.insert(stage.id.clone(), StageSlot::Flywheel(index));
        }
        Self { slots }
    }

    pub fn slot(&self, id: &StageId) -> Option<StageSlot> {
        self.slots.get(id).copied()
    }

    pub fn contains(&self, id: &StageId) -> bool {
        self.slots.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelSwitch {
    pub previous: BusinessModelId,
    pub current: BusinessModelId,
}

impl ModelSwitch {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

pub struct DatasetSwitcher {
    catalog: Arc<StageCatalog>,
    model: BusinessModelId,
    lookup: StageLookup,
    revision: u64,
}

impl DatasetSwitcher {
    pub fn new(catalog: Arc<StageCatalog>, model: BusinessModelId) -> Self {
        let lookup = StageLookup::build(&catalog, model);
        Self {
            catalog,
            model,
            lookup,
            revision: 0,
        }
    }

    pub fn catalog(&self) -> &StageCatalog {
        &self.catalog
    }

    pub fn model(&self) -> BusinessModelId {
        self.model
    }

    pub fn model_info(&self) -> Option<&BusinessModel> {
        self.catalog.model(self.model)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn lookup(&self) -> &StageLookup {
        &self.lookup
    }

    pub fn select(&mut self, model: BusinessModelId) -> ModelSwitch {
        let switch = ModelSwitch {
            previous: self.model,
            current: model,
        };
        if !switch.changed() {
            return switch;
        }

        self.model = model;
        self.lookup = StageLookup::build(&self.catalog, model);
        self.revision += 1;
        tracing::debug!(
            from = %switch.previous,
            to = %switch.current,
            stages = self.lookup.len(),
            "rebuilt stage lookup"
        );
        switch
    }

    pub fn funnel(&self) -> &[Stage] {
        &self.catalog.funnel
    }

    pub fn bridge(&self) -> &Stage {
        &self.catalog.bridge
    }

    pub fn flywheel(&self) -> &[Stage] {
        self.catalog.flywheel_for(self.model)
    }

    pub fn get(&self, id: &StageId) -> Option<&Stage> {
        match self.lookup.slot(id)? {
            StageSlot::Funnel(index) => self.funnel().get(index),
            StageSlot::Bridge => Some(self.bridge()),
            StageSlot::Flywheel(index) => self.flywheel().get(index),
        }
    }

    pub fn contains(&self, id: &StageId) -> bool {
        self.lookup.contains(id)
    }

    pub fn stages(&self) -> impl Iterator<Item = &Stage> {
        self.funnel()
            .iter()
            .chain(std::iter::once(self.bridge()))
            .chain(self.flywheel().iter())
    }

    /// Resolves a free-text connection entry to a stage in the active set.
    /// Entries may name a stage id, metric id or label.
    pub fn resolve_reference(&self, reference: &str) -> Option<&Stage> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        if let Some(stage) = self.get(&StageId::from(reference)) {
            return Some(stage);
        }
        self.stages().find(|stage| {
            stage.metric_id.eq_ignore_ascii_case(reference)
                || stage.label.eq_ignore_ascii_case(reference)
        })
    }
}
