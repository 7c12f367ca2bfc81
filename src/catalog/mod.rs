mod load;
mod parse;
mod stage;

pub use load::{builtin_catalog, catalog_from_json, load_catalog};
pub use stage::{
    BusinessModel, BusinessModelId, SecondaryMetricGroup, Stage, StageCatalog, StageConnections,
    StageId,
};
