pub mod generation;
pub mod line_computation;
pub mod model;
pub mod prorata;
pub mod revaluation;
pub mod schedule;

pub use model::{
    ComputationMethod, DepreciationPlan, FixedAsset, FixedAssetCategory, FixedAssetLine,
    LineStatus, ScheduleKind,
};
