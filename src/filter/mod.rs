//! Filter settings, the visibility predicate, and the background engine.

pub mod engine;
pub mod predicate;
pub mod settings;

pub use engine::{
    EngineStats, FilterEngine, FilterJob, FilterMode, FilterOutcome, FilteredView, JobResult,
    UnknownFilterMode,
};
pub use predicate::{filter_records, matches};
pub use settings::{FilterDelta, FilterSettings, FilterSnapshot};
