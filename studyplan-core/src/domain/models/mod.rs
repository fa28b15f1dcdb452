mod ids;
mod settings;
mod snapshot;
mod study_plan;
mod task;

pub use ids::*;
pub use settings::*;
pub use snapshot::*;
pub use study_plan::*;
pub use task::*;
