pub mod builder;
pub mod log;
pub mod record;

pub use builder::{BuilderError, BuilderStage, FacingTarget, MoveBuilder, StagedMove};
pub use log::{Notation, NotationError};
pub use record::{Action, MoveRecord};
