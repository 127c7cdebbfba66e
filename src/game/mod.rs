//! Quest data model, check evaluation, and the quest state machine.
//!
//! The flow per turn: the session hands an observed [`CommandOutcome`] to
//! the [`QuestEngine`], which resolves the active quest, dispatches its
//! checks through the [`CheckRegistry`], and returns [`EngineEvent`]s for
//! the presentation layer to narrate.

pub mod engine;
pub mod errors;
pub mod loader;
pub mod progress;
pub mod registry;
pub mod types;

pub use engine::{EngineState, ObjectiveRow, QuestEngine, QuestLogView};
pub use errors::{EvalError, GameError};
pub use loader::{load_catalog, write_starter_quests};
pub use progress::SaveState;
pub use registry::{CheckFn, CheckRegistry, EvalContext};
pub use types::{
    CheckArgs, CheckValue, CommandOutcome, Condition, EngineEvent, GatedQuest, Objective,
    PathKind, Quest, SequentialQuest,
};
