//! # Shellquest - an interactive terminal tutor
//!
//! Shellquest wraps a real bash session in a scripted story: the player
//! types ordinary shell commands, and a quest engine watches each command's
//! outcome and the resulting system state to decide when tutorial
//! objectives are met.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use shellquest::config::Config;
//! use shellquest::session::GameSession;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml")?;
//!     let mut session = GameSession::new(&config)?;
//!     session.run()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module organization
//!
//! - [`game`] - quest data model, check registry, state machine, loader
//! - [`shell`] - bash command execution and meta-command routing
//! - [`session`] - the interactive turn loop
//! - [`ui`] - mentor-persona narration
//! - [`config`] - configuration management and validation
//! - [`logutil`] - log sanitizing helpers
//!
//! ## Architecture
//!
//! Each turn flows one way:
//!
//! ```text
//! stdin line -> router -> executor (bash) -> CommandOutcome
//!                                                 |
//!                narrator <- EngineEvents <- QuestEngine + CheckRegistry
//! ```
//!
//! The engine is the only component with game logic; everything around it
//! is deliberately thin plumbing.

pub mod config;
pub mod game;
pub mod logutil;
pub mod session;
pub mod shell;
pub mod ui;

pub use game::{
    CheckRegistry, CommandOutcome, EngineEvent, EngineState, GameError, Quest, QuestEngine,
};
