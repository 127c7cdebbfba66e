//! Quest system data structures.
//!
//! Everything here is built once at catalog-load time from declarative quest
//! files. Completion flags are monotonic: the engine flips them false→true
//! exactly once and nothing ever resets them.

use serde::{Deserialize, Serialize};

/// Scalar produced by a check predicate, compared against a condition's
/// expected value. Untagged so quest files can write `true`, `7`, or
/// `"eth0"` directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckValue {
    Bool(bool),
    Number(i64),
    Text(String),
}

impl CheckValue {
    /// Objectives carry no explicit expected value; they are satisfied when
    /// their predicate observes `Bool(true)`.
    pub fn is_true(&self) -> bool {
        matches!(self, CheckValue::Bool(true))
    }
}

impl From<bool> for CheckValue {
    fn from(value: bool) -> Self {
        CheckValue::Bool(value)
    }
}

/// Discriminator for `path_exists` checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    File,
    Directory,
}

/// Closed parameter records, one variant per registered check kind. The
/// serde tag doubles as the registry key, so a quest file can only name
/// checks that exist and required parameters are enforced at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckArgs {
    /// First whitespace token of the observed command, lowercased, must
    /// equal `verb`.
    CommandRun { verb: String },
    /// Path (with `~` expansion) must exist as the given kind.
    PathExists { path: String, kind: PathKind },
    /// Path's permission bits formatted as a 3-digit octal string must
    /// equal `mode`.
    PermissionCheck { path: String, mode: String },
    /// Path's owning account name must equal `owner`.
    OwnerCheck { path: String, owner: String },
    /// Routing table must contain a route to `target` via `interface`.
    NetworkRouteCheck { target: String, interface: String },
}

impl CheckArgs {
    /// Registry key for this check's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckArgs::CommandRun { .. } => "command_run",
            CheckArgs::PathExists { .. } => "path_exists",
            CheckArgs::PermissionCheck { .. } => "permission_check",
            CheckArgs::OwnerCheck { .. } => "owner_check",
            CheckArgs::NetworkRouteCheck { .. } => "network_route_check",
        }
    }
}

fn default_expected() -> CheckValue {
    CheckValue::Bool(true)
}

/// One declarative predicate invocation with expected value and feedback
/// text. Used by gated quests for prerequisite and completion bundles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub check: CheckArgs,
    #[serde(default = "default_expected")]
    pub expected: CheckValue,
    pub failure_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
}

impl Condition {
    pub fn new(check: CheckArgs, failure_message: &str) -> Self {
        Self {
            check,
            expected: default_expected(),
            failure_message: failure_message.to_string(),
            success_message: None,
        }
    }

    pub fn expecting(mut self, expected: CheckValue) -> Self {
        self.expected = expected;
        self
    }
}

fn default_hint() -> String {
    "No hint recorded for this step.".to_string()
}

fn default_success_message() -> String {
    "Objective complete.".to_string()
}

/// A single verifiable unit of player progress within a sequential quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub id: String,
    pub description: String,
    pub check: CheckArgs,
    #[serde(default = "default_hint")]
    pub hint: String,
    #[serde(default = "default_success_message")]
    pub success_message: String,
    /// Mutated only by the engine, false→true at most once.
    #[serde(default)]
    pub completed: bool,
}

impl Objective {
    pub fn new(id: &str, description: &str, check: CheckArgs) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            check,
            hint: default_hint(),
            success_message: default_success_message(),
            completed: false,
        }
    }

    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hint = hint.to_string();
        self
    }

    pub fn with_success_message(mut self, message: &str) -> Self {
        self.success_message = message.to_string();
        self
    }
}

/// Ordered multi-objective quest. Objectives complete strictly in declared
/// order; the quest is complete exactly when every objective is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequentialQuest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub completed: bool,
}

impl SequentialQuest {
    pub fn new(id: &str, title: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            objectives: Vec::new(),
            completed: false,
        }
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objectives.push(objective);
        self
    }

    /// The earliest uncompleted objective, i.e. the only one the engine
    /// evaluates this turn.
    pub fn active_objective(&self) -> Option<&Objective> {
        self.objectives.iter().find(|o| !o.completed)
    }

    pub fn all_objectives_complete(&self) -> bool {
        !self.objectives.is_empty() && self.objectives.iter().all(|o| o.completed)
    }
}

/// Flat prerequisite/completion quest. No per-step tracking: the completion
/// bundle is evaluated atomically and the quest is all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatedQuest {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub prerequisite_checks: Vec<Condition>,
    pub completion_checks: Vec<Condition>,
    /// Set once the prerequisite bundle has passed; never re-evaluated after.
    #[serde(default)]
    pub started: bool,
    #[serde(default)]
    pub completed: bool,
}

impl GatedQuest {
    pub fn new(id: &str, title: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            prerequisite_checks: Vec::new(),
            completion_checks: Vec::new(),
            started: false,
            completed: false,
        }
    }

    pub fn with_prerequisite(mut self, condition: Condition) -> Self {
        self.prerequisite_checks.push(condition);
        self
    }

    pub fn with_completion(mut self, condition: Condition) -> Self {
        self.completion_checks.push(condition);
        self
    }
}

/// The two quest shapes behind one union. Quest files select the variant by
/// structure (`[[objectives]]` vs `[[completion_checks]]`); the engine
/// drives both through the same observe/advance path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quest {
    Sequential(SequentialQuest),
    Gated(GatedQuest),
}

impl Quest {
    pub fn id(&self) -> &str {
        match self {
            Quest::Sequential(q) => &q.id,
            Quest::Gated(q) => &q.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Quest::Sequential(q) => &q.title,
            Quest::Gated(q) => &q.title,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Quest::Sequential(q) => &q.description,
            Quest::Gated(q) => &q.description,
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            Quest::Sequential(q) => q.completed,
            Quest::Gated(q) => q.completed,
        }
    }

    /// Every check this quest can ever evaluate, for load-time validation
    /// against the registry.
    pub fn checks(&self) -> Vec<&CheckArgs> {
        match self {
            Quest::Sequential(q) => q.objectives.iter().map(|o| &o.check).collect(),
            Quest::Gated(q) => q
                .prerequisite_checks
                .iter()
                .chain(q.completion_checks.iter())
                .map(|c| &c.check)
                .collect(),
        }
    }
}

/// Captured result of one executed shell command, handed to the engine by
/// the execution layer. The engine never re-runs a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub exit_status: i32,
}

impl CommandOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_status == 0
    }

    /// Synthesized zero-exit outcome for commands handled in-process.
    pub fn success(command: &str) -> Self {
        Self {
            command: command.to_string(),
            stdout: String::new(),
            stderr: String::new(),
            exit_status: 0,
        }
    }

    pub fn failure(command: &str, stderr: &str, exit_status: i32) -> Self {
        Self {
            command: command.to_string(),
            stdout: String::new(),
            stderr: stderr.to_string(),
            exit_status,
        }
    }
}

/// Structured display requests the engine returns from `load` and `observe`.
/// The presentation layer renders these; the engine never formats terminal
/// output itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A quest became active.
    QuestStarted { title: String, description: String },
    /// The active objective was satisfied this turn.
    ObjectiveComplete { message: String },
    /// Every objective (or the completion bundle) of the active quest passed.
    QuestComplete { title: String },
    /// A gated quest's prerequisite bundle is not yet satisfied.
    GateBlocked { feedback: String },
    /// A gated quest's completion bundle has a failing check.
    CheckPending { feedback: String },
    /// The last quest in the catalog finished.
    AllQuestsComplete,
}
