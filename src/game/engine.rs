//! Quest state machine.
//!
//! The engine owns the loaded catalog, tracks which quest is active, and
//! evaluates each observed command against the active quest. Sequential
//! quests evaluate only their earliest uncompleted objective per turn;
//! gated quests audit ambient system state as atomic check bundles. All
//! evaluation errors are contained here: a failing predicate is logged and
//! treated as "not yet satisfied", never surfaced as a crash.

use log::{debug, info, warn};

use crate::game::progress::SaveState;
use crate::game::registry::{CheckRegistry, EvalContext};
use crate::game::types::{
    CommandOutcome, Condition, EngineEvent, GatedQuest, Quest, SequentialQuest,
};

/// Where the engine is in the catalog. `NoQuestsLoaded` and
/// `AllQuestsComplete` both present as "no active quest" but are distinct
/// states: the first means the game cannot run, the second that it is won.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineState {
    NoQuestsLoaded,
    QuestActive { quest_id: String },
    AllQuestsComplete,
}

/// One row of the quest log display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectiveRow {
    pub description: String,
    pub done: bool,
}

/// Structured quest-log data for the presentation layer: title, flavor
/// text, and per-step status in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestLogView {
    pub title: String,
    pub description: String,
    pub rows: Vec<ObjectiveRow>,
}

pub struct QuestEngine {
    catalog: Vec<Quest>,
    state: EngineState,
}

impl QuestEngine {
    pub fn new() -> Self {
        Self {
            catalog: Vec::new(),
            state: EngineState::NoQuestsLoaded,
        }
    }

    /// Install the catalog and activate its first quest. An empty catalog
    /// leaves the engine in `NoQuestsLoaded`; the caller treats that as
    /// fatal since there is nothing to play.
    pub fn load(&mut self, catalog: Vec<Quest>) -> Vec<EngineEvent> {
        self.catalog = catalog;
        match self.catalog.first() {
            Some(quest) => {
                info!(
                    "loaded {} quests, starting with '{}'",
                    self.catalog.len(),
                    quest.id()
                );
                self.state = EngineState::QuestActive {
                    quest_id: quest.id().to_string(),
                };
                vec![EngineEvent::QuestStarted {
                    title: quest.title().to_string(),
                    description: quest.description().to_string(),
                }]
            }
            None => {
                warn!("no quests loaded");
                self.state = EngineState::NoQuestsLoaded;
                Vec::new()
            }
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        !self.catalog.is_empty()
    }

    pub fn catalog(&self) -> &[Quest] {
        &self.catalog
    }

    pub fn active_quest(&self) -> Option<&Quest> {
        match &self.state {
            EngineState::QuestActive { quest_id } => {
                self.catalog.iter().find(|q| q.id() == quest_id)
            }
            _ => None,
        }
    }

    /// Hint for the active objective, if the active quest has one.
    pub fn hint(&self) -> Option<&str> {
        match self.active_quest()? {
            Quest::Sequential(q) => q.active_objective().map(|o| o.hint.as_str()),
            Quest::Gated(_) => None,
        }
    }

    /// Display data for the active quest, or `None` when no quest is active.
    pub fn quest_log(&self) -> Option<QuestLogView> {
        let quest = self.active_quest()?;
        let rows = match quest {
            Quest::Sequential(q) => q
                .objectives
                .iter()
                .map(|o| ObjectiveRow {
                    description: o.description.clone(),
                    done: o.completed,
                })
                .collect(),
            Quest::Gated(q) => vec![ObjectiveRow {
                description: "Pass the system audit".to_string(),
                done: q.completed,
            }],
        };
        Some(QuestLogView {
            title: quest.title().to_string(),
            description: quest.description().to_string(),
            rows,
        })
    }

    /// Evaluate one observed command against the active quest. Returns the
    /// display events this turn produced; an empty vec means no progress
    /// signal. Safe to call in any state: without an active quest this is a
    /// no-op, and re-observing an already-satisfied command cannot flip any
    /// flag twice.
    pub fn observe(
        &mut self,
        outcome: &CommandOutcome,
        registry: &CheckRegistry,
    ) -> Vec<EngineEvent> {
        let quest_id = match &self.state {
            EngineState::QuestActive { quest_id } => quest_id.clone(),
            _ => return Vec::new(),
        };
        let Some(index) = self.catalog.iter().position(|q| q.id() == quest_id) else {
            warn!("active quest '{}' missing from catalog", quest_id);
            return Vec::new();
        };

        let mut events = Vec::new();
        let finished = match &mut self.catalog[index] {
            Quest::Sequential(q) => observe_sequential(q, outcome, registry, &mut events),
            Quest::Gated(q) => observe_gated(q, registry, &mut events),
        };
        if finished {
            self.advance(index, &mut events);
        }
        events
    }

    /// Mark the quest at `index` complete and hand the turn to the next
    /// incomplete quest in catalog order, or finish the game.
    fn advance(&mut self, index: usize, events: &mut Vec<EngineEvent>) {
        let title = self.catalog[index].title().to_string();
        info!("quest complete: {}", self.catalog[index].id());
        events.push(EngineEvent::QuestComplete { title });

        let next = self
            .catalog
            .iter()
            .skip(index + 1)
            .find(|q| !q.is_complete());
        match next {
            Some(quest) => {
                self.state = EngineState::QuestActive {
                    quest_id: quest.id().to_string(),
                };
                events.push(EngineEvent::QuestStarted {
                    title: quest.title().to_string(),
                    description: quest.description().to_string(),
                });
            }
            None => {
                info!("all quests complete");
                self.state = EngineState::AllQuestsComplete;
                events.push(EngineEvent::AllQuestsComplete);
            }
        }
    }

    /// Snapshot current progress for persistence.
    pub fn snapshot(&self) -> SaveState {
        let mut completed_objectives = Vec::new();
        let mut completed_quests = Vec::new();
        let mut started_gates = Vec::new();
        for quest in &self.catalog {
            if quest.is_complete() {
                completed_quests.push(quest.id().to_string());
            }
            match quest {
                Quest::Sequential(q) => {
                    for objective in q.objectives.iter().filter(|o| o.completed) {
                        completed_objectives.push((q.id.clone(), objective.id.clone()));
                    }
                }
                Quest::Gated(q) => {
                    if q.started {
                        started_gates.push(q.id.clone());
                    }
                }
            }
        }
        SaveState {
            active_quest_id: match &self.state {
                EngineState::QuestActive { quest_id } => Some(quest_id.clone()),
                _ => None,
            },
            finished: self.state == EngineState::AllQuestsComplete,
            completed_quests,
            completed_objectives,
            started_gates,
            saved_at: chrono::Utc::now(),
        }
    }

    /// Replay a snapshot onto the loaded catalog. Flags only move
    /// false→true; the active quest is then re-derived as the first
    /// incomplete quest in catalog order, which also absorbs catalog edits
    /// made since the save. Emits no events.
    pub fn restore(&mut self, save: &SaveState) {
        for (quest_id, objective_id) in &save.completed_objectives {
            match self.find_objective(quest_id, objective_id) {
                Some(objective) => objective.completed = true,
                None => warn!(
                    "save references unknown objective {}/{}, skipping",
                    quest_id, objective_id
                ),
            }
        }
        for quest_id in &save.started_gates {
            match self.find_gated(quest_id) {
                Some(quest) => quest.started = true,
                None => warn!("save references unknown gated quest {}, skipping", quest_id),
            }
        }
        for quest_id in &save.completed_quests {
            let Some(quest) = self.catalog.iter_mut().find(|q| q.id() == *quest_id) else {
                warn!("save references unknown quest {}, skipping", quest_id);
                continue;
            };
            match quest {
                Quest::Sequential(q) => {
                    for objective in &mut q.objectives {
                        objective.completed = true;
                    }
                    q.completed = true;
                }
                Quest::Gated(q) => {
                    q.started = true;
                    q.completed = true;
                }
            }
        }
        // A sequential quest whose every objective was restored is complete
        // even if the quest id never made it into completed_quests.
        for quest in &mut self.catalog {
            if let Quest::Sequential(q) = quest {
                if q.all_objectives_complete() {
                    q.completed = true;
                }
            }
        }

        self.state = if self.catalog.is_empty() {
            EngineState::NoQuestsLoaded
        } else {
            match self.catalog.iter().find(|q| !q.is_complete()) {
                Some(quest) => EngineState::QuestActive {
                    quest_id: quest.id().to_string(),
                },
                None => EngineState::AllQuestsComplete,
            }
        };
        debug!("restored progress, state: {:?}", self.state);
    }

    fn find_objective(
        &mut self,
        quest_id: &str,
        objective_id: &str,
    ) -> Option<&mut crate::game::types::Objective> {
        self.catalog.iter_mut().find_map(|quest| match quest {
            Quest::Sequential(q) if q.id == quest_id => {
                q.objectives.iter_mut().find(|o| o.id == objective_id)
            }
            _ => None,
        })
    }

    fn find_gated(&mut self, quest_id: &str) -> Option<&mut GatedQuest> {
        self.catalog.iter_mut().find_map(|quest| match quest {
            Quest::Gated(q) if q.id == quest_id => Some(q),
            _ => None,
        })
    }
}

impl Default for QuestEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Sequential turn: failed commands never satisfy objectives, and only the
/// earliest uncompleted objective is evaluated. Returns true when the last
/// objective just completed.
fn observe_sequential(
    quest: &mut SequentialQuest,
    outcome: &CommandOutcome,
    registry: &CheckRegistry,
    events: &mut Vec<EngineEvent>,
) -> bool {
    if !outcome.succeeded() {
        return false;
    }
    let ctx = EvalContext::for_command(outcome);
    let Some(objective) = quest.objectives.iter_mut().find(|o| !o.completed) else {
        // Advancement runs in the same turn the last objective completes,
        // so a fully-satisfied active quest should not be observable.
        debug!("quest '{}' has no open objective", quest.id);
        return false;
    };
    let satisfied = match registry.evaluate(&objective.check, &ctx) {
        Ok(value) => value.is_true(),
        Err(e) => {
            debug!("objective '{}' check failed: {}", objective.id, e);
            false
        }
    };
    if !satisfied {
        return false;
    }
    objective.completed = true;
    info!("objective complete: {}/{}", quest.id, objective.id);
    events.push(EngineEvent::ObjectiveComplete {
        message: objective.success_message.clone(),
    });

    if quest.all_objectives_complete() {
        quest.completed = true;
        true
    } else {
        false
    }
}

/// Gated turn: completion is a pull against ambient system state, ignoring
/// the command outcome. The prerequisite bundle must pass once before the
/// completion bundle is ever consulted. Returns true when the completion
/// bundle passes in full.
fn observe_gated(
    quest: &mut GatedQuest,
    registry: &CheckRegistry,
    events: &mut Vec<EngineEvent>,
) -> bool {
    let ctx = EvalContext::ambient();
    if !quest.started {
        if let Some(feedback) = first_failing(&quest.prerequisite_checks, registry, &ctx) {
            events.push(EngineEvent::GateBlocked { feedback });
            return false;
        }
        info!("quest '{}' prerequisites satisfied", quest.id);
        quest.started = true;
    }
    match first_failing(&quest.completion_checks, registry, &ctx) {
        Some(feedback) => {
            events.push(EngineEvent::CheckPending { feedback });
            false
        }
        None => {
            quest.completed = true;
            true
        }
    }
}

/// Evaluate a bundle atomically; the first unsatisfied check's failure
/// message is the whole bundle's verdict. Evaluation errors count as
/// unsatisfied for this cycle.
fn first_failing(
    checks: &[Condition],
    registry: &CheckRegistry,
    ctx: &EvalContext,
) -> Option<String> {
    for condition in checks {
        let satisfied = match registry.evaluate(&condition.check, ctx) {
            Ok(observed) => observed == condition.expected,
            Err(e) => {
                debug!("check '{}' errored: {}", condition.check.kind(), e);
                false
            }
        };
        if !satisfied {
            return Some(condition.failure_message.clone());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::errors::EvalError;
    use crate::game::types::{CheckArgs, CheckValue, Objective, PathKind};

    fn run(command: &str) -> CommandOutcome {
        CommandOutcome::success(command)
    }

    fn failed_run(command: &str) -> CommandOutcome {
        CommandOutcome::failure(command, "boom", 1)
    }

    fn command_quest(id: &str, title: &str, verb: &str) -> Quest {
        Quest::Sequential(
            SequentialQuest::new(id, title, "flavor").with_objective(
                Objective::new(
                    "run-it",
                    &format!("Run {}", verb),
                    CheckArgs::CommandRun { verb: verb.into() },
                )
                .with_success_message("Done."),
            ),
        )
    }

    #[test]
    fn empty_catalog_stays_unloaded() {
        let mut engine = QuestEngine::new();
        let events = engine.load(Vec::new());
        assert!(events.is_empty());
        assert_eq!(engine.state(), &EngineState::NoQuestsLoaded);
        assert!(!engine.is_loaded());

        let registry = CheckRegistry::with_builtins();
        assert!(engine.observe(&run("ls"), &registry).is_empty());
    }

    #[test]
    fn load_activates_first_quest() {
        let mut engine = QuestEngine::new();
        let events = engine.load(vec![
            command_quest("a", "Quest A", "ls"),
            command_quest("b", "Quest B", "pwd"),
        ]);
        assert_eq!(
            events,
            vec![EngineEvent::QuestStarted {
                title: "Quest A".into(),
                description: "flavor".into(),
            }]
        );
        assert_eq!(
            engine.state(),
            &EngineState::QuestActive {
                quest_id: "a".into()
            }
        );
    }

    #[test]
    fn failed_command_never_completes_an_objective() {
        let mut engine = QuestEngine::new();
        engine.load(vec![command_quest("a", "Quest A", "ls")]);
        let registry = CheckRegistry::with_builtins();

        let events = engine.observe(&failed_run("ls"), &registry);
        assert!(events.is_empty());
        match engine.active_quest().unwrap() {
            Quest::Sequential(q) => assert!(!q.objectives[0].completed),
            _ => unreachable!(),
        }
    }

    #[test]
    fn wrong_verb_is_no_progress() {
        let mut engine = QuestEngine::new();
        engine.load(vec![command_quest("a", "Quest A", "ls")]);
        let registry = CheckRegistry::with_builtins();
        assert!(engine.observe(&run("pwd"), &registry).is_empty());
    }

    #[test]
    fn completing_last_quest_finishes_the_game() {
        let mut engine = QuestEngine::new();
        engine.load(vec![command_quest("a", "Quest A", "ls")]);
        let registry = CheckRegistry::with_builtins();

        let events = engine.observe(&run("ls -la"), &registry);
        assert_eq!(
            events,
            vec![
                EngineEvent::ObjectiveComplete {
                    message: "Done.".into()
                },
                EngineEvent::QuestComplete {
                    title: "Quest A".into()
                },
                EngineEvent::AllQuestsComplete,
            ]
        );
        assert_eq!(engine.state(), &EngineState::AllQuestsComplete);

        // Subsequent observes are safe no-ops.
        assert!(engine.observe(&run("ls"), &registry).is_empty());
        assert_eq!(engine.state(), &EngineState::AllQuestsComplete);
    }

    #[test]
    fn quest_transition_emits_next_banner() {
        let mut engine = QuestEngine::new();
        engine.load(vec![
            command_quest("a", "Quest A", "ls"),
            command_quest("b", "Quest B", "pwd"),
        ]);
        let registry = CheckRegistry::with_builtins();

        let events = engine.observe(&run("ls"), &registry);
        assert!(events.contains(&EngineEvent::QuestComplete {
            title: "Quest A".into()
        }));
        assert!(events.contains(&EngineEvent::QuestStarted {
            title: "Quest B".into(),
            description: "flavor".into(),
        }));
        assert_eq!(
            engine.state(),
            &EngineState::QuestActive {
                quest_id: "b".into()
            }
        );
    }

    #[test]
    fn later_objectives_cannot_complete_out_of_order() {
        let quest = Quest::Sequential(
            SequentialQuest::new("a", "Quest A", "flavor")
                .with_objective(Objective::new(
                    "look",
                    "Look",
                    CheckArgs::CommandRun { verb: "ls".into() },
                ))
                .with_objective(Objective::new(
                    "where",
                    "Where",
                    CheckArgs::CommandRun { verb: "pwd".into() },
                )),
        );
        let mut engine = QuestEngine::new();
        engine.load(vec![quest]);
        let registry = CheckRegistry::with_builtins();

        // Satisfies the second objective's check, but only the earliest
        // uncompleted objective is ever evaluated.
        let events = engine.observe(&run("pwd"), &registry);
        assert!(events.is_empty());
        match engine.active_quest().unwrap() {
            Quest::Sequential(q) => {
                assert!(!q.objectives[0].completed);
                assert!(!q.objectives[1].completed);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn completion_is_monotonic_and_success_message_fires_once() {
        let quest = Quest::Sequential(
            SequentialQuest::new("a", "Quest A", "flavor")
                .with_objective(
                    Objective::new("look", "Look", CheckArgs::CommandRun { verb: "ls".into() })
                        .with_success_message("Seen."),
                )
                .with_objective(Objective::new(
                    "where",
                    "Where",
                    CheckArgs::CommandRun { verb: "pwd".into() },
                )),
        );
        let mut engine = QuestEngine::new();
        engine.load(vec![quest]);
        let registry = CheckRegistry::with_builtins();

        let events = engine.observe(&run("ls"), &registry);
        assert_eq!(
            events,
            vec![EngineEvent::ObjectiveComplete {
                message: "Seen.".into()
            }]
        );

        // Re-running the same successful command re-confirms nothing: the
        // first objective is already complete and the second doesn't match.
        let events = engine.observe(&run("ls"), &registry);
        assert!(events.is_empty());
    }

    #[test]
    fn evaluation_errors_are_contained() {
        fn always_err(_: &CheckArgs, _: &EvalContext) -> Result<CheckValue, EvalError> {
            Err(EvalError::UnknownUid(4242))
        }

        let mut registry = CheckRegistry::with_builtins();
        registry.register("command_run", always_err);

        let mut engine = QuestEngine::new();
        engine.load(vec![command_quest("a", "Quest A", "ls")]);

        let events = engine.observe(&run("ls"), &registry);
        assert!(events.is_empty());
        assert_eq!(
            engine.state(),
            &EngineState::QuestActive {
                quest_id: "a".into()
            }
        );
    }

    #[test]
    fn gated_quest_blocks_until_prerequisites_pass() {
        fn always_false(_: &CheckArgs, _: &EvalContext) -> Result<CheckValue, EvalError> {
            Ok(CheckValue::Bool(false))
        }

        let quest = Quest::Gated(
            GatedQuest::new("audit", "Audit", "flavor")
                .with_prerequisite(Condition::new(
                    CheckArgs::PathExists {
                        path: "/tmp/anything".into(),
                        kind: PathKind::File,
                    },
                    "environment not ready",
                ))
                .with_completion(Condition::new(
                    CheckArgs::PermissionCheck {
                        path: "/tmp/anything".into(),
                        mode: "600".into(),
                    },
                    "file still open",
                )),
        );

        let mut registry = CheckRegistry::with_builtins();
        registry.register("path_exists", always_false);

        let mut engine = QuestEngine::new();
        engine.load(vec![quest]);

        let events = engine.observe(&run("ls"), &registry);
        assert_eq!(
            events,
            vec![EngineEvent::GateBlocked {
                feedback: "environment not ready".into()
            }]
        );
        match engine.active_quest().unwrap() {
            Quest::Gated(q) => assert!(!q.started),
            _ => unreachable!(),
        }
    }

    #[test]
    fn gated_quest_completes_when_bundle_passes() {
        fn always_true(_: &CheckArgs, _: &EvalContext) -> Result<CheckValue, EvalError> {
            Ok(CheckValue::Bool(true))
        }

        let quest = Quest::Gated(
            GatedQuest::new("audit", "Audit", "flavor").with_completion(Condition::new(
                CheckArgs::PermissionCheck {
                    path: "/tmp/anything".into(),
                    mode: "600".into(),
                },
                "file still open",
            )),
        );

        let mut registry = CheckRegistry::with_builtins();
        registry.register("permission_check", always_true);

        let mut engine = QuestEngine::new();
        engine.load(vec![quest]);

        // Gated evaluation ignores the command's exit status entirely.
        let events = engine.observe(&failed_run("whatever"), &registry);
        assert_eq!(
            events,
            vec![
                EngineEvent::QuestComplete {
                    title: "Audit".into()
                },
                EngineEvent::AllQuestsComplete,
            ]
        );
    }

    #[test]
    fn prerequisites_are_not_rechecked_after_the_gate_opens() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static PREREQ_CALLS: AtomicUsize = AtomicUsize::new(0);

        fn counting_true(_: &CheckArgs, _: &EvalContext) -> Result<CheckValue, EvalError> {
            PREREQ_CALLS.fetch_add(1, Ordering::SeqCst);
            Ok(CheckValue::Bool(true))
        }
        fn always_false(_: &CheckArgs, _: &EvalContext) -> Result<CheckValue, EvalError> {
            Ok(CheckValue::Bool(false))
        }

        let quest = Quest::Gated(
            GatedQuest::new("audit", "Audit", "flavor")
                .with_prerequisite(Condition::new(
                    CheckArgs::PathExists {
                        path: "/tmp/anything".into(),
                        kind: PathKind::File,
                    },
                    "not ready",
                ))
                .with_completion(Condition::new(
                    CheckArgs::PermissionCheck {
                        path: "/tmp/anything".into(),
                        mode: "600".into(),
                    },
                    "still open",
                )),
        );

        let mut registry = CheckRegistry::with_builtins();
        registry.register("path_exists", counting_true);
        registry.register("permission_check", always_false);

        let mut engine = QuestEngine::new();
        engine.load(vec![quest]);

        engine.observe(&run("ls"), &registry);
        engine.observe(&run("ls"), &registry);
        assert_eq!(PREREQ_CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn gated_quest_reports_first_failing_check() {
        fn always_false(_: &CheckArgs, _: &EvalContext) -> Result<CheckValue, EvalError> {
            Ok(CheckValue::Bool(false))
        }

        let quest = Quest::Gated(
            GatedQuest::new("audit", "Audit", "flavor")
                .with_completion(Condition::new(
                    CheckArgs::PermissionCheck {
                        path: "/tmp/a".into(),
                        mode: "600".into(),
                    },
                    "first feedback",
                ))
                .with_completion(Condition::new(
                    CheckArgs::PermissionCheck {
                        path: "/tmp/b".into(),
                        mode: "600".into(),
                    },
                    "second feedback",
                )),
        );

        let mut registry = CheckRegistry::with_builtins();
        registry.register("permission_check", always_false);

        let mut engine = QuestEngine::new();
        engine.load(vec![quest]);

        let events = engine.observe(&run("ls"), &registry);
        assert_eq!(
            events,
            vec![EngineEvent::CheckPending {
                feedback: "first feedback".into()
            }]
        );
    }

    #[test]
    fn snapshot_restore_round_trips() {
        let mut engine = QuestEngine::new();
        engine.load(vec![
            command_quest("a", "Quest A", "ls"),
            command_quest("b", "Quest B", "pwd"),
        ]);
        let registry = CheckRegistry::with_builtins();
        engine.observe(&run("ls"), &registry);

        let save = engine.snapshot();
        assert_eq!(save.completed_quests, vec!["a".to_string()]);
        assert_eq!(save.active_quest_id.as_deref(), Some("b"));

        let mut fresh = QuestEngine::new();
        fresh.load(vec![
            command_quest("a", "Quest A", "ls"),
            command_quest("b", "Quest B", "pwd"),
        ]);
        fresh.restore(&save);
        assert_eq!(
            fresh.state(),
            &EngineState::QuestActive {
                quest_id: "b".into()
            }
        );
        assert!(fresh.catalog()[0].is_complete());
    }

    #[test]
    fn restore_ignores_stale_ids() {
        let mut engine = QuestEngine::new();
        engine.load(vec![command_quest("a", "Quest A", "ls")]);

        let save = SaveState {
            active_quest_id: Some("gone".into()),
            finished: false,
            completed_quests: vec!["gone".into()],
            completed_objectives: vec![("gone".into(), "x".into())],
            started_gates: vec!["gone".into()],
            saved_at: chrono::Utc::now(),
        };
        engine.restore(&save);
        assert_eq!(
            engine.state(),
            &EngineState::QuestActive {
                quest_id: "a".into()
            }
        );
    }

    #[test]
    fn restore_of_fully_complete_save_finishes() {
        let mut engine = QuestEngine::new();
        engine.load(vec![command_quest("a", "Quest A", "ls")]);

        let save = SaveState {
            active_quest_id: None,
            finished: true,
            completed_quests: vec!["a".into()],
            completed_objectives: vec![("a".into(), "run-it".into())],
            started_gates: vec![],
            saved_at: chrono::Utc::now(),
        };
        engine.restore(&save);
        assert_eq!(engine.state(), &EngineState::AllQuestsComplete);
    }
}
