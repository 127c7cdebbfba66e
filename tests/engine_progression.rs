//! End-to-end engine progression against a real filesystem.

use shellquest::game::{
    CheckArgs, CheckRegistry, CommandOutcome, Condition, EngineEvent, EngineState, GatedQuest,
    Objective, PathKind, Quest, QuestEngine, SaveState, SequentialQuest,
};
use std::os::unix::fs::PermissionsExt;
use tempfile::TempDir;

fn run(command: &str) -> CommandOutcome {
    CommandOutcome::success(command)
}

fn two_quest_catalog(vault: &str) -> Vec<Quest> {
    vec![
        Quest::Sequential(
            SequentialQuest::new("recon", "Recon", "Get your bearings.")
                .with_objective(
                    Objective::new(
                        "look",
                        "List the directory",
                        CheckArgs::CommandRun { verb: "ls".into() },
                    )
                    .with_hint("Try `ls`.")
                    .with_success_message("Terrain mapped."),
                )
                .with_objective(
                    Objective::new(
                        "vault",
                        "Create the vault",
                        CheckArgs::PathExists {
                            path: vault.into(),
                            kind: PathKind::Directory,
                        },
                    )
                    .with_success_message("Vault built."),
                ),
        ),
        Quest::Sequential(
            SequentialQuest::new("locate", "Locate", "Find yourself.").with_objective(
                Objective::new(
                    "where",
                    "Print the working directory",
                    CheckArgs::CommandRun { verb: "pwd".into() },
                ),
            ),
        ),
    ]
}

#[test]
fn full_playthrough_across_two_quests() {
    let dir = TempDir::new().unwrap();
    let vault = dir.path().join("vault");
    let vault_str = vault.to_string_lossy().into_owned();

    let registry = CheckRegistry::with_builtins();
    let mut engine = QuestEngine::new();
    let events = engine.load(two_quest_catalog(&vault_str));
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], EngineEvent::QuestStarted { .. }));

    // Wrong verb for the first objective: no change.
    assert!(engine.observe(&run("pwd"), &registry).is_empty());
    assert_eq!(engine.hint(), Some("Try `ls`."));

    // Right verb: first objective completes, vault objective becomes active.
    let events = engine.observe(&run("ls"), &registry);
    assert_eq!(
        events,
        vec![EngineEvent::ObjectiveComplete {
            message: "Terrain mapped.".into()
        }]
    );
    assert_ne!(engine.hint(), Some("Try `ls`."));

    // The directory appears on disk; the next successful command of any
    // verb lets the path check see it.
    std::fs::create_dir(&vault).unwrap();
    let events = engine.observe(&run(&format!("mkdir {}", vault_str)), &registry);
    assert_eq!(
        events,
        vec![
            EngineEvent::ObjectiveComplete {
                message: "Vault built.".into()
            },
            EngineEvent::QuestComplete {
                title: "Recon".into()
            },
            EngineEvent::QuestStarted {
                title: "Locate".into(),
                description: "Find yourself.".into()
            },
        ]
    );

    // Final quest completes and the game ends.
    let events = engine.observe(&run("pwd"), &registry);
    assert!(events.contains(&EngineEvent::AllQuestsComplete));
    assert_eq!(engine.state(), &EngineState::AllQuestsComplete);

    // Further observes are safe no-ops.
    assert!(engine.observe(&run("ls"), &registry).is_empty());
}

#[test]
fn failed_commands_never_advance_any_objective_kind() {
    let dir = TempDir::new().unwrap();
    let vault = dir.path().join("vault");
    std::fs::create_dir(&vault).unwrap();

    let registry = CheckRegistry::with_builtins();
    let mut engine = QuestEngine::new();
    engine.load(two_quest_catalog(&vault.to_string_lossy()));

    // Even though the path check would pass, the nonzero exit status skips
    // evaluation entirely.
    let failed = CommandOutcome::failure("ls", "permission denied", 2);
    assert!(engine.observe(&failed, &registry).is_empty());
    match engine.active_quest().unwrap() {
        Quest::Sequential(q) => assert!(q.objectives.iter().all(|o| !o.completed)),
        _ => unreachable!(),
    }
}

#[test]
fn gated_quest_lifecycle_on_a_real_file() {
    let dir = TempDir::new().unwrap();
    let ledger = dir.path().join("ledger");
    let ledger_str = ledger.to_string_lossy().into_owned();

    let quest = Quest::Gated(
        GatedQuest::new("lockdown", "Lockdown", "Restrict the ledger.")
            .with_prerequisite(Condition::new(
                CheckArgs::PathExists {
                    path: ledger_str.clone(),
                    kind: PathKind::File,
                },
                "The ledger is missing.",
            ))
            .with_completion(Condition::new(
                CheckArgs::PermissionCheck {
                    path: ledger_str.clone(),
                    mode: "600".into(),
                },
                "The ledger is still readable by others.",
            )),
    );

    let registry = CheckRegistry::with_builtins();
    let mut engine = QuestEngine::new();
    engine.load(vec![quest]);

    // Prerequisite unmet: blocked, completion checks never consulted.
    let events = engine.observe(&run("ls"), &registry);
    assert_eq!(
        events,
        vec![EngineEvent::GateBlocked {
            feedback: "The ledger is missing.".into()
        }]
    );

    // File exists but with open permissions: gate opens, completion pends.
    std::fs::write(&ledger, "entries\n").unwrap();
    std::fs::set_permissions(&ledger, std::fs::Permissions::from_mode(0o644)).unwrap();
    let events = engine.observe(&run(&format!("touch {}", ledger_str)), &registry);
    assert_eq!(
        events,
        vec![EngineEvent::CheckPending {
            feedback: "The ledger is still readable by others.".into()
        }]
    );

    // Tighten the mode: the bundle passes and the game completes.
    std::fs::set_permissions(&ledger, std::fs::Permissions::from_mode(0o600)).unwrap();
    let events = engine.observe(&run(&format!("chmod 600 {}", ledger_str)), &registry);
    assert_eq!(
        events,
        vec![
            EngineEvent::QuestComplete {
                title: "Lockdown".into()
            },
            EngineEvent::AllQuestsComplete,
        ]
    );
}

#[test]
fn progress_survives_a_save_and_restore_cycle() {
    let dir = TempDir::new().unwrap();
    let vault = dir.path().join("vault");
    let vault_str = vault.to_string_lossy().into_owned();
    let save_path = dir.path().join("save.json");

    let registry = CheckRegistry::with_builtins();
    let mut engine = QuestEngine::new();
    engine.load(two_quest_catalog(&vault_str));
    engine.observe(&run("ls"), &registry);

    engine.snapshot().write(&save_path).unwrap();

    // A fresh engine with a fresh catalog picks up mid-quest.
    let mut fresh = QuestEngine::new();
    fresh.load(two_quest_catalog(&vault_str));
    let save = SaveState::load(&save_path).unwrap();
    fresh.restore(&save);

    assert_eq!(
        fresh.state(),
        &EngineState::QuestActive {
            quest_id: "recon".into()
        }
    );
    match fresh.active_quest().unwrap() {
        Quest::Sequential(q) => {
            assert!(q.objectives[0].completed);
            assert!(!q.objectives[1].completed);
        }
        _ => unreachable!(),
    }

    // The restored engine continues exactly where the original would.
    std::fs::create_dir(&vault).unwrap();
    let events = fresh.observe(&run("mkdir vault"), &registry);
    assert!(events.contains(&EngineEvent::QuestComplete {
        title: "Recon".into()
    }));
}
