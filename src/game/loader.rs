//! Quest catalog loading.
//!
//! Quest definitions are TOML files in the configured quest directory, one
//! quest per file, loaded in sorted filename order so content authors can
//! sequence missions with numeric prefixes. A structurally broken file is
//! logged and skipped; a check kind missing from the registry is a fatal
//! configuration error, because it would otherwise surface as a quest that
//! silently never completes.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info};

use crate::game::errors::GameError;
use crate::game::registry::CheckRegistry;
use crate::game::types::{GatedQuest, Quest, SequentialQuest};

/// Load every `*.toml` quest file under `dir`, in sorted filename order.
/// Returns the ordered catalog; empty is not an error here, but callers
/// treat an empty catalog as fatal since the game cannot run.
pub fn load_catalog<P: AsRef<Path>>(
    dir: P,
    registry: &CheckRegistry,
) -> Result<Vec<Quest>, GameError> {
    let dir = dir.as_ref();
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    files.sort();

    let mut catalog = Vec::new();
    for path in files {
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                error!("skipping unreadable quest file {}: {}", path.display(), e);
                continue;
            }
        };
        match parse_quest_file(&path, &contents, registry) {
            Ok(quest) => {
                info!("loaded quest '{}' from {}", quest.id(), path.display());
                catalog.push(quest);
            }
            // Unknown kinds abort the whole load; anything else is a
            // content mistake confined to this file.
            Err(e @ GameError::UnknownCheckKind { .. }) => return Err(e),
            Err(e) => error!("skipping quest file: {}", e),
        }
    }
    Ok(catalog)
}

/// Parse one quest file. The file's structure selects the quest shape:
/// `[[objectives]]` for sequential, `[[completion_checks]]` (plus optional
/// `[[prerequisite_checks]]`) for gated.
pub fn parse_quest_file(
    path: &Path,
    contents: &str,
    registry: &CheckRegistry,
) -> Result<Quest, GameError> {
    let value: toml::Value = toml::from_str(contents).map_err(|e| GameError::InvalidQuest {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let table = value.as_table().ok_or_else(|| GameError::InvalidQuest {
        file: path.to_path_buf(),
        reason: "quest file is not a table".to_string(),
    })?;

    let quest_id = table
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| GameError::InvalidQuest {
            file: path.to_path_buf(),
            reason: "missing required field 'id'".to_string(),
        })?
        .to_string();

    // Kind names are validated against the registry before typed parsing:
    // an unknown kind must surface as the fatal configuration error it is,
    // not as a per-file deserialization skip.
    for kind in check_kind_names(table) {
        if !registry.contains(&kind) {
            return Err(GameError::UnknownCheckKind {
                kind,
                quest_id,
            });
        }
    }

    let has_objectives = table.contains_key("objectives");
    let has_checks = table.contains_key("completion_checks");
    let quest = match (has_objectives, has_checks) {
        (true, false) => {
            let quest: SequentialQuest =
                value.try_into().map_err(|e| GameError::InvalidQuest {
                    file: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            if quest.objectives.is_empty() {
                return Err(GameError::InvalidQuest {
                    file: path.to_path_buf(),
                    reason: "quest has no objectives".to_string(),
                });
            }
            Quest::Sequential(quest)
        }
        (false, true) => {
            let quest: GatedQuest = value.try_into().map_err(|e| GameError::InvalidQuest {
                file: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            if quest.completion_checks.is_empty() {
                return Err(GameError::InvalidQuest {
                    file: path.to_path_buf(),
                    reason: "quest has no completion checks".to_string(),
                });
            }
            Quest::Gated(quest)
        }
        (true, true) => {
            return Err(GameError::InvalidQuest {
                file: path.to_path_buf(),
                reason: "quest defines both objectives and completion_checks".to_string(),
            })
        }
        (false, false) => {
            return Err(GameError::InvalidQuest {
                file: path.to_path_buf(),
                reason: "quest defines neither objectives nor completion_checks".to_string(),
            })
        }
    };
    Ok(quest)
}

/// Collect the kind tag of every `check` table in the file. Checks are
/// externally tagged, so each `check` table has exactly one key: the kind.
fn check_kind_names(table: &toml::value::Table) -> Vec<String> {
    let mut kinds = Vec::new();
    for list in ["objectives", "prerequisite_checks", "completion_checks"] {
        let Some(entries) = table.get(list).and_then(|v| v.as_array()) else {
            continue;
        };
        for entry in entries {
            let check = entry.get("check").and_then(|v| v.as_table());
            if let Some(check) = check {
                kinds.extend(check.keys().cloned());
            }
        }
    }
    kinds
}

// --- Starter content written by `shellquest init` ---

const STARTER_FIRST_STEPS: &str = r#"id = "first-steps"
title = "First Steps"
description = "The link is up but I can barely see. Show me where we are."

[[objectives]]
id = "look-around"
description = "List the contents of the current directory"
hint = "The `ls` command lists what lives in a directory."
success_message = "Good. Now I can see the terrain."

[objectives.check.command_run]
verb = "ls"

[[objectives]]
id = "find-yourself"
description = "Print the current working directory"
hint = "`pwd` prints where you are standing."
success_message = "Coordinates locked."

[objectives.check.command_run]
verb = "pwd"
"#;

const STARTER_SAFEHOUSE: &str = r#"id = "safehouse"
title = "Build the Safehouse"
description = "We need somewhere to stash things before they trace us."

[[objectives]]
id = "make-safehouse"
description = "Create a directory called safehouse in your home directory"
hint = "`mkdir ~/safehouse` builds a directory."
success_message = "Walls up. It's not much, but it's ours."

[objectives.check.path_exists]
path = "~/safehouse"
kind = "directory"

[[objectives]]
id = "drop-the-ledger"
description = "Create an empty file named ledger inside the safehouse"
hint = "`touch ~/safehouse/ledger` creates an empty file."
success_message = "Ledger planted."

[objectives.check.path_exists]
path = "~/safehouse/ledger"
kind = "file"
"#;

const STARTER_LOCKDOWN: &str = r#"id = "lockdown"
title = "Lock Down the Ledger"
description = """
Anyone on this box can read our ledger right now. Restrict it so only you
can read and write it. I'll audit the file after each command you run."""

[[prerequisite_checks]]
failure_message = "The ledger is missing. Rebuild the safehouse first."

[prerequisite_checks.check.path_exists]
path = "~/safehouse/ledger"
kind = "file"

[[completion_checks]]
failure_message = "The ledger is still readable by others. `chmod 600` is your friend."

[completion_checks.check.permission_check]
path = "~/safehouse/ledger"
mode = "600"
"#;

/// Write the starter quest files into `dir`, creating it if needed.
/// Existing files are left alone so `init` is safe to re-run.
pub fn write_starter_quests<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, GameError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let starters = [
        ("01_first_steps.toml", STARTER_FIRST_STEPS),
        ("02_safehouse.toml", STARTER_SAFEHOUSE),
        ("03_lockdown.toml", STARTER_LOCKDOWN),
    ];
    let mut written = Vec::new();
    for (name, contents) in starters {
        let path = dir.join(name);
        if path.exists() {
            continue;
        }
        fs::write(&path, contents)?;
        written.push(path);
    }
    Ok(written)
}
