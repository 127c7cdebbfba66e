//! Command execution.
//!
//! Every non-meta line goes to a real bash, synchronously, with output
//! captured so the session can print it and the engine can evaluate it.
//! Two commands must be handled in-process: `cd` (a child process changing
//! its own directory would leave ours untouched) and `clear` (the escape
//! sequence belongs on our terminal, not in a captured buffer).

use std::io::Write;
use std::process::Command;

use log::{debug, error};

use crate::game::CommandOutcome;
use crate::logutil::escape_log;

/// Execute one command line and capture its outcome. Never panics and never
/// returns a raw error: a spawn failure becomes a 127 outcome the same way
/// a missing binary would.
pub fn execute(command: &str) -> CommandOutcome {
    let trimmed = command.trim();
    debug!("executing: {}", escape_log(trimmed));

    if trimmed == "cd" || trimmed.starts_with("cd ") {
        return change_directory(trimmed);
    }
    if trimmed == "clear" {
        // ANSI clear-screen plus cursor home, straight to our terminal.
        print!("\x1b[2J\x1b[1;1H");
        let _ = std::io::stdout().flush();
        return CommandOutcome::success(command);
    }

    match Command::new("bash").arg("-c").arg(trimmed).output() {
        Ok(output) => CommandOutcome {
            command: command.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            // Killed-by-signal has no code; report -1 so it still reads as
            // failure to the engine.
            exit_status: output.status.code().unwrap_or(-1),
        },
        Err(e) => {
            error!("failed to launch bash for {}: {}", escape_log(trimmed), e);
            CommandOutcome::failure(
                command,
                &format!("shellquest: failed to launch bash: {}", e),
                127,
            )
        }
    }
}

/// Handle `cd` by changing this process's working directory. Bare `cd`
/// goes home; `~` expands against the home directory.
fn change_directory(command: &str) -> CommandOutcome {
    let target = command
        .split_whitespace()
        .nth(1)
        .unwrap_or("~")
        .to_string();
    let expanded = if target == "~" {
        match dirs::home_dir() {
            Some(home) => home,
            None => {
                return CommandOutcome::failure(command, "bash: cd: HOME not set", 1);
            }
        }
    } else if let Some(rest) = target.strip_prefix("~/") {
        match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => {
                return CommandOutcome::failure(command, "bash: cd: HOME not set", 1);
            }
        }
    } else {
        std::path::PathBuf::from(&target)
    };

    match std::env::set_current_dir(&expanded) {
        Ok(()) => CommandOutcome::success(command),
        Err(_) => CommandOutcome::failure(
            command,
            &format!("bash: cd: {}: No such file or directory", target),
            1,
        ),
    }
}
