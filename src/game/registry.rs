//! Check registry and built-in predicates.
//!
//! The registry is the single extension point for new check kinds: a table
//! from kind name to a pure predicate over live system state. It is built
//! once at startup and validated against at catalog-load time, so an
//! unregistered kind can never reach runtime evaluation.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use log::debug;

use crate::game::errors::EvalError;
use crate::game::types::{CheckArgs, CheckValue, CommandOutcome, PathKind};

/// Predicate signature: inspect system state (or the observed command) and
/// return the value to compare against a condition's expected value.
pub type CheckFn = fn(&CheckArgs, &EvalContext) -> Result<CheckValue, EvalError>;

/// Evaluation context handed to predicates. `command` is present when a
/// check runs against a just-executed command and absent for pull-style
/// gated evaluation. `home_override` redirects `~` expansion, used by tests.
#[derive(Debug, Default)]
pub struct EvalContext<'a> {
    pub command: Option<&'a CommandOutcome>,
    pub home_override: Option<PathBuf>,
}

impl<'a> EvalContext<'a> {
    pub fn for_command(outcome: &'a CommandOutcome) -> Self {
        Self {
            command: Some(outcome),
            home_override: None,
        }
    }

    /// Context with no observed command, for ambient system-state audits.
    pub fn ambient() -> Self {
        Self {
            command: None,
            home_override: None,
        }
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home_override.clone().or_else(dirs::home_dir)
    }

    /// Expand a leading `~` or `~/` against the home directory. Paths that
    /// don't start with `~` (or name another user's home) pass through.
    pub fn expand_path(&self, path: &str) -> PathBuf {
        if path == "~" {
            if let Some(home) = self.home_dir() {
                return home;
            }
        } else if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = self.home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }
}

/// Table of check predicates keyed by kind name.
pub struct CheckRegistry {
    predicates: HashMap<String, CheckFn>,
}

impl CheckRegistry {
    /// Empty registry; most callers want [`CheckRegistry::with_builtins`].
    pub fn new() -> Self {
        Self {
            predicates: HashMap::new(),
        }
    }

    /// Registry populated with the five built-in checks.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("command_run", command_run);
        registry.register("path_exists", path_exists);
        registry.register("permission_check", permission_check);
        registry.register("owner_check", owner_check);
        registry.register("network_route_check", network_route_check);
        registry
    }

    /// Add or overwrite a predicate. Overwriting a built-in is how tests
    /// stub out environment-dependent checks.
    pub fn register(&mut self, kind: &str, predicate: CheckFn) {
        self.predicates.insert(kind.to_string(), predicate);
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.predicates.contains_key(kind)
    }

    /// Registered kind names, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.predicates.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Run the predicate registered for this check's kind. Missing files,
    /// unknown accounts, and failed queries come back as unsatisfied values
    /// or an [`EvalError`], never as a panic or a raw system error.
    pub fn evaluate(
        &self,
        args: &CheckArgs,
        ctx: &EvalContext,
    ) -> Result<CheckValue, EvalError> {
        let kind = args.kind();
        let predicate = self
            .predicates
            .get(kind)
            .ok_or_else(|| EvalError::UnknownKind(kind.to_string()))?;
        predicate(args, ctx)
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

// --- Built-in predicates ---

/// True iff the first whitespace token of the observed command, lowercased,
/// equals the expected verb. No observed command means no match.
fn command_run(args: &CheckArgs, ctx: &EvalContext) -> Result<CheckValue, EvalError> {
    let CheckArgs::CommandRun { verb } = args else {
        return Err(EvalError::ArgumentMismatch {
            kind: "command_run",
            got: args.kind(),
        });
    };
    let Some(outcome) = ctx.command else {
        return Ok(CheckValue::Bool(false));
    };
    let ran = outcome
        .command
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase();
    Ok(CheckValue::Bool(ran == verb.to_lowercase()))
}

/// True iff the path exists as the requested kind, after `~` expansion.
fn path_exists(args: &CheckArgs, ctx: &EvalContext) -> Result<CheckValue, EvalError> {
    let CheckArgs::PathExists { path, kind } = args else {
        return Err(EvalError::ArgumentMismatch {
            kind: "path_exists",
            got: args.kind(),
        });
    };
    let full = ctx.expand_path(path);
    let found = match kind {
        PathKind::File => full.is_file(),
        PathKind::Directory => full.is_dir(),
    };
    Ok(CheckValue::Bool(found))
}

/// Permission bits of the path formatted as a 3-digit octal string, compared
/// to the expected mode. A missing path is unsatisfied, not an error.
fn permission_check(args: &CheckArgs, ctx: &EvalContext) -> Result<CheckValue, EvalError> {
    let CheckArgs::PermissionCheck { path, mode } = args else {
        return Err(EvalError::ArgumentMismatch {
            kind: "permission_check",
            got: args.kind(),
        });
    };
    let full = ctx.expand_path(path);
    let metadata = match fs::metadata(&full) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(CheckValue::Bool(false));
        }
        Err(e) => return Err(e.into()),
    };
    use std::os::unix::fs::PermissionsExt;
    let bits = metadata.permissions().mode() & 0o777;
    let observed = format!("{:03o}", bits);
    debug!("permission_check {}: observed {}", full.display(), observed);
    Ok(CheckValue::Bool(observed == *mode))
}

/// Owning account name of the path compared to the expected owner. Missing
/// path or unresolvable uid is unsatisfied, not an error.
fn owner_check(args: &CheckArgs, ctx: &EvalContext) -> Result<CheckValue, EvalError> {
    let CheckArgs::OwnerCheck { path, owner } = args else {
        return Err(EvalError::ArgumentMismatch {
            kind: "owner_check",
            got: args.kind(),
        });
    };
    let full = ctx.expand_path(path);
    let metadata = match fs::metadata(&full) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(CheckValue::Bool(false));
        }
        Err(e) => return Err(e.into()),
    };
    use std::os::unix::fs::MetadataExt;
    match account_name(metadata.uid())? {
        Some(name) => Ok(CheckValue::Bool(name == *owner)),
        None => Ok(CheckValue::Bool(false)),
    }
}

/// Resolve a uid to an account name via the system user database.
fn account_name(uid: u32) -> Result<Option<String>, EvalError> {
    let passwd = fs::read_to_string("/etc/passwd")?;
    for line in passwd.lines() {
        let mut fields = line.split(':');
        let name = fields.next();
        let _password = fields.next();
        let entry_uid = fields.next().and_then(|f| f.parse::<u32>().ok());
        if let (Some(name), Some(entry_uid)) = (name, entry_uid) {
            if entry_uid == uid {
                return Ok(Some(name.to_string()));
            }
        }
    }
    Ok(None)
}

/// True iff `ip route show` lists a route mentioning the target via the
/// given interface. Any query failure is unsatisfied, never an error.
fn network_route_check(args: &CheckArgs, _ctx: &EvalContext) -> Result<CheckValue, EvalError> {
    let CheckArgs::NetworkRouteCheck { target, interface } = args else {
        return Err(EvalError::ArgumentMismatch {
            kind: "network_route_check",
            got: args.kind(),
        });
    };
    let output = match Command::new("ip").args(["route", "show"]).output() {
        Ok(output) => output,
        Err(e) => {
            debug!("network_route_check: ip route show failed to spawn: {}", e);
            return Ok(CheckValue::Bool(false));
        }
    };
    if !output.status.success() {
        return Ok(CheckValue::Bool(false));
    }
    let table = String::from_utf8_lossy(&output.stdout);
    let device = format!("dev {}", interface);
    let routed = table
        .lines()
        .any(|line| line.contains(target.as_str()) && line.contains(&device));
    Ok(CheckValue::Bool(routed))
}
