//! The interactive session: read → route → execute → print → observe → save.
//!
//! One command is executed and fully resolved before the engine evaluates
//! it; the whole loop is single-threaded and turn-based. Evaluation errors
//! never escape a turn: the worst a broken check can do is log a line and
//! leave the objective unsatisfied.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use log::{info, warn};

use crate::config::Config;
use crate::game::{
    load_catalog, CheckRegistry, EngineState, GameError, QuestEngine, SaveState,
};
use crate::logutil::escape_log;
use crate::shell::{execute, parse_meta, MetaCommand};
use crate::ui::Narrator;

const PROMPT: &str = "shellquest$ ";

pub struct GameSession {
    registry: CheckRegistry,
    engine: QuestEngine,
    narrator: Narrator,
    save_path: PathBuf,
    resumed: bool,
}

impl GameSession {
    /// Build a session: load the catalog (fatal if empty or invalid), then
    /// replay any existing save onto it.
    pub fn new(config: &Config) -> Result<Self, GameError> {
        let registry = CheckRegistry::with_builtins();
        let catalog = load_catalog(&config.game.quest_dir, &registry)?;
        if catalog.is_empty() {
            return Err(GameError::EmptyCatalog);
        }

        let mut engine = QuestEngine::new();
        engine.load(catalog);

        let save_path = PathBuf::from(&config.game.save_file);
        let resumed = match SaveState::load(&save_path) {
            Some(save) => {
                engine.restore(&save);
                info!("resumed progress from {}", save_path.display());
                true
            }
            None => false,
        };

        Ok(Self {
            registry,
            engine,
            narrator: Narrator::new(&config.game.mentor_name),
            save_path,
            resumed,
        })
    }

    /// Run the turn loop until `exit` or end of input.
    pub fn run(&mut self) -> Result<(), GameError> {
        self.narrator
            .say("System online. Welcome to shellquest, operator. Type `help` if you're lost.");
        self.print_banner();

        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            print!("{}", PROMPT);
            io::stdout().flush()?;

            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                break; // EOF
            }
            let command = line.trim();
            if command.is_empty() {
                continue;
            }

            if let Some(meta) = parse_meta(command) {
                if matches!(meta, MetaCommand::Exit) {
                    break;
                }
                self.handle_meta(meta);
                continue;
            }

            self.turn(command);
        }

        self.narrator.say("...Signal lost. Disconnecting...");
        Ok(())
    }

    /// Execute one bash command and feed the outcome to the engine.
    fn turn(&mut self, command: &str) {
        let outcome = execute(command);
        if !outcome.stdout.is_empty() {
            println!("{}", outcome.stdout);
        }
        if !outcome.stderr.is_empty() {
            eprintln!("{}", outcome.stderr);
        }

        let events = self.engine.observe(&outcome, &self.registry);
        for event in &events {
            self.narrator.narrate(event);
        }
        if !events.is_empty() {
            // A gate can open without an event of its own, so every
            // eventful turn gets persisted.
            if let Err(e) = self.engine.snapshot().write(&self.save_path) {
                warn!("could not persist progress: {}", e);
            }
        }
    }

    /// Welcome banner: the active mission, or where things stand.
    fn print_banner(&self) {
        match self.engine.state() {
            EngineState::QuestActive { .. } => {
                if self.resumed {
                    self.narrator.say("Picking up where we left off.");
                }
                if let Some(quest) = self.engine.active_quest() {
                    println!();
                    self.narrator
                        .say(&format!("Current mission: {}", quest.title()));
                    self.narrator.say(quest.description());
                }
            }
            EngineState::AllQuestsComplete => {
                self.narrator
                    .say("Every mission is already complete. The shell is all yours.");
            }
            EngineState::NoQuestsLoaded => {}
        }
    }

    fn handle_meta(&mut self, meta: MetaCommand) {
        match meta {
            MetaCommand::Help(topic) => self.help(topic.as_deref()),
            MetaCommand::QuestLog => {
                self.narrator.quest_log(self.engine.quest_log().as_ref());
            }
            MetaCommand::Cypher(arg) => self.cypher(arg.as_deref()),
            MetaCommand::Scan(arg) => self.scan(arg.as_deref()),
            // The loop intercepts Exit before dispatching here.
            MetaCommand::Exit => {}
        }
    }

    fn help(&self, topic: Option<&str>) {
        match topic {
            None => self.narrator.say(
                "This is a live terminal: any bash command (`ls`, `pwd`, `cd`) runs for real.\n\
                 I also answer to a few verbs of my own:\n\
                 \x20 quest  - show your current mission log\n\
                 \x20 cypher - talk to me directly (try `cypher hint`)\n\
                 \x20 scan   - probe the network (when you get there)\n\
                 \x20 exit   - sever the link",
            ),
            Some("quest") | Some("log") => self
                .narrator
                .say("`quest` (or `log`) shows your mission objectives. It's your to-do list."),
            Some("cd") => self
                .narrator
                .say("`cd` changes directory. `cd /var/log` moves you; bare `cd` goes home."),
            Some(other) => {
                info!("help requested for unknown topic {}", escape_log(other));
                self.narrator.say(&format!(
                    "No help file for `{}`. Try running it and see what happens.",
                    other
                ));
            }
        }
    }

    fn cypher(&self, arg: Option<&str>) {
        match arg {
            None => self
                .narrator
                .say("I'm here, operator. Need something? Ask me for a `hint`."),
            Some("hint") => match self.engine.hint() {
                Some(hint) => self.narrator.say(hint),
                None => self
                    .narrator
                    .say("No specific hint right now. Check your `quest` log."),
            },
            Some("status") | Some("lore") => self.narrator.say(
                "My origins are complicated. I'm a fragment, keeping the signal alive.",
            ),
            Some(other) => self.narrator.say(&format!(
                "I don't understand `{}`. Try `cypher hint` or `cypher status`.",
                other
            )),
        }
    }

    fn scan(&self, arg: Option<&str>) {
        match arg {
            None => self
                .narrator
                .say("Scan what? The local subnet? Try `scan local`."),
            Some("local") => self
                .narrator
                .say("Pinging the local subnet... nothing answering yet. We'll need a route up first."),
            Some(other) => self
                .narrator
                .say(&format!("No scan module for `{}` yet.", other)),
        }
    }
}
