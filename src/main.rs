//! Binary entrypoint for the shellquest CLI.
//!
//! Commands:
//! - `play` - run the interactive tutor (the default when no command given)
//! - `init` - create a starter `config.toml` and starter quest files
//! - `status` - print saved progress and a catalog summary
//! - `validate` - load all quest files and report configuration problems
//!
//! See the library crate docs for module-level details: `shellquest::`.
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use log::info;

use shellquest::config::Config;
use shellquest::game::{load_catalog, write_starter_quests, CheckRegistry, QuestEngine, SaveState};
use shellquest::session::GameSession;

#[derive(Parser)]
#[command(name = "shellquest")]
#[command(about = "An interactive terminal tutor that teaches the shell through quests")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive tutor
    Play,
    /// Initialize a starter configuration and quest files
    Init,
    /// Show saved progress and catalog summary
    Status,
    /// Validate quest files without playing
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Play);

    match command {
        Commands::Play => {
            let config = Config::load(&cli.config)?;
            // Interactive mode: keep the prompt clean, log to file only.
            init_logging(Some(&config), cli.verbose, false);
            info!("starting shellquest v{}", env!("CARGO_PKG_VERSION"));
            let mut session = GameSession::new(&config)?;
            session.run()?;
            Ok(())
        }
        Commands::Init => {
            init_logging(None, cli.verbose, true);
            Config::create_default(&cli.config)?;
            let config = Config::load(&cli.config)?;
            let written = write_starter_quests(&config.game.quest_dir)?;
            println!("Created {}", cli.config);
            for path in &written {
                println!("Created {}", path.display());
            }
            println!("Run `shellquest` to start playing.");
            Ok(())
        }
        Commands::Status => {
            let config = Config::load_or_default(&cli.config)?;
            init_logging(Some(&config), cli.verbose, true);
            print_status(&config)
        }
        Commands::Validate => {
            let config = Config::load_or_default(&cli.config)?;
            init_logging(Some(&config), cli.verbose, true);
            let registry = CheckRegistry::with_builtins();
            let catalog = load_catalog(&config.game.quest_dir, &registry)?;
            if catalog.is_empty() {
                bail!("no playable quests in {}", config.game.quest_dir);
            }
            println!("{} quests OK:", catalog.len());
            for quest in &catalog {
                println!(
                    "  {} - {} ({} checks)",
                    quest.id(),
                    quest.title(),
                    quest.checks().len()
                );
            }
            Ok(())
        }
    }
}

fn print_status(config: &Config) -> Result<()> {
    let registry = CheckRegistry::with_builtins();
    let catalog = load_catalog(&config.game.quest_dir, &registry)?;
    if catalog.is_empty() {
        bail!(
            "no quests found in {} (run `shellquest init` first)",
            config.game.quest_dir
        );
    }

    let mut engine = QuestEngine::new();
    engine.load(catalog);
    if let Some(save) = SaveState::load(&config.game.save_file) {
        engine.restore(&save);
    }

    let total = engine.catalog().len();
    let done = engine.catalog().iter().filter(|q| q.is_complete()).count();
    println!("Progress: {}/{} missions complete", done, total);
    for quest in engine.catalog() {
        let marker = if quest.is_complete() { "x" } else { " " };
        println!("  [{}] {} - {}", marker, quest.id(), quest.title());
    }
    if let Some(view) = engine.quest_log() {
        println!();
        println!("Active mission: {}", view.title);
        for row in &view.rows {
            let marker = if row.done { "x" } else { " " };
            println!("  [{}] {}", marker, row.description);
        }
    }
    Ok(())
}

/// Configure env_logger: level from config unless `-v` overrides, single
/// timestamped lines, and an optional log file. With `console` off (the
/// interactive session) records go only to the file so the prompt stays
/// clean; with it on, records echo to stderr when attached to a terminal.
fn init_logging(config: Option<&Config>, verbosity: u8, console: bool) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();

    let base_level = match verbosity {
        0 => config
            .and_then(|cfg| cfg.level_filter().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config.and_then(|cfg| cfg.logging.file.as_deref());
    if let Some(file) = log_file {
        if let Ok(f) = std::fs::OpenOptions::new().create(true).append(true).open(file) {
            let sink = std::sync::Arc::new(std::sync::Mutex::new(f));
            let echo = console && atty::is(atty::Stream::Stderr);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = sink.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if echo {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
            let _ = builder.try_init();
            return;
        }
    }

    builder.format(|fmt, record| {
        writeln!(
            fmt,
            "{} [{}] {}",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
            record.level(),
            record.args()
        )
    });
    let _ = builder.try_init();
}
