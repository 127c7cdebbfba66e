//! Presentation layer: the mentor persona.
//!
//! The engine emits plain narrative strings and structured display data;
//! everything the player reads goes through the narrator so the voice stays
//! consistent. No styling framework, just formatted text.

use crate::game::{EngineEvent, QuestLogView};

pub struct Narrator {
    name: String,
}

impl Narrator {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// Print a line in the mentor's voice.
    pub fn say(&self, message: &str) {
        println!("{}: {}", self.name, message);
    }

    /// Render one engine event as narration.
    pub fn narrate(&self, event: &EngineEvent) {
        match event {
            EngineEvent::QuestStarted { title, description } => {
                println!();
                self.say(&format!("New mission: {}", title));
                self.say(description);
            }
            EngineEvent::ObjectiveComplete { message } => self.say(message),
            EngineEvent::QuestComplete { title } => {
                self.say(&format!("Mission complete: {}", title));
            }
            EngineEvent::GateBlocked { feedback } => self.say(feedback),
            EngineEvent::CheckPending { feedback } => self.say(feedback),
            EngineEvent::AllQuestsComplete => {
                self.say("Signal strong. Every mission complete. The system is yours, operator.");
            }
        }
    }

    /// Render the quest log: title, flavor text, and per-step status in
    /// declared order.
    pub fn quest_log(&self, view: Option<&QuestLogView>) {
        let Some(view) = view else {
            self.say("No active mission. The log is quiet.");
            return;
        };
        println!("=== {} ===", view.title);
        println!("{}", view.description);
        println!("Objectives:");
        for row in &view.rows {
            let marker = if row.done { "x" } else { " " };
            println!("  [{}] {}", marker, row.description);
        }
    }
}
