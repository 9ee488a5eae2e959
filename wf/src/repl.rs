//! Follow-up chat REPL

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::domain::{ChatMessage, ChatRole};
use crate::error::TripError;
use crate::planner::PlannerHandle;

/// Interactive follow-up session over a planned trip
pub struct ChatRepl {
    planner: PlannerHandle,
}

impl ChatRepl {
    pub fn new(planner: PlannerHandle) -> Self {
        Self { planner }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        debug!("ChatRepl::run: called");
        self.print_welcome().await?;

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    if matches!(input, "/quit" | "/q" | "/exit") {
                        break;
                    }
                    self.ask(&line).await?;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Safe travels!");
        Ok(())
    }

    async fn print_welcome(&self) -> Result<()> {
        println!();
        println!("{}", "Trip chat".bright_cyan().bold());
        let view = self.planner.snapshot().await?;
        for message in view.transcript.messages() {
            print_message(message);
        }
        println!("Type {} to quit", "/quit".yellow());
        println!();
        Ok(())
    }

    async fn ask(&self, question: &str) -> Result<()> {
        println!("{}", "Thinking...".dimmed());
        match self.planner.ask(question).await {
            Ok(answer) => print_message(&answer),
            Err(e @ (TripError::ChatBusy | TripError::NoItinerary | TripError::Validation(_))) => {
                eprintln!("{} {}", "✗".red(), e.to_string().red());
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }
}

fn print_message(message: &ChatMessage) {
    match message.role {
        ChatRole::Assistant => {
            println!("{}", "assistant:".bright_blue().bold());
            println!("{}", message.content);
        }
        ChatRole::User => println!("{} {}", "you:".bright_green().bold(), message.content),
    }
    println!();
}
