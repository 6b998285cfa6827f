//! Interactive chat session.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use scout::agent::Agent;
use scout::session::Transcript;
use std::path::PathBuf;

use crate::error::Result;

/// Interactive chat session bound to one agent.
pub struct ChatSession {
    agent: Agent,
}

impl ChatSession {
    /// Create a session for the given agent.
    pub const fn new(agent: Agent) -> Self {
        Self { agent }
    }

    /// Run the interactive loop until `/quit` or Ctrl-D.
    ///
    /// Agent failures do not end the session; they print inline and the
    /// loop continues.
    ///
    /// # Errors
    ///
    /// Returns a readline error when the terminal cannot be driven.
    pub async fn run(&self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        let mut transcript = Transcript::new();

        loop {
            match rl.readline(">>> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if handle_command(line, &mut transcript) {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);
                    self.process_query(line, &mut transcript).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("error: {err}");
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("Scout Chat | model: {}", self.agent.model_id());
        println!();
        println!("Commands:");
        println!("  /help   - Show this help");
        println!("  /clear  - Reset the conversation");
        println!("  /quit   - Exit chat");
        println!();
    }

    /// Run one query with the session transcript replayed ahead of it.
    ///
    /// A failed turn is not recorded, so the model never sees a user
    /// message without its reply.
    async fn process_query(&self, query: &str, transcript: &mut Transcript) {
        match self.agent.run_with_history(query, transcript).await {
            Ok(result) => {
                println!("{}", result.output);
                transcript.push_user(query);
                transcript.push_assistant(&result.output);
            }
            Err(e) => {
                println!("error: {e}");
            }
        }
    }
}

/// Line-edit history location, shared across sessions.
fn history_path() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join("scout").join("history.txt"))
}

/// Handle slash commands. Returns true if the session should exit.
fn handle_command(cmd: &str, transcript: &mut Transcript) -> bool {
    match cmd {
        "/quit" | "/exit" | "/q" => {
            println!("Bye!");
            true
        }
        "/help" | "/h" | "/?" => {
            println!();
            println!("Commands:");
            println!("  /help, /h, /?    - Show this help");
            println!("  /clear           - Reset the conversation");
            println!("  /quit, /exit, /q - Exit chat");
            println!();
            false
        }
        "/clear" => {
            transcript.clear();
            println!("Conversation cleared.");
            false
        }
        _ => {
            println!("Unknown command: {cmd}");
            println!("Type /help for available commands");
            false
        }
    }
}
