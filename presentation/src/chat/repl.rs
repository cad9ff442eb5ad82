//! REPL (Read-Eval-Print Loop) for interactive chat

use super::observer::ConsoleObserver;
use crate::output::console::ConsoleFormatter;
use crate::output::markdown::clean_markdown;
use colored::Colorize;
use hiremate_application::{ChatError, ChatReply, ChatSession};
use hiremate_domain::Question;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use tokio_util::sync::CancellationToken;
use tracing::warn;

const HISTORY_CAPACITY: usize = 500;

/// Outcome of a slash command
#[derive(Debug, PartialEq, Eq)]
enum CommandResult {
    Continue,
    Exit,
}

/// Interactive chat REPL
pub struct ChatRepl {
    session: ChatSession,
    stream: bool,
    show_progress: bool,
}

impl ChatRepl {
    pub fn new(session: ChatSession) -> Self {
        Self {
            session,
            stream: true,
            show_progress: true,
        }
    }

    /// Set whether answers are streamed
    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut line_editor = Reedline::create();

        let history_path = dirs::data_dir().map(|p| p.join("hiremate").join("chat_history.txt"));
        if let Some(path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(HISTORY_CAPACITY, path) {
                Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
                Err(e) => warn!("Input history disabled: {}", e),
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("hiremate".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match line_editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line) == CommandResult::Exit {
                            break;
                        }
                        continue;
                    }

                    let _ = self.ask(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                Signal::CtrlD => {
                    println!("Good luck with your interview!");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Ask one question and print the answer.
    ///
    /// A stream that cannot be reached falls back to the single-request
    /// endpoint, whose reply is printed here. Streaming failures that are
    /// returned have already been shown to the user. Non-streaming asks
    /// always succeed.
    pub async fn ask(&mut self, text: &str) -> Result<(), ChatError> {
        let Some(question) = Question::try_new(text) else {
            return Ok(());
        };

        if !self.stream {
            let reply = self.session.send_non_streaming(&question).await;
            Self::print_reply(&reply);
            return Ok(());
        }

        let mut observer = ConsoleObserver::new(self.show_progress);
        let cancel = CancellationToken::new();
        let watcher = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            })
        };

        let result = self.session.send(&question, &mut observer, &cancel).await;
        watcher.abort();

        match result? {
            ChatReply::Streamed(_) => {}
            ChatReply::Asked(reply) => Self::print_reply(&reply),
        }
        Ok(())
    }

    fn print_reply(reply: &str) {
        println!("{} {}", "coach>".green().bold(), clean_markdown(reply));
        println!();
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│       HireMate - Interview Coach Chat       │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Backend: {}", self.session.endpoints().primary());
        if let Some(alternate) = self.session.endpoints().alternate() {
            println!("Fallback: {}", alternate);
        }
        println!("Streaming: {}", if self.stream { "on" } else { "off" });
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?      - Show this help");
        println!("  /history           - Show this conversation");
        println!("  /clear             - Forget this conversation");
        println!("  /stream on|off     - Toggle streamed answers");
        println!("  /quit, /exit, /q   - Exit chat");
        println!();
    }

    /// Handle slash commands.
    fn handle_command(&mut self, cmd: &str) -> CommandResult {
        let mut parts = cmd.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        match (name, arg) {
            ("/quit" | "/exit" | "/q", _) => {
                println!("Good luck with your interview!");
                return CommandResult::Exit;
            }
            ("/help" | "/h" | "/?", _) => Self::print_help(),
            ("/history", _) => {
                println!("{}", ConsoleFormatter::format_history(self.session.history()));
                println!();
            }
            ("/clear", _) => {
                self.session.clear_history();
                println!("Conversation cleared.");
            }
            ("/stream", Some("on")) => {
                self.stream = true;
                println!("Streaming on.");
            }
            ("/stream", Some("off")) => {
                self.stream = false;
                println!("Streaming off.");
            }
            ("/stream", _) => {
                println!("Streaming is {}.", if self.stream { "on" } else { "off" });
            }
            _ => {
                println!("Unknown command: {}. Type /help for commands.", cmd);
            }
        }

        CommandResult::Continue
    }
}
