//! Console formatting of conversation state.

use colored::Colorize;
use hiremate_domain::{ConversationHistory, Sender};

/// Formats conversation data for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render the session's history, oldest first.
    pub fn format_history(history: &ConversationHistory) -> String {
        if history.is_empty() {
            return "No messages yet.".dimmed().to_string();
        }

        history
            .turns()
            .iter()
            .map(|turn| {
                let who = match turn.sender {
                    Sender::User => "you".cyan().bold(),
                    Sender::Bot => "coach".green().bold(),
                };
                format!(
                    "{} {} {}",
                    turn.timestamp.format("%H:%M:%S").to_string().dimmed(),
                    who,
                    turn.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiremate_domain::ConversationTurn;

    #[test]
    fn empty_history_message() {
        colored::control::set_override(false);
        assert_eq!(
            ConsoleFormatter::format_history(&ConversationHistory::new()),
            "No messages yet."
        );
    }

    #[test]
    fn lists_turns_in_order() {
        colored::control::set_override(false);
        let mut history = ConversationHistory::new();
        history.push(ConversationTurn::user("hello"));
        history.push(ConversationTurn::bot("Hi! Which role?"));

        let out = ConsoleFormatter::format_history(&history);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("you hello"));
        assert!(lines[1].ends_with("coach Hi! Which role?"));
    }
}
