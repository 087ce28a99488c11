//! The interactive prompt accepted while the reminder loop runs — the
//! binding between the notification's take-now action and the engine.

use dosetick_core::MedicationId;

#[derive(Debug, PartialEq, Eq)]
pub enum PromptCommand {
    /// Acknowledge a dose: `take <id>`.
    Take(MedicationId),
    /// Leave the reminder loop: `quit` / `exit`.
    Quit,
    /// Blank line — ignored.
    Empty,
}

pub fn parse(line: &str) -> Result<PromptCommand, String> {
    let mut parts = line.split_whitespace();
    match parts.next() {
        None => Ok(PromptCommand::Empty),
        Some("take") => match (parts.next(), parts.next()) {
            (Some(id), None) => Ok(PromptCommand::Take(MedicationId::from(id))),
            _ => Err("usage: take <medication-id>".to_string()),
        },
        Some("quit") | Some("exit") => Ok(PromptCommand::Quit),
        Some(other) => Err(format!("unknown command: {other} (try 'take <id>' or 'quit')")),
    }
}
