//! Parsing of console input lines.

use std::path::PathBuf;
use std::str::FromStr;
use synthetic_patients_core::ExportFormat;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '/{0}'. Type /help for the list of commands.")]
    UnknownCommand(String),
    #[error("Unknown export format '{0}', expected json or csv")]
    UnknownFormat(String),
    #[error("/start needs a persona id, e.g. /start maria-santos")]
    MissingPersona,
}

/// One line typed by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Anything that is not a slash command is said to the persona.
    Say(String),
    Start(String),
    Patients,
    Context,
    Summary,
    End,
    Export {
        format: ExportFormat,
        dir: Option<PathBuf>,
    },
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Ok(Self::Say(line.to_string()));
        };

        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or_default().to_ascii_lowercase();
        match name.as_str() {
            "start" => words
                .next()
                .map(|id| Self::Start(id.to_string()))
                .ok_or(CommandError::MissingPersona),
            "patients" | "list" => Ok(Self::Patients),
            "context" => Ok(Self::Context),
            "summary" => Ok(Self::Summary),
            "end" => Ok(Self::End),
            "export" => {
                let format = words
                    .next()
                    .map(|word| {
                        word.parse::<ExportFormat>()
                            .map_err(|_| CommandError::UnknownFormat(word.to_ascii_lowercase()))
                    })
                    .transpose()?
                    .unwrap_or_default();
                Ok(Self::Export {
                    format,
                    dir: words.next().map(PathBuf::from),
                })
            }
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}

pub const HELP: &str = "\
Type a message to speak to the patient, or one of:
  /start <persona-id>      start a new consultation
  /patients                list available personas
  /context                 show the patient's current context
  /summary                 show the session summary
  /end                     end the consultation
  /export [json|csv] [dir] write the transcript to a file
  /quit                    leave";
