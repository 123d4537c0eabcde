//! Interactive consultation loop over a line-based reader and writer.

use crate::command::{Command, HELP};
use anyhow::Context;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use synthetic_patients_core::{
    EngineError, ExportFormat, PersonaStore, SessionSummary, TurnEngine,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

/// Drives one engine from operator input, writing the transcript to `out`.
pub struct Console<W> {
    engine: TurnEngine,
    personas: std::sync::Arc<PersonaStore>,
    out: W,
    thinking_delay: Duration,
    export_dir: PathBuf,
}

impl<W: Write> Console<W> {
    pub fn new(
        engine: TurnEngine,
        personas: std::sync::Arc<PersonaStore>,
        out: W,
        thinking_delay: Duration,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            engine,
            personas,
            out,
            thinking_delay,
            export_dir,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn list_patients(&mut self) -> anyhow::Result<()> {
        for persona in self.personas.iter() {
            writeln!(
                self.out,
                "  {:<16} {:<18} {:>3}  {:<18} {}",
                persona.id,
                persona.display_name(),
                persona.demographics.age,
                persona.scenario,
                persona.medical_history.diagnosis
            )?;
        }
        Ok(())
    }

    pub fn start(&mut self, persona_id: &str) -> anyhow::Result<()> {
        let greeting = self.engine.start(persona_id)?;
        let context = &greeting.context;
        writeln!(
            self.out,
            "--- {} ({}), {} ---",
            context.name, context.age, context.scenario
        )?;
        writeln!(self.out, "Learning objectives:")?;
        for objective in &greeting.learning_objectives {
            writeln!(self.out, "  - {objective}")?;
        }
        writeln!(self.out, "{}: {}", context.name, greeting.turn.text)?;
        self.write_suggestions(&greeting.suggested_replies)?;
        Ok(())
    }

    /// Handles one input line. Returns `false` when the operator quits.
    pub async fn handle(&mut self, line: &str) -> anyhow::Result<bool> {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(self.out, "{e}")?;
                return Ok(true);
            }
        };

        let result = match command {
            Command::Quit => return Ok(false),
            Command::Say(text) => self.say(&text).await,
            Command::Start(id) => self.start(&id),
            Command::Patients => self.list_patients(),
            Command::Context => self.show_context(),
            Command::Summary => self
                .engine
                .summary()
                .map_err(Into::into)
                .and_then(|s| self.write_summary(&s)),
            Command::End => self.end(),
            Command::Export { format, dir } => self.export(format, dir.as_deref()).map(|_| ()),
            Command::Help => writeln!(self.out, "{HELP}").map_err(Into::into),
        };

        // Engine rejections are part of the conversation, not fatal errors.
        if let Err(e) = result {
            match e.downcast_ref::<EngineError>() {
                Some(engine_error) => writeln!(self.out, "! {engine_error}")?,
                None => return Err(e),
            }
        }
        Ok(true)
    }

    async fn say(&mut self, text: &str) -> anyhow::Result<()> {
        let pending = self.engine.begin_turn(text)?;
        if !self.thinking_delay.is_zero() {
            writeln!(self.out, "...")?;
            self.out.flush()?;
            tokio::time::sleep(self.thinking_delay).await;
        }
        let Some(outcome) = self.engine.complete_turn(pending) else {
            return Ok(());
        };

        writeln!(
            self.out,
            "{} [{}]: {}",
            outcome.context.name, outcome.context.emotional_state, outcome.reply.text
        )?;
        let analysis = &outcome.analysis;
        writeln!(
            self.out,
            "  (empathy {}, informative {}, phase {})",
            analysis.empathy, analysis.informative, outcome.context.phase
        )?;
        for strength in &outcome.feedback.strengths {
            writeln!(self.out, "  + {strength}")?;
        }
        for improvement in &outcome.feedback.improvements {
            writeln!(self.out, "  - {improvement}")?;
        }
        for tip in &outcome.feedback.communication_tips {
            writeln!(self.out, "  * {tip}")?;
        }
        self.write_suggestions(&outcome.suggested_replies)
    }

    fn show_context(&mut self) -> anyhow::Result<()> {
        let context = self.engine.context()?;
        writeln!(self.out, "{} ({}), {}", context.name, context.age, context.scenario)?;
        writeln!(self.out, "  Diagnosis: {}", context.diagnosis)?;
        writeln!(self.out, "  Cultural factors: {}", context.cultural_factors)?;
        writeln!(
            self.out,
            "  Concerns: {}",
            context.primary_concerns.join(", ")
        )?;
        writeln!(
            self.out,
            "  Phase: {}, emotional state: {}",
            context.phase, context.emotional_state
        )?;
        Ok(())
    }

    fn end(&mut self) -> anyhow::Result<()> {
        let summary = self.engine.end()?;
        writeln!(self.out, "--- Consultation ended ---")?;
        self.write_summary(&summary)
    }

    /// Writes the transcript and returns the file path.
    pub fn export(&mut self, format: ExportFormat, dir: Option<&Path>) -> anyhow::Result<PathBuf> {
        let record = self.engine.export()?;
        let body = record.render(format)?;
        let dir = dir.unwrap_or(&self.export_dir);
        let path = dir.join(record.file_name(format));
        std::fs::write(&path, body)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(path = %path.display(), turns = record.turns.len(), "Exported session");
        writeln!(self.out, "Saved {}", path.display())?;
        Ok(path)
    }

    fn write_summary(&mut self, summary: &SessionSummary) -> anyhow::Result<()> {
        writeln!(
            self.out,
            "Exchanges: {}  Duration: {}  Average empathy: {:.2}  Rating: {:.1}/10",
            summary.exchange_count,
            summary.duration_label(),
            summary.average_empathy,
            summary.empathy_rating
        )?;
        let phases: Vec<&str> = summary.phases_visited.iter().map(|p| p.as_str()).collect();
        writeln!(self.out, "Phases: {}", phases.join(" -> "))?;
        Ok(())
    }

    fn write_suggestions(&mut self, suggestions: &[String]) -> anyhow::Result<()> {
        writeln!(self.out, "Try:")?;
        for suggestion in suggestions {
            writeln!(self.out, "  > {suggestion}")?;
        }
        Ok(())
    }

    /// Reads lines until end of input or `/quit`.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> anyhow::Result<()> {
        let mut lines = input.lines();
        loop {
            write!(self.out, "you> ")?;
            self.out.flush()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            if !self.handle(&line).await? {
                break;
            }
        }
        if self.engine.is_active() {
            match self.engine.end() {
                Ok(summary) => {
                    writeln!(self.out)?;
                    self.write_summary(&summary)?;
                }
                Err(e) => warn!(error = %e, "Could not close session on exit"),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use synthetic_patients_core::{ScenarioCatalog, SeededPicker};

    fn console(export_dir: PathBuf) -> Console<Vec<u8>> {
        let personas = Arc::new(PersonaStore::builtin());
        let engine = TurnEngine::new(
            personas.clone(),
            Arc::new(ScenarioCatalog::builtin()),
            Box::new(SeededPicker::new(1)),
        );
        Console::new(engine, personas, Vec::new(), Duration::ZERO, export_dir)
    }

    fn output(console: Console<Vec<u8>>) -> String {
        String::from_utf8(console.into_inner()).unwrap()
    }

    #[tokio::test]
    async fn test_scripted_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut console = console(dir.path().to_path_buf());
        console.start("ahmed-al-farsi").unwrap();

        let script = "I understand how difficult this is.\n/summary\n/export csv\n/quit\nnever read\n";
        console.run(script.as_bytes()).await.unwrap();

        let text = output(console);
        assert!(text.contains("--- Ahmed Al-Farsi"));
        assert!(text.contains("Ahmed Al-Farsi [trusting]:"));
        assert!(text.contains("+ Good use of empathetic language"));
        assert!(text.contains("Exchanges: 1"));
        assert!(text.contains("Saved "));

        let exported: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(exported.len(), 1);
    }

    #[tokio::test]
    async fn test_engine_errors_are_reported_not_fatal() {
        let mut console = console(PathBuf::from("."));
        assert!(console.handle("Hello?").await.unwrap());
        assert!(console.handle("/start nobody").await.unwrap());
        assert!(console.handle("/bogus").await.unwrap());

        let text = output(console);
        assert!(text.contains("! Invalid state: no active session"));
        assert!(text.contains("! Persona 'nobody' not found"));
        assert!(text.contains("Unknown command '/bogus'"));
    }

    #[tokio::test]
    async fn test_end_of_input_closes_session() {
        let mut console = console(PathBuf::from("."));
        console.start("james-wilson").unwrap();
        console.run("Hello\n".as_bytes()).await.unwrap();

        assert!(!console.engine.is_active());
        assert!(output(console).contains("Exchanges: 1"));
    }

    #[test]
    fn test_list_patients() {
        let mut console = console(PathBuf::from("."));
        console.list_patients().unwrap();
        let text = output(console);
        for id in ["ahmed-al-farsi", "maria-santos", "james-wilson", "jennifer-chen"] {
            assert!(text.contains(id));
        }
    }
}
