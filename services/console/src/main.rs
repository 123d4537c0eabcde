//! Terminal front end for practising consultations with a synthetic patient.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use synthetic_patients_core::{
    EngineEvent, ExportFormat, Picker, PersonaStore, ScenarioCatalog, SeededPicker,
    ThreadRngPicker, TurnEngine,
};
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod command;
mod console;

use console::Console;

#[derive(Parser, Debug)]
#[command(name = "synthetic-patients", version, about = "Practise difficult medical conversations with a synthetic patient", long_about = None)]
struct Cli {
    /// Persona to consult. Use --list to see the available ids.
    #[arg(short, long, default_value = "ahmed-al-farsi")]
    persona: String,

    /// Seed for reproducible persona replies.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON persona catalog to use instead of the built-in personas.
    #[arg(long, env = "PERSONAS_PATH")]
    personas: Option<PathBuf>,

    /// List the available personas and exit.
    #[arg(long)]
    list: bool,

    /// Pause before each reply, in milliseconds.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Write the transcript when the session ends (json or csv).
    #[arg(long)]
    export: Option<ExportFormat>,

    /// Directory for exported transcripts.
    #[arg(long, default_value = ".")]
    export_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let scenarios = Arc::new(ScenarioCatalog::builtin());
    let personas = Arc::new(match &cli.personas {
        Some(path) => PersonaStore::from_json_file(path, &scenarios)
            .with_context(|| format!("Failed to load personas from {}", path.display()))?,
        None => PersonaStore::builtin(),
    });

    let picker: Box<dyn Picker> = match cli.seed {
        Some(seed) => {
            info!(seed, "Using seeded reply selection");
            Box::new(SeededPicker::new(seed))
        }
        None => Box::new(ThreadRngPicker),
    };

    // Speech and avatar hooks: this front end only traces them.
    let (tx, mut rx) = mpsc::unbounded_channel::<EngineEvent>();
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            debug!(?event, "Engine event");
        }
    });

    let engine = TurnEngine::new(personas.clone(), scenarios, picker).with_events(tx);
    let mut console = Console::new(
        engine,
        personas,
        std::io::stdout(),
        Duration::from_millis(cli.delay_ms),
        cli.export_dir.clone(),
    );

    if cli.list {
        console.list_patients()?;
        return Ok(());
    }

    console.start(&cli.persona)?;
    println!("{}", command::HELP);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    console.run(stdin).await?;

    if let Some(format) = cli.export {
        console.export(format, None)?;
    }
    Ok(())
}
