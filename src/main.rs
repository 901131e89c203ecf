use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use playback::capture::{EditorEvent, InterpreterCapture, MonitorSpec};
use playback::web::{self, ServerConfig, ViewerState};
use playback::{util, Config, Database, SessionRecorder};

#[derive(Parser)]
#[command(
    name = "playback",
    version,
    about = "Records text edits to monitored files and replays them alongside captured output"
)]
struct Cli {
    /// Override the data directory (default ~/.playback)
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record editor change events from stdin, one JSON event per line
    Record,
    /// Serve the playback viewer
    Serve {
        /// Host address to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_data_dir(cli.data_dir.clone());

    // Initialize logging to file (~/.playback/logs/playback.log)
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false) // Disable ANSI colors in log file
        .init();

    let config = Config::load();

    // Without a durable log there is nothing to record into; open failure
    // is fatal for the whole process.
    let db = Database::open_default()?;

    let monitor = MonitorSpec::new(&config.monitored_pattern)?;
    let capture = InterpreterCapture::new(config.interpreter.as_str());
    if !capture.is_available() {
        tracing::warn!(
            program = %config.interpreter,
            "Capture interpreter not found on PATH; session output will record the spawn error"
        );
    }

    let recorder = Arc::new(SessionRecorder::new(
        &db,
        monitor,
        Arc::new(capture),
        config.output_history_limit,
    ));

    match cli.command {
        Command::Record => run_record(recorder).await,
        Command::Serve { host, port } => {
            let server_config = ServerConfig {
                host: host.unwrap_or(config.server_host),
                port: port.unwrap_or(config.server_port),
            };
            web::serve(server_config, ViewerState::new(recorder)).await
        }
    }
}

/// Consume the editor event stream until stdin closes.
async fn run_record(recorder: Arc<SessionRecorder>) -> Result<()> {
    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let event: EditorEvent = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring malformed event line");
                continue;
            }
        };

        match event {
            EditorEvent::DocumentOpened { file_name, text } => {
                recorder.document_opened(&file_name, &text);
            }
            EditorEvent::DocumentChanged(note) => recorder.document_changed(&note),
            EditorEvent::SessionEnded => recorder.session_ended().await,
        }
    }

    // A closed stream is the last session boundary we will ever see; flush
    // whatever is still buffered instead of dropping it.
    if recorder.buffered() > 0 {
        recorder.session_ended().await;
    }

    Ok(())
}
