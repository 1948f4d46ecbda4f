//! persona-duet CLI entrypoint
//!
//! Loads configuration, wires the layers together and runs either a single
//! question or the interactive chat.

use anyhow::{Context, Result, bail};
use clap::Parser;
use duet_application::{
    ConversationLogger, DiscussionObserver, DiscussionOrchestrator, NoConversationLogger,
    NoObserver, RunOutcome, RunSettings, SendMessageInput,
};
use duet_domain::{Model, OutputFormat, Persona};
use duet_infrastructure::{ConfigLoader, FileConfig, JsonlConversationLogger, build_gateway};
use duet_presentation::{
    ChatRepl, Cli, ConsoleFormatter, DiscussionReporter, OutputConfig, ReplConfig,
    SimpleReporter, load_attachment, send_interruptible,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    // Keep the guard alive so the file writer flushes on exit
    let _log_guard = init_logging(cli.verbose, &config)?;

    let settings = apply_cli_overrides(
        config
            .to_run_settings()
            .context("Invalid configuration")?,
        &cli,
    )?;
    info!(
        "Mode: {}, {}: {}, {}: {}",
        settings.mode,
        Persona::Logical,
        settings.logical_model,
        Persona::Creative,
        settings.creative_model
    );

    let output = OutputConfig {
        format: cli
            .output
            .map(OutputFormat::from)
            .or(config.output.format)
            .unwrap_or_default(),
        color: config.output.color,
    };
    output.apply_color();

    let repl = ReplConfig {
        show_progress: config.repl.show_progress,
        show_notepad: config.repl.show_notepad,
    };

    let gateway = Arc::new(build_gateway(&config).context("Failed to set up model providers")?);

    let show_turns = cli.chat && output.streams_turns();
    let show_progress = !cli.quiet
        && output.format != OutputFormat::Json
        && (!cli.chat || repl.show_progress);
    let observer: Arc<dyn DiscussionObserver> = if !show_turns && !show_progress {
        Arc::new(NoObserver)
    } else if std::io::stderr().is_terminal() {
        Arc::new(DiscussionReporter::new(show_turns).with_spinner(show_progress))
    } else {
        Arc::new(SimpleReporter::new(show_turns).with_progress(show_progress))
    };

    let orchestrator = Arc::new(
        DiscussionOrchestrator::new(gateway)
            .with_observer(observer)
            .with_logger(conversation_logger(&config)),
    );

    if cli.chat {
        let mut chat = ChatRepl::new(orchestrator, settings)
            .with_output(output)
            .with_repl_config(repl);
        chat.run().await?;
        return Ok(());
    }

    let question = cli.question.clone().unwrap_or_default();
    if question.trim().is_empty() && cli.attach.is_none() {
        bail!("Question is required. Use --chat for interactive mode.");
    }

    let mut input = SendMessageInput::new(question);
    if let Some(path) = &cli.attach {
        let attachment = load_attachment(path)
            .with_context(|| format!("Failed to read attachment {}", path.display()))?;
        input = input.with_attachment(attachment);
    }

    match send_interruptible(&orchestrator, input, settings).await? {
        RunOutcome::Completed(summary) => {
            let transcript = orchestrator.transcript();
            let rendered = match output.format {
                OutputFormat::Full => ConsoleFormatter::format_full(transcript.records(), &summary),
                OutputFormat::Answer => ConsoleFormatter::format_answer(&summary),
                OutputFormat::Json => ConsoleFormatter::format_json(transcript.records(), &summary),
            };
            println!("{}", rendered);
        }
        RunOutcome::Cancelled => {
            bail!("Discussion cancelled");
        }
    }

    Ok(())
}

/// Console logging goes to stderr; `[logging].file_dir` adds a daily file.
fn init_logging(verbose: u8, config: &FileConfig) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let (file, guard) = match config.logging.file_dir.as_deref() {
        Some(dir) => {
            let dir = expand_home(dir);
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(&dir, "persona-duet.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    Ok(guard)
}

fn apply_cli_overrides(mut settings: RunSettings, cli: &Cli) -> Result<RunSettings> {
    if let Some(mode) = cli.mode {
        settings = settings.with_mode(mode.into());
    }
    if let Some(turns) = cli.turns {
        settings = settings.with_fixed_turns(turns)?;
    }
    if let Some(model) = &cli.model {
        settings = settings.with_model(model.parse::<Model>()?);
    }
    if let Some(model) = &cli.logical_model {
        settings = settings.with_persona_model(Persona::Logical, model.parse::<Model>()?);
    }
    if let Some(model) = &cli.creative_model {
        settings = settings.with_persona_model(Persona::Creative, model.parse::<Model>()?);
    }
    if cli.no_thinking {
        settings = settings.with_reasoning_suppressed(true);
    }
    Ok(settings)
}

/// Open the JSONL conversation log, or log nothing if it is unset or unwritable.
fn conversation_logger(config: &FileConfig) -> Arc<dyn ConversationLogger> {
    let Some(path) = config.logging.conversation_log.as_deref() else {
        return Arc::new(NoConversationLogger);
    };

    let path = expand_home(path);
    match JsonlConversationLogger::open(&path) {
        Ok(logger) => {
            info!("Conversation log: {}", logger.path().display());
            Arc::new(logger)
        }
        Err(e) => {
            warn!("Cannot open conversation log {}: {}", path.display(), e);
            Arc::new(NoConversationLogger)
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
