pub mod calculate;
pub mod category;
pub(crate) mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod notify;
pub mod provider;
pub mod query;
pub(crate) mod repl;
pub mod render;
pub mod resolver;
pub mod settings;
pub mod transcript;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

pub use category::{CardKind, Category, Command};
pub use dispatch::{CardDispatcher, StreamMode};
pub use error::CardError;
pub use format::PresentationModel;
pub use provider::{Candidate, HttpReferenceProvider, ReferenceProvider};

use notify::{NotificationCenter, Notifier};
use render::CardRenderer;
use settings::{DisplayClasses, SettingsStore};
use transcript::{JsonLinesTranscript, TranscriptSink};

/// Initialize logging. Writes to stderr; stdout carries the transcript.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stream_mode=info")),
        )
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing();

    let mut config = config::load_app_config(cli.config.as_deref());
    cli.apply(&mut config);

    tracing::info!(
        "Starting stream-mode v{} (api: {})",
        env!("CARGO_PKG_VERSION"),
        config.api_base_url
    );

    let provider = HttpReferenceProvider::new(
        &config.api_base_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let renderer = CardRenderer::with_overrides(config.templates_dir.as_deref())?;

    let transcript: Arc<dyn TranscriptSink> = match &cli.transcript {
        Some(path) => Arc::new(JsonLinesTranscript::append_to(path)?),
        None => Arc::new(JsonLinesTranscript::new(std::io::stdout())),
    };

    let notifications = Arc::new(NotificationCenter::default());
    let settings = Arc::new(SettingsStore::with_values(config.initial_settings()));
    let classes = DisplayClasses::attach(&settings);
    settings.on_change(|setting, value| {
        tracing::info!("Setting {} is now {}", setting.key(), if value { "on" } else { "off" });
    });

    let app = StreamMode::new(
        provider,
        CardDispatcher::new(renderer, transcript, config.speaker.clone()),
        notifications.clone(),
        settings,
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async {
        match cli.one_shot() {
            // A one-shot run also reports failure through the exit status.
            Some(line) => match app.invoke(&line).await {
                Ok(_) => Ok(()),
                Err(e) => {
                    notifications.warn(&e.to_string());
                    Err(anyhow::Error::from(e))
                }
            },
            None => repl::run_lines(&app, &notifications, &classes)
                .await
                .context("Failed to read from stdin"),
        }
    })
}
