//! Command-line arguments.
//!
//! Flags and environment variables override the JSON config file; anything
//! left unset keeps the config (or default) value.

use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(
    name = "stream-mode",
    version,
    about = "Post reference and status cards for tabletop chat commands"
)]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, env = "STREAM_MODE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Reference API root
    #[arg(long, env = "STREAM_MODE_API_URL")]
    pub api_url: Option<String>,

    /// Reference API request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Speaker name attached to posted cards
    #[arg(long)]
    pub speaker: Option<String>,

    /// Directory of `.hbs` files overriding the built-in templates
    #[arg(long)]
    pub templates_dir: Option<PathBuf>,

    /// Append cards to this JSON-lines file instead of stdout
    #[arg(long, env = "STREAM_MODE_TRANSCRIPT")]
    pub transcript: Option<PathBuf>,

    /// Start with the stream-observer layout enabled
    #[arg(long)]
    pub stream_mode: bool,

    /// Start with cards visible to everyone (suppresses card alerts)
    #[arg(long)]
    pub display_cards: bool,

    /// Start with the macro bar hidden
    #[arg(long)]
    pub hide_macros: bool,

    /// Chat line to run once, e.g. `/move Tackle`; reads lines from stdin when omitted
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_secs = secs;
        }
        if let Some(speaker) = &self.speaker {
            config.speaker = speaker.clone();
        }
        if let Some(dir) = &self.templates_dir {
            config.templates_dir = Some(dir.clone());
        }
        config.stream_mode_enabled |= self.stream_mode;
        config.display_cards |= self.display_cards;
        config.hide_macros |= self.hide_macros;
    }

    /// The one-shot chat line, if any.
    pub fn one_shot(&self) -> Option<String> {
        if self.command.is_empty() {
            None
        } else {
            Some(self.command.join(" "))
        }
    }
}
