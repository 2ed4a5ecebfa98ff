//! Line-oriented front end: chat commands from stdin, one at a time.
//!
//! Lines starting with `/` are chat commands. Lines starting with `:` are
//! local controls (settings, notification log). Everything else is ignored.
//! Each line is processed to completion before the next one is read.

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::category::Command;
use crate::dispatch::StreamMode;
use crate::notify::NotificationCenter;
use crate::provider::ReferenceProvider;
use crate::settings::{DisplayClasses, Setting};

/// Default number of notifications shown by `:log`.
const DEFAULT_LOG_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Help,
    Settings,
    Set(Setting, bool),
    Log(usize),
    Quit,
}

/// Parse a `:` control line. `Err` carries a usage message.
pub fn parse_control(line: &str) -> Result<Control, String> {
    let mut words = line.trim().trim_start_matches(':').split_whitespace();
    match words.next().unwrap_or_default() {
        "help" | "h" => Ok(Control::Help),
        "settings" => Ok(Control::Settings),
        "quit" | "q" | "exit" => Ok(Control::Quit),
        "log" => match words.next() {
            None => Ok(Control::Log(DEFAULT_LOG_LIMIT)),
            Some(n) => n
                .parse()
                .map(Control::Log)
                .map_err(|_| format!("Invalid log limit \"{n}\"")),
        },
        "set" => {
            let key = words.next().ok_or("Usage: :set <setting> on|off")?;
            let setting =
                Setting::from_key(key).ok_or_else(|| format!("Unknown setting \"{key}\""))?;
            let value = match words.next() {
                Some("on" | "true" | "1") => true,
                Some("off" | "false" | "0") => false,
                _ => return Err("Usage: :set <setting> on|off".to_string()),
            };
            Ok(Control::Set(setting, value))
        }
        other => Err(format!("Unknown control \":{other}\"; try :help")),
    }
}

fn print_help() {
    eprintln!("Chat commands:");
    for command in Command::ALL {
        eprintln!("  /{:<11} {}", command.key(), command.description());
    }
    eprintln!("Controls:");
    eprintln!("  :settings             show settings and display classes");
    eprintln!("  :set <setting> on|off change a setting");
    eprintln!("  :log [n]              show the last n notifications");
    eprintln!("  :quit                 exit");
}

/// Read lines from stdin until EOF or `:quit`.
pub async fn run_lines<P: ReferenceProvider>(
    app: &StreamMode<P>,
    notifications: &NotificationCenter,
    classes: &DisplayClasses,
) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with(':') {
            match parse_control(line) {
                Ok(Control::Quit) => break,
                Ok(Control::Help) => print_help(),
                Ok(Control::Settings) => {
                    for (setting, value) in app.settings().snapshot() {
                        eprintln!(
                            "  {:<13} {:<3}  {} ({})",
                            setting.key(),
                            if value { "on" } else { "off" },
                            setting.name(),
                            setting.hint()
                        );
                    }
                    eprintln!("  classes: {}", classes.active().join(" "));
                }
                Ok(Control::Set(setting, value)) => {
                    if !app.settings().set(setting, value) {
                        eprintln!("{} unchanged", setting.key());
                    }
                }
                Ok(Control::Log(limit)) => {
                    for entry in notifications.recent(limit) {
                        let level = match entry.level {
                            crate::notify::NotificationLevel::Info => "info",
                            crate::notify::NotificationLevel::Warn => "warn",
                        };
                        eprintln!("  #{} [{level}] {}", entry.id, entry.message);
                    }
                }
                Err(usage) => eprintln!("{usage}"),
            }
            continue;
        }

        app.handle(line).await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_controls() {
        assert_eq!(parse_control(":help"), Ok(Control::Help));
        assert_eq!(parse_control(":settings"), Ok(Control::Settings));
        assert_eq!(parse_control(":q"), Ok(Control::Quit));
    }

    #[test]
    fn parses_set() {
        assert_eq!(
            parse_control(":set displayCards on"),
            Ok(Control::Set(Setting::DisplayCards, true))
        );
        assert_eq!(
            parse_control(":set hidemacros off"),
            Ok(Control::Set(Setting::HideMacros, false))
        );
        assert!(parse_control(":set volume on").unwrap_err().contains("Unknown setting"));
        assert!(parse_control(":set enabled maybe").unwrap_err().starts_with("Usage"));
        assert!(parse_control(":set").unwrap_err().starts_with("Usage"));
    }

    #[test]
    fn parses_log_limit() {
        assert_eq!(parse_control(":log"), Ok(Control::Log(DEFAULT_LOG_LIMIT)));
        assert_eq!(parse_control(":log 5"), Ok(Control::Log(5)));
        assert!(parse_control(":log lots").is_err());
    }

    #[test]
    fn unknown_control_suggests_help() {
        assert!(parse_control(":dance").unwrap_err().contains(":help"));
    }
}
