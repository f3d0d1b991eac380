//! Line-oriented terminal client
//!
//! Plain lines are prompts; lines starting with `/` are commands for model
//! selection and key management.

use std::fmt::Write as _;

use thiserror::Error;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use super::identity::Identity;
use super::keystore::{ApiKeys, KeyScope, KeyVault, SecretStore, provider_label};
use super::round::{Notice, NoticeLevel, RoundReport, RoundRunner, Session};
use super::selection::{MODEL_SLOTS, find_slot};
use crate::model::CompletionBackend;

#[derive(Debug, Error)]
pub enum StdioError {
    #[error("stdin/stdout I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Prompt(String),
    Toggle(String),
    SelectAll,
    DeselectAll,
    Models,
    SetKey {
        provider: String,
        secret: String,
        scope: Option<KeyScope>,
    },
    ClearKey(String),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Prompt(line.trim_end_matches(['\r', '\n']).to_string());
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match (name, args.as_slice()) {
        ("toggle" | "t", [key]) => Command::Toggle(key.to_string()),
        ("all", []) => Command::SelectAll,
        ("none", []) => Command::DeselectAll,
        ("models" | "m", []) => Command::Models,
        ("key", [provider, secret]) => Command::SetKey {
            provider: provider.to_string(),
            secret: secret.to_string(),
            scope: None,
        },
        ("key", [provider, secret, flag]) => match *flag {
            "--session" => Command::SetKey {
                provider: provider.to_string(),
                secret: secret.to_string(),
                scope: Some(KeyScope::Session),
            },
            "--save" => Command::SetKey {
                provider: provider.to_string(),
                secret: secret.to_string(),
                scope: Some(KeyScope::Durable),
            },
            other => Command::Invalid(format!("unknown flag '{other}'")),
        },
        ("clear-key", [provider]) => Command::ClearKey(provider.to_string()),
        ("help" | "h" | "?", []) => Command::Help,
        ("quit" | "exit" | "q", []) => Command::Quit,
        _ => Command::Invalid(format!("unrecognized command '/{rest}'")),
    }
}

pub const HELP_TEXT: &str = "\
Commands:
  <prompt>                        send the prompt to every enabled model
  /models                         list models, selection and key status
  /toggle <model>                 enable or disable one model
  /all, /none                     select or deselect every model
  /key <provider> <key> [--session|--save]
                                  store an API key
  /clear-key <provider>           forget a stored API key
  /help                           show this text
  /quit                           leave";

pub fn render_models(session: &Session, keys: &ApiKeys) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Select Models ({} selected)",
        session.selection.active_count()
    );
    for slot in MODEL_SLOTS {
        let toggle = if session.selection.is_enabled(slot.key) {
            "[x]"
        } else {
            "[ ]"
        };
        let key = if keys.get(slot.key).is_some() { "✓" } else { "X" };
        let _ = writeln!(out, "  {toggle} {:<14} {:<20} {key}", slot.key, slot.label);
    }
    out
}

/// Result panels plus error notices. The opening notice is printed by
/// [`ChatShell::announce`] before the round is awaited.
pub fn render_report(session: &Session, report: &RoundReport) -> String {
    let mut out = String::new();
    for entry in session.visible_results() {
        let label = find_slot(entry.model_key)
            .map(|slot| slot.label)
            .unwrap_or(entry.model_key);
        let _ = writeln!(out, "── {label} ──");
        let _ = writeln!(out, "{}", entry.text());
        if let Some(reason) = entry.reason() {
            let _ = writeln!(out, "  ({reason})");
        }
        out.push('\n');
    }
    for notice in report.notices.iter().filter(|n| n.level == NoticeLevel::Error) {
        let _ = writeln!(out, "{}", render_notice(notice));
    }
    out
}

pub fn render_notice(notice: &Notice) -> String {
    let marker = match notice.level {
        NoticeLevel::Info => "·",
        NoticeLevel::Success => "✓",
        NoticeLevel::Error => "✗",
    };
    match &notice.detail {
        Some(detail) => format!("{marker} {}: {detail}", notice.message),
        None => format!("{marker} {}", notice.message),
    }
}

/// Everything the terminal loop owns between lines.
pub struct ChatShell<'a, B> {
    runner: RoundRunner<B>,
    vault: KeyVault,
    identity: &'a dyn Identity,
    default_scope: KeyScope,
    session: Session,
}

impl<'a, B: CompletionBackend> ChatShell<'a, B> {
    pub fn new(
        runner: RoundRunner<B>,
        vault: KeyVault,
        identity: &'a dyn Identity,
        default_scope: KeyScope,
    ) -> Self {
        Self {
            runner,
            vault,
            identity,
            default_scope,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn banner(&self) -> String {
        let user = if self.identity.is_authenticated() {
            "signed in"
        } else {
            "not signed in"
        };
        format!(
            "FeastedChat · Multi-LLM Chat Viewer ({user}, keys: {})\nType /help for commands.",
            self.vault.path().display()
        )
    }

    /// Opening notice for a prompt that will start a round, shown while the
    /// round runs.
    pub fn announce(&mut self, command: &Command) -> Option<String> {
        let Command::Prompt(prompt) = command else {
            return None;
        };
        self.session.prompt = prompt.clone();
        self.session
            .ready()
            .ok()
            .map(|()| render_notice(&Notice::generating()))
    }

    /// Handle one input line. `None` means the user asked to quit.
    pub async fn handle(&mut self, command: Command) -> Option<String> {
        match command {
            Command::Quit => None,
            Command::Empty => Some(String::new()),
            Command::Help => Some(HELP_TEXT.to_string()),
            Command::Invalid(reason) => Some(format!("{reason}; type /help for commands")),
            Command::Models => Some(render_models(&self.session, &self.vault.snapshot())),
            Command::Toggle(key) => Some(match self.session.selection.toggle(&key) {
                Some(enabled) => render_notice(&Notice::info(format!(
                    "{key} {}",
                    if enabled { "enabled" } else { "disabled" }
                ))),
                None => render_notice(&Notice::error("Unknown model", key)),
            }),
            Command::SelectAll => {
                self.session.selection.select_all();
                Some(render_notice(&Notice::success("All models selected")))
            }
            Command::DeselectAll => {
                self.session.selection.deselect_all();
                Some(render_notice(&Notice::info("All models deselected")))
            }
            Command::SetKey {
                provider,
                secret,
                scope,
            } => {
                let scope = scope.unwrap_or(self.default_scope);
                Some(match self.vault.save(&provider, &secret, scope) {
                    Ok(id) => {
                        let how = match scope {
                            KeyScope::Session => "saved for this session",
                            KeyScope::Durable => "saved permanently",
                        };
                        render_notice(&Notice::success(format!(
                            "{} API key {how}",
                            provider_label(id)
                        )))
                    }
                    Err(error) => render_notice(&Notice::error("Could not save key", error.to_string())),
                })
            }
            Command::ClearKey(provider) => Some(match self.vault.clear(&provider) {
                Ok(id) => render_notice(&Notice::success(format!(
                    "{} API key cleared locally",
                    provider_label(id)
                ))),
                Err(error) => render_notice(&Notice::error("Could not clear key", error.to_string())),
            }),
            Command::Prompt(prompt) => {
                self.session.prompt = prompt;
                let keys = self.vault.snapshot();
                Some(match self.runner.run(&mut self.session, &keys).await {
                    Ok(report) => render_report(&self.session, &report),
                    Err(error) => render_notice(&Notice::error("Cannot generate", error.to_string())),
                })
            }
        }
    }

    /// Read commands from stdin until EOF or `/quit`.
    pub async fn run(mut self) -> Result<(), StdioError> {
        let stdin = BufReader::new(io::stdin());
        let mut lines = stdin.lines();
        let mut stdout = io::stdout();

        info!("Terminal client ready");
        write_block(&mut stdout, &self.banner()).await?;

        loop {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                debug!("stdin closed");
                break;
            };
            let command = parse_command(&line);
            debug!(?command, "Parsed input line");
            if let Some(notice) = self.announce(&command) {
                write_block(&mut stdout, &notice).await?;
            }
            match self.handle(command).await {
                Some(output) => write_block(&mut stdout, &output).await?,
                None => break,
            }
        }

        if self.session.selection.is_empty() {
            warn!("Session ended without any model selected");
        }
        info!("Terminal client finished");
        Ok(())
    }
}

async fn write_block(stdout: &mut io::Stdout, text: &str) -> Result<(), StdioError> {
    if text.is_empty() {
        return Ok(());
    }
    stdout.write_all(text.as_bytes()).await?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n").await?;
    }
    stdout.flush().await?;
    Ok(())
}
