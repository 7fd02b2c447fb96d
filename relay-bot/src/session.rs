//! Session controller: one per channel connection.
//!
//! [`Session::dispatch`] routes each inbound line: block list, addressing, availability gate, then
//! either an inline directive or a query handed to a background task that owns the gate guard.
//! Runtime settings and the active parameter set sit behind `RwLock`s so `!profile` and `!options`
//! can swap them between turns.

use crate::blocklist::BlockList;
use crate::chunker::send_paced;
use crate::config::{
    load_default_params, load_system_prompt, profile_file_name, RelayConfig, SessionSettings,
    BLOCKLIST_FILE,
};
use crate::dispatcher::{parse_command, AddressMatcher, Command, Directive, DirectiveKind};
use crate::error::{DirectiveError, SessionError};
use crate::gate::{AvailabilityGate, GateGuard};
use completion_client::{CompletionClient, CompletionError, GenerationParams};
use relay_core::{Bot, Message};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};
use transcript::{Entry, TranscriptStore, AUTO_INDEX};

/// What [`Session::dispatch`] did with a line.
#[derive(Debug)]
pub enum Outcome {
    Blocked,
    Ignored,
    /// Addressed while another request was in flight; dropped without a reply.
    Busy,
    Empty,
    CommandsDisabled,
    Directive(DirectiveKind),
    /// The query runs on this task; the gate stays held until it finishes.
    QuerySpawned(JoinHandle<()>),
}

/// Settings plus the objects built from them, replaced together on `!profile`.
struct Runtime {
    settings: SessionSettings,
    client: CompletionClient,
    transcript: TranscriptStore,
}

impl Runtime {
    fn build(settings: SessionSettings, seed: Option<String>) -> Result<Self, CompletionError> {
        let client = CompletionClient::new(
            settings.api_url.clone(),
            settings.api_key.clone(),
            settings.request_timeout,
        )?;
        let transcript = TranscriptStore::new(settings.history_path.clone(), seed);
        Ok(Self {
            settings,
            client,
            transcript,
        })
    }
}

pub struct Session {
    bot: Arc<dyn Bot>,
    nickname: String,
    channel: String,
    commands_enabled: bool,
    config_dir: PathBuf,
    system_prompt: Option<String>,
    block_list: BlockList,
    matcher: AddressMatcher,
    gate: AvailabilityGate,
    runtime: RwLock<Runtime>,
    params: RwLock<GenerationParams>,
}

impl Session {
    /// Builds a session from a validated config. Reads the block list, the system prompt seed and
    /// the default parameter profile from `config_dir`.
    pub async fn new(
        bot: Arc<dyn Bot>,
        config: &RelayConfig,
        config_dir: impl Into<PathBuf>,
    ) -> Result<Arc<Self>, SessionError> {
        config.validate()?;
        let config_dir = config_dir.into();

        let block_list = BlockList::load(&config_dir.join(BLOCKLIST_FILE))
            .await
            .map_err(SessionError::BlockList)?;
        let system_prompt = load_system_prompt(&config_dir)
            .await
            .map_err(SessionError::SystemPrompt)?;
        let params = load_default_params(&config_dir).await;
        let runtime = Runtime::build(config.settings(&config_dir), system_prompt.clone())?;

        info!(
            nickname = %config.nickname,
            channel = %config.channel,
            api_url = %runtime.settings.api_url,
            api_mode = %runtime.settings.api_mode,
            commands = config.commands,
            config_dir = %config_dir.display(),
            "Session ready"
        );

        Ok(Arc::new(Self {
            bot,
            nickname: config.nickname.clone(),
            channel: config.channel.clone(),
            commands_enabled: config.commands,
            config_dir,
            system_prompt,
            block_list,
            matcher: AddressMatcher::new(&config.nickname)?,
            gate: AvailabilityGate::new(),
            runtime: RwLock::new(runtime),
            params: RwLock::new(params),
        }))
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn gate(&self) -> &AvailabilityGate {
        &self.gate
    }

    pub async fn settings(&self) -> SessionSettings {
        self.runtime.read().await.settings.clone()
    }

    pub async fn params(&self) -> GenerationParams {
        self.params.read().await.clone()
    }

    pub async fn transcript(&self) -> TranscriptStore {
        self.runtime.read().await.transcript.clone()
    }

    /// Routes one inbound line. Directives finish before this returns; queries are spawned and
    /// their handle returned without awaiting it.
    #[instrument(skip(self, message), fields(sender = %message.sender))]
    pub async fn dispatch(self: &Arc<Self>, message: &Message) -> Outcome {
        let user = message.sender.as_str();
        if self.block_list.contains(user) {
            debug!("Sender is blocked");
            return Outcome::Blocked;
        }
        let Some(remainder) = self.matcher.parse_addressed(&message.content) else {
            return Outcome::Ignored;
        };
        let Some(guard) = self.gate.try_acquire() else {
            info!("step: busy, message dropped");
            return Outcome::Busy;
        };

        let command = parse_command(&remainder);
        if !self.commands_enabled && command.is_bang() {
            self.say(user, "Commands are currently disabled.").await;
            return Outcome::CommandsDisabled;
        }

        match command {
            Command::Empty => Outcome::Empty,
            Command::Directive(directive) => {
                let kind = directive.kind;
                info!(directive = %kind, argument = %directive.argument, "step: directive");
                let reply = match self.run_directive(&directive).await {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(directive = %kind, error = ?e, "Directive failed");
                        e.to_string()
                    }
                };
                self.say(user, &reply).await;
                drop(guard);
                Outcome::Directive(kind)
            }
            // Unknown `!word`s and plain text are both forwarded as-is.
            Command::UnknownDirective(_) | Command::Query(_) => {
                Outcome::QuerySpawned(self.spawn_query(guard, user.to_string(), remainder).await)
            }
        }
    }

    async fn spawn_query(
        self: &Arc<Self>,
        guard: GateGuard,
        user: String,
        query: String,
    ) -> JoinHandle<()> {
        let thinking = self.runtime.read().await.settings.thinking_message.clone();
        if !thinking.trim().is_empty() {
            self.say(&user, &thinking).await;
        }
        info!(query_len = query.chars().count(), "step: query accepted");

        let session = Arc::clone(self);
        tokio::spawn(async move {
            let _guard = guard;
            session.answer(&user, &query).await;
        })
    }

    /// Runs one completion turn and sends the reply (or the apology) back in paced chunks.
    #[instrument(skip(self, query))]
    async fn answer(&self, user: &str, query: &str) {
        let (settings, client, transcript) = {
            let runtime = self.runtime.read().await;
            (
                runtime.settings.clone(),
                runtime.client.clone(),
                runtime.transcript.clone(),
            )
        };
        let params = self.params().await;

        let reply = match client
            .complete(
                &transcript,
                query,
                &params,
                settings.api_mode,
                settings.reminder.as_deref(),
            )
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "Completion failed");
                e.apology().to_string()
            }
        };

        if reply.trim().is_empty() {
            warn!("Completion returned an empty reply, nothing sent");
            return;
        }
        let delivered = send_paced(
            self.bot.as_ref(),
            &self.channel,
            user,
            &reply,
            settings.message_size,
            settings.delay,
        )
        .await;
        info!(delivered, "step: reply sent");
    }

    async fn run_directive(&self, directive: &Directive) -> Result<String, DirectiveError> {
        let argument = directive.argument.trim();
        match directive.kind {
            DirectiveKind::Clear => {
                let transcript = self.transcript().await;
                match transcript.clear().await {
                    Ok(true) => Ok("My recent memory has been cleared.".to_string()),
                    Ok(false) => Err(DirectiveError::NothingToClear),
                    Err(e) => Err(DirectiveError::Clear(e)),
                }
            }
            DirectiveKind::System => {
                if argument.is_empty() {
                    return Err(DirectiveError::Usage("!system <text>"));
                }
                self.transcript()
                    .await
                    .append(&[Entry::system(argument)])
                    .await
                    .map_err(DirectiveError::Memory)?;
                Ok("System prompt added.".to_string())
            }
            DirectiveKind::Options => {
                if argument.is_empty() {
                    return Err(DirectiveError::Usage("!options <name>"));
                }
                let file = profile_file_name("options", argument)
                    .map_err(|_| DirectiveError::InvalidProfileName(argument.to_string()))?;
                let params = GenerationParams::load_profile(&self.config_dir.join(&file))
                    .await
                    .map_err(|source| DirectiveError::OptionsLoad {
                        file: file.clone(),
                        source,
                    })?;
                info!(file = %file, set = params.iter_set().count(), "Parameter profile loaded");
                *self.params.write().await = params;
                Ok(format!("Options loaded successfully from '{}'.", file))
            }
            DirectiveKind::Profile => {
                if argument.is_empty() {
                    return Err(DirectiveError::Usage("!profile <name>"));
                }
                let file = profile_file_name("config", argument)
                    .map_err(|_| DirectiveError::InvalidProfileName(argument.to_string()))?;
                self.switch_profile(argument, &file).await?;
                Ok(format!("Switched to profile '{}' from '{}'.", argument, file))
            }
            DirectiveKind::Save => {
                let index = parse_slot(argument)?;
                let saved = self.transcript().await.save_archive(index).await?;
                Ok(format!("Conversation saved to slot {}.", saved))
            }
            DirectiveKind::Load => {
                let index = parse_slot(argument)?;
                let loaded = self.transcript().await.load_archive(index).await?;
                Ok(format!("Conversation loaded from slot {}.", loaded))
            }
        }
    }

    /// Replaces the runtime settings with those of `config.<name>.json`. Identity fields
    /// (nickname, channel, commands) stay as they were at startup.
    async fn switch_profile(&self, name: &str, file: &str) -> Result<(), DirectiveError> {
        let config = RelayConfig::from_file(&self.config_dir.join(file))
            .await
            .map_err(|source| DirectiveError::ProfileLoad {
                file: file.to_string(),
                source,
            })?;
        let runtime = Runtime::build(config.settings(&self.config_dir), self.system_prompt.clone())
            .map_err(|source| DirectiveError::ProfileApply {
                file: file.to_string(),
                source,
            })?;

        info!(
            profile = %name,
            api_url = %runtime.settings.api_url,
            api_mode = %runtime.settings.api_mode,
            history = %runtime.settings.history_path.display(),
            "Profile switched"
        );
        *self.runtime.write().await = runtime;
        Ok(())
    }

    async fn say(&self, user: &str, text: &str) {
        let line = format!("{}: {}", user, text);
        if let Err(e) = self.bot.send_message(&self.channel, &line).await {
            error!(error = %e, "Failed to send message");
        }
    }
}

/// `""`, `auto` and `0` select the automatic slot.
fn parse_slot(argument: &str) -> Result<u32, DirectiveError> {
    if argument.is_empty() || argument.eq_ignore_ascii_case("auto") {
        return Ok(AUTO_INDEX);
    }
    argument
        .parse()
        .map_err(|_| DirectiveError::InvalidSlot(argument.to_string()))
}
