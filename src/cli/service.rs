use std::{path::PathBuf, sync::Arc};

use tracing::instrument;
use zbus::Connection;

use crate::{
    config::Config,
    services::mpris::{ControlCall, MprisClient, Player, SessionTransport},
    status::IconTable,
};

use super::{
    CliError, Commands, CommandResult,
    commands::{
        control, metadata, players,
        status::{self, Follow},
        watch,
    },
    connect::resolve_target,
};

/// Executes client commands against the session bus.
///
/// Holds one bus connection for the lifetime of the command.
pub struct CliService {
    connection: Connection,
    client: MprisClient,
    config: Config,
    config_path: Option<PathBuf>,
    player: Option<String>,
}

impl CliService {
    /// Connects to the session bus.
    ///
    /// # Arguments
    /// * `config` - Loaded configuration
    /// * `config_path` - Explicit config file, forwarded to an autostarted daemon
    /// * `player` - Player suffix that bypasses the daemon
    ///
    /// # Errors
    /// Returns `TransportUnavailable` if the session bus cannot be reached
    pub async fn connect(
        config: Config,
        config_path: Option<PathBuf>,
        player: Option<String>,
    ) -> Result<Self, CliError> {
        let transport = SessionTransport::connect().await?;
        let connection = transport.connection().clone();
        let client = MprisClient::new(Arc::new(transport));

        Ok(Self {
            connection,
            client,
            config,
            config_path,
            player,
        })
    }

    async fn target(&self) -> Result<Player, CliError> {
        resolve_target(
            &self.client,
            &self.config.daemon,
            self.config_path.as_deref(),
            self.player.as_deref(),
        )
        .await
    }

    async fn daemon_name(&self) -> Result<String, CliError> {
        resolve_target(
            &self.client,
            &self.config.daemon,
            self.config_path.as_deref(),
            None,
        )
        .await
        .map(|daemon| daemon.bus_name().to_string())
    }

    /// Executes a client command and returns the text to print.
    ///
    /// # Errors
    /// Returns `ServiceError` when asked to run the daemon, which the binary
    /// handles before building a `CliService`. Any other error comes from
    /// the command itself.
    #[instrument(skip(self))]
    pub async fn execute(&self, command: Commands) -> CommandResult {
        match command {
            Commands::Play => control::execute(&self.target().await?, ControlCall::Play).await,
            Commands::Pause => control::execute(&self.target().await?, ControlCall::Pause).await,
            Commands::PlayPause => {
                control::execute(&self.target().await?, ControlCall::PlayPause).await
            }
            Commands::Next => control::execute(&self.target().await?, ControlCall::Next).await,
            Commands::Previous => {
                control::execute(&self.target().await?, ControlCall::Previous).await
            }
            Commands::Stop => control::execute(&self.target().await?, ControlCall::Stop).await,
            Commands::Open { uri } => {
                control::execute(&self.target().await?, ControlCall::OpenUri(uri)).await
            }
            Commands::Metadata { json } => metadata::execute(&self.target().await?, json).await,
            Commands::Status { format, watch } => {
                let template = format.unwrap_or_else(|| self.config.status.format.clone());
                let icons = IconTable::new(self.config.status.icons.clone());
                let follow = watch.then_some(if self.player.is_some() {
                    Follow::Target
                } else {
                    Follow::Sender
                });

                status::execute(
                    &self.client,
                    &self.target().await?,
                    &template,
                    &icons,
                    follow,
                )
                .await
            }
            Commands::Watch => watch::execute(&self.client).await,
            Commands::Select { name } => {
                players::select(&self.connection, &self.daemon_name().await?, &name).await
            }
            Commands::Players => players::list(&self.connection, &self.daemon_name().await?).await,
            Commands::Daemon => Err(CliError::ServiceError(
                "the daemon is not a client command".to_string(),
            )),
        }
    }
}
