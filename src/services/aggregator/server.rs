use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, info, instrument, warn};
use zbus::{
    Connection, Message, MessageStream, fdo,
    message::{Header, Type},
    names::WellKnownName,
    zvariant::{OwnedObjectPath, OwnedValue},
};

use crate::services::mpris::{
    ControlCall, INTROSPECTABLE_INTERFACE, OBJECT_PATH, PEER_INTERFACE, PLAYER_INTERFACE,
    PROPERTIES_INTERFACE, Variant, variant::encode_map,
};

use super::{DaemonError, DispatchError, ProxyDispatcher, Request, Response};

/// Serves the aggregator object on a bus connection.
///
/// Method calls are read straight off the connection and answered by hand,
/// so the standard Properties, Introspectable and Peer interfaces are ours
/// to implement rather than the bus library's.
pub struct AggregatorServer {
    connection: Connection,
    dispatcher: Arc<ProxyDispatcher>,
}

impl AggregatorServer {
    /// Create a server answering calls on `connection`
    pub fn new(connection: Connection, dispatcher: ProxyDispatcher) -> Self {
        Self {
            connection,
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Claim `name`, replacing any current owner.
    ///
    /// # Errors
    /// Returns `NameNotClaimed` unless this connection becomes the primary owner
    #[instrument(skip(self))]
    pub async fn claim_name(&self, name: &str) -> Result<(), DaemonError> {
        let not_claimed = |reason: String| DaemonError::NameNotClaimed(format!("{name}: {reason}"));

        let well_known = WellKnownName::try_from(name).map_err(|e| not_claimed(e.to_string()))?;
        let dbus = fdo::DBusProxy::new(&self.connection)
            .await
            .map_err(|e| DaemonError::TransportUnavailable(e.to_string()))?;

        let reply = dbus
            .request_name(well_known, fdo::RequestNameFlags::ReplaceExisting.into())
            .await
            .map_err(|e| not_claimed(e.to_string()))?;

        if reply != fdo::RequestNameReply::PrimaryOwner {
            return Err(not_claimed(format!("{reply:?}")));
        }

        info!("Started D-Bus server on {name}");
        Ok(())
    }

    /// Answer method calls until the connection closes.
    ///
    /// Every call is handled on its own task so a slow player never holds
    /// up unrelated callers.
    pub async fn serve(self) {
        let mut messages = MessageStream::from(&self.connection);

        while let Some(message) = messages.next().await {
            let message = match message {
                Ok(message) => message,
                Err(e) => {
                    warn!("Dropping unreadable message: {e}");
                    continue;
                }
            };

            if message.message_type() != Type::MethodCall {
                continue;
            }

            let connection = self.connection.clone();
            let dispatcher = Arc::clone(&self.dispatcher);
            tokio::spawn(async move {
                handle_call(&connection, &dispatcher, &message).await;
            });
        }

        warn!("Bus connection closed, stopping server");
    }
}

async fn handle_call(connection: &Connection, dispatcher: &ProxyDispatcher, message: &Message) {
    let header = message.header();

    let outcome = match decode_request(dispatcher, message) {
        Ok(request) => dispatcher.dispatch(request).await,
        Err(e) => Err(e),
    };

    let sent = match outcome {
        Ok(response) => send_response(connection, &header, response).await,
        Err(e) => {
            debug!(
                interface = ?header.interface(),
                member = ?header.member(),
                "Call failed: {e}"
            );
            connection.reply_dbus_error(&header, fdo::Error::from(e)).await
        }
    };

    if let Err(e) = sent {
        warn!("Failed to send reply: {e}");
    }
}

async fn send_response(
    connection: &Connection,
    header: &Header<'_>,
    response: Response,
) -> zbus::Result<()> {
    match response {
        Response::Empty => connection.reply(header, &()).await,
        Response::Text(text) => connection.reply(header, &text).await,
        Response::Names(names) => connection.reply(header, &names).await,
        Response::Variant(value) => match value.to_value() {
            Ok(value) => connection.reply(header, &value).await,
            Err(e) => {
                connection
                    .reply_dbus_error(header, fdo::Error::Failed(e.to_string()))
                    .await
            }
        },
        Response::Properties(properties) => match encode_map(&properties) {
            Ok(properties) => connection.reply(header, &properties).await,
            Err(e) => {
                connection
                    .reply_dbus_error(header, fdo::Error::Failed(e.to_string()))
                    .await
            }
        },
    }
}

fn invalid_args(error: impl std::fmt::Display) -> DispatchError {
    DispatchError::InvalidArgs(error.to_string())
}

/// Decode a method call on the aggregator object into a [`Request`].
///
/// # Errors
/// Returns `UnknownMethod` for calls the aggregator does not serve and
/// `InvalidArgs` when the body does not match the method
pub fn decode_request(
    dispatcher: &ProxyDispatcher,
    message: &Message,
) -> Result<Request, DispatchError> {
    let header = message.header();
    let interface = header.interface().map(|name| name.as_str()).unwrap_or_default();
    let member = header.member().map(|name| name.as_str()).unwrap_or_default();
    let path = header.path().map(|path| path.as_str()).unwrap_or_default();

    if path != OBJECT_PATH {
        return Err(DispatchError::unknown_method(interface, member));
    }

    let body = message.body();

    let request = match (interface, member) {
        (PROPERTIES_INTERFACE, "Get") => {
            let (interface, property): (String, String) =
                body.deserialize().map_err(invalid_args)?;
            Request::Get {
                interface,
                property,
            }
        }
        (PROPERTIES_INTERFACE, "GetAll") => {
            let interface: String = body.deserialize().map_err(invalid_args)?;
            Request::GetAll { interface }
        }
        (PROPERTIES_INTERFACE, "Set") => {
            let (interface, property, value): (String, String, OwnedValue) =
                body.deserialize().map_err(invalid_args)?;
            Request::Set {
                interface,
                property,
                value: Variant::try_from(&value).map_err(invalid_args)?,
            }
        }
        (INTROSPECTABLE_INTERFACE, "Introspect") => Request::Introspect,
        (PEER_INTERFACE, "Ping") => Request::Ping,
        (PEER_INTERFACE, "GetMachineId") => Request::GetMachineId,
        (PLAYER_INTERFACE, "Seek") => {
            let offset: i64 = body.deserialize().map_err(invalid_args)?;
            Request::Control(ControlCall::Seek(offset))
        }
        (PLAYER_INTERFACE, "SetPosition") => {
            let (track_id, position): (OwnedObjectPath, i64) =
                body.deserialize().map_err(invalid_args)?;
            Request::Control(ControlCall::SetPosition {
                track_id: track_id.as_str().to_string(),
                position,
            })
        }
        (PLAYER_INTERFACE, "OpenUri") => {
            let uri: String = body.deserialize().map_err(invalid_args)?;
            Request::Control(ControlCall::OpenUri(uri))
        }
        (interface, member) if dispatcher.is_extension(interface) => Request::Extension {
            interface: interface.to_string(),
            member: member.to_string(),
            args: decode_extension_args(message)?,
        },
        (interface, member) => ControlCall::without_args(interface, member)
            .map(Request::Control)
            .ok_or_else(|| DispatchError::unknown_method(interface, member))?,
    };

    Ok(request)
}

fn decode_extension_args(message: &Message) -> Result<Vec<Variant>, DispatchError> {
    let body = message.body();
    let signature = body.signature().to_string();
    let fields = signature
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(&signature);

    match fields {
        "" => Ok(Vec::new()),
        "s" => {
            let arg: String = body.deserialize().map_err(invalid_args)?;
            Ok(vec![Variant::from(arg)])
        }
        "ss" => {
            let (first, second): (String, String) = body.deserialize().map_err(invalid_args)?;
            Ok(vec![Variant::from(first), Variant::from(second)])
        }
        other => Err(DispatchError::InvalidArgs(format!(
            "unsupported argument signature '{other}'"
        ))),
    }
}
