use std::collections::HashMap;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, instrument, warn};
use zbus::{
    Connection, MatchRule, Message, MessageStream, fdo,
    names::BusName,
    proxy::CacheProperties,
    zvariant::{ObjectPath, OwnedValue},
};

use super::{
    BusTransport, ChangeEvent, ChangeStream, ControlCall, MediaError, MediaPlayer2PlayerProxy,
    MediaPlayer2Proxy, OBJECT_PATH, PROPERTIES_INTERFACE, PropertyMap, Variant,
    variant::decode_map,
};

/// [`BusTransport`] backed by a zbus session bus connection
pub struct SessionTransport {
    connection: Connection,
    dbus: fdo::DBusProxy<'static>,
}

impl SessionTransport {
    /// Connect to the session bus
    ///
    /// # Errors
    /// Returns `TransportUnavailable` if the session bus cannot be reached
    pub async fn connect() -> Result<Self, MediaError> {
        let connection = Connection::session()
            .await
            .map_err(|e| MediaError::TransportUnavailable(e.to_string()))?;
        Self::new(connection).await
    }

    /// Wrap an existing connection
    ///
    /// # Errors
    /// Returns `TransportUnavailable` if the bus daemon proxy cannot be created
    pub async fn new(connection: Connection) -> Result<Self, MediaError> {
        let dbus = fdo::DBusProxy::new(&connection)
            .await
            .map_err(|e| MediaError::TransportUnavailable(format!("DBus proxy failed: {e}")))?;
        Ok(Self { connection, dbus })
    }

    /// The underlying connection
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    async fn player_proxy(
        &self,
        destination: &str,
    ) -> zbus::Result<MediaPlayer2PlayerProxy<'static>> {
        MediaPlayer2PlayerProxy::builder(&self.connection)
            .destination(destination.to_string())?
            .cache_properties(CacheProperties::No)
            .build()
            .await
    }

    async fn app_proxy(&self, destination: &str) -> zbus::Result<MediaPlayer2Proxy<'static>> {
        MediaPlayer2Proxy::builder(&self.connection)
            .destination(destination.to_string())?
            .cache_properties(CacheProperties::No)
            .build()
            .await
    }

    async fn dispatch_control(&self, destination: &str, call: &ControlCall) -> zbus::Result<()> {
        match call {
            ControlCall::Raise => self.app_proxy(destination).await?.raise().await,
            ControlCall::Quit => self.app_proxy(destination).await?.quit().await,
            ControlCall::Play => self.player_proxy(destination).await?.play().await,
            ControlCall::Pause => self.player_proxy(destination).await?.pause().await,
            ControlCall::PlayPause => self.player_proxy(destination).await?.play_pause().await,
            ControlCall::Next => self.player_proxy(destination).await?.next().await,
            ControlCall::Previous => self.player_proxy(destination).await?.previous().await,
            ControlCall::Stop => self.player_proxy(destination).await?.stop().await,
            ControlCall::OpenUri(uri) => self.player_proxy(destination).await?.open_uri(uri).await,
            ControlCall::Seek(offset) => self.player_proxy(destination).await?.seek(*offset).await,
            ControlCall::SetPosition { track_id, position } => {
                let track_path = ObjectPath::try_from(track_id.as_str())?;
                self.player_proxy(destination)
                    .await?
                    .set_position(&track_path, *position)
                    .await
            }
        }
    }

    async fn call_properties<B>(
        &self,
        destination: &str,
        member: &str,
        body: &B,
    ) -> zbus::Result<Message>
    where
        B: serde::Serialize + zbus::zvariant::DynamicType,
    {
        self.connection
            .call_method(
                Some(destination),
                OBJECT_PATH,
                Some(PROPERTIES_INTERFACE),
                member,
                body,
            )
            .await
    }
}

#[async_trait]
impl BusTransport for SessionTransport {
    async fn list_names(&self) -> Result<Vec<String>, MediaError> {
        let names = self
            .dbus
            .list_names()
            .await
            .map_err(|e| MediaError::remote("ListNames", e))?;
        Ok(names.into_iter().map(|name| name.to_string()).collect())
    }

    async fn name_owner(&self, name: &str) -> Result<String, MediaError> {
        let bus_name =
            BusName::try_from(name).map_err(|_| MediaError::ServiceNotFound(name.to_string()))?;
        let owner = self
            .dbus
            .get_name_owner(bus_name)
            .await
            .map_err(|e| MediaError::from_fdo(name, "GetNameOwner", e))?;
        Ok(owner.to_string())
    }

    #[instrument(skip(self), fields(member = call.member()))]
    async fn call(&self, destination: &str, call: &ControlCall) -> Result<(), MediaError> {
        self.dispatch_control(destination, call)
            .await
            .map_err(|e| MediaError::from_zbus(destination, call.member(), e))
    }

    async fn get_property(
        &self,
        destination: &str,
        interface: &str,
        property: &str,
    ) -> Result<Variant, MediaError> {
        let operation = format!("Get {property}");
        let reply = self
            .call_properties(destination, "Get", &(interface, property))
            .await
            .map_err(|e| MediaError::from_zbus(destination, &operation, e))?;
        let value: OwnedValue = reply
            .body()
            .deserialize()
            .map_err(|e| MediaError::remote(&operation, e))?;
        Ok(Variant::try_from(&value)?)
    }

    async fn get_all_properties(
        &self,
        destination: &str,
        interface: &str,
    ) -> Result<PropertyMap, MediaError> {
        let reply = self
            .call_properties(destination, "GetAll", &(interface,))
            .await
            .map_err(|e| MediaError::from_zbus(destination, "GetAll", e))?;
        let values: HashMap<String, OwnedValue> = reply
            .body()
            .deserialize()
            .map_err(|e| MediaError::remote("GetAll", e))?;
        Ok(decode_map(&values))
    }

    async fn set_property(
        &self,
        destination: &str,
        interface: &str,
        property: &str,
        value: Variant,
    ) -> Result<(), MediaError> {
        let operation = format!("Set {property}");
        let value = value.to_value()?;
        self.call_properties(destination, "Set", &(interface, property, value))
            .await
            .map_err(|e| MediaError::from_zbus(destination, &operation, e))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn subscribe_player_changes(&self) -> Result<ChangeStream, MediaError> {
        let rule = MatchRule::builder()
            .msg_type(zbus::message::Type::Signal)
            .interface(PROPERTIES_INTERFACE)
            .and_then(|builder| builder.member("PropertiesChanged"))
            .and_then(|builder| builder.path(OBJECT_PATH))
            .map_err(|e| MediaError::Subscription(e.to_string()))?
            .build();

        let mut messages = MessageStream::for_match_rule(rule, &self.connection, None)
            .await
            .map_err(|e| MediaError::Subscription(e.to_string()))?;

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(message) = messages.next().await {
                let message = match message {
                    Ok(message) => message,
                    Err(e) => {
                        warn!("Dropping unreadable change signal: {e}");
                        continue;
                    }
                };

                let Some(event) = decode_change(&message) else {
                    continue;
                };

                if events_tx.send(event).is_err() {
                    debug!("Change subscriber went away, stopping signal reader");
                    break;
                }
            }
        });

        Ok(UnboundedReceiverStream::new(events_rx).boxed())
    }
}

fn decode_change(message: &Message) -> Option<ChangeEvent> {
    let header = message.header();
    let owner_id = header.sender()?.to_string();

    let (interface, changed, invalidated): (String, HashMap<String, OwnedValue>, Vec<String>) =
        match message.body().deserialize() {
            Ok(body) => body,
            Err(e) => {
                debug!("Ignoring malformed PropertiesChanged from {owner_id}: {e}");
                return None;
            }
        };

    Some(ChangeEvent {
        owner_id,
        interface,
        changed: decode_map(&changed),
        invalidated,
    })
}
