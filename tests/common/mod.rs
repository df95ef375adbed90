//! In-memory bus shared by the integration tests.

#![allow(dead_code)]

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use futures::StreamExt;
use musicwand::services::mpris::{
    APP_INTERFACE, BusTransport, ChangeEvent, ChangeStream, ControlCall, MediaError,
    MprisClient, PLAYER_INTERFACE, PropertyMap, Variant,
};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// A call the mock received, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Control { destination: String, member: String },
    Get { destination: String, property: String },
    GetAll { destination: String, interface: String },
    Set { destination: String, property: String, value: Variant },
}

#[derive(Debug, Clone)]
struct MockPlayer {
    name: String,
    owner: String,
    properties: BTreeMap<String, PropertyMap>,
}

#[derive(Default)]
struct Inner {
    players: Vec<MockPlayer>,
    other_names: Vec<String>,
    calls: Vec<Recorded>,
    subscribers: Vec<mpsc::UnboundedSender<ChangeEvent>>,
}

/// Fake session bus hosting scripted players
#[derive(Default)]
pub struct MockBus {
    inner: Mutex<Inner>,
}

impl MockBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a player with the given playback status and identity
    pub fn add_player(&self, name: &str, owner: &str, status: &str, identity: &str) {
        let mut player_props = PropertyMap::new();
        player_props.insert("PlaybackStatus".to_string(), Variant::from(status));
        player_props.insert("Volume".to_string(), Variant::from(0.5));
        player_props.insert("Metadata".to_string(), Variant::Dict(PropertyMap::new()));

        let mut app_props = PropertyMap::new();
        app_props.insert("Identity".to_string(), Variant::from(identity));

        let mut properties = BTreeMap::new();
        properties.insert(PLAYER_INTERFACE.to_string(), player_props);
        properties.insert(APP_INTERFACE.to_string(), app_props);

        self.inner.lock().unwrap().players.push(MockPlayer {
            name: name.to_string(),
            owner: owner.to_string(),
            properties,
        });
    }

    /// Register a bus name that is not a media player
    pub fn add_name(&self, name: &str) {
        self.inner.lock().unwrap().other_names.push(name.to_string());
    }

    pub fn remove_player(&self, name: &str) {
        self.inner
            .lock()
            .unwrap()
            .players
            .retain(|player| player.name != name);
    }

    pub fn set_metadata(&self, name: &str, metadata: PropertyMap) {
        self.set_value(name, PLAYER_INTERFACE, "Metadata", Variant::Dict(metadata));
    }

    pub fn set_value(&self, name: &str, interface: &str, property: &str, value: Variant) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(player) = inner.players.iter_mut().find(|p| p.name == name) {
            player
                .properties
                .entry(interface.to_string())
                .or_default()
                .insert(property.to_string(), value);
        }
    }

    pub fn value(&self, name: &str, interface: &str, property: &str) -> Option<Variant> {
        let inner = self.inner.lock().unwrap();
        inner
            .players
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.properties.get(interface))
            .and_then(|props| props.get(property))
            .cloned()
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    /// Deliver a change notification from `owner` to every subscriber
    pub fn emit_change(&self, owner: &str, property: &str, value: Variant) {
        let mut event = ChangeEvent::from_owner(owner);
        event.interface = PLAYER_INTERFACE.to_string();
        event.changed.insert(property.to_string(), value);

        let inner = self.inner.lock().unwrap();
        for subscriber in &inner.subscribers {
            let _ = subscriber.send(event.clone());
        }
    }

    /// Drop every subscription, ending the change streams
    pub fn disconnect(&self) {
        self.inner.lock().unwrap().subscribers.clear();
    }

    fn player(&self, destination: &str) -> Result<MockPlayer, MediaError> {
        self.inner
            .lock()
            .unwrap()
            .players
            .iter()
            .find(|p| p.name == destination)
            .cloned()
            .ok_or_else(|| MediaError::ServiceNotFound(destination.to_string()))
    }

    fn record(&self, call: Recorded) {
        self.inner.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl BusTransport for MockBus {
    async fn list_names(&self) -> Result<Vec<String>, MediaError> {
        let inner = self.inner.lock().unwrap();
        let mut names = vec!["org.freedesktop.DBus".to_string()];
        names.extend(inner.other_names.iter().cloned());
        names.extend(inner.players.iter().map(|p| p.name.clone()));
        Ok(names)
    }

    async fn name_owner(&self, name: &str) -> Result<String, MediaError> {
        Ok(self.player(name)?.owner)
    }

    async fn call(&self, destination: &str, call: &ControlCall) -> Result<(), MediaError> {
        self.player(destination)?;
        self.record(Recorded::Control {
            destination: destination.to_string(),
            member: call.member().to_string(),
        });

        let status = match call {
            ControlCall::Play => Some("Playing"),
            ControlCall::Pause => Some("Paused"),
            ControlCall::Stop => Some("Stopped"),
            _ => None,
        };
        if let Some(status) = status {
            self.set_value(
                destination,
                PLAYER_INTERFACE,
                "PlaybackStatus",
                Variant::from(status),
            );
        }
        Ok(())
    }

    async fn get_property(
        &self,
        destination: &str,
        interface: &str,
        property: &str,
    ) -> Result<Variant, MediaError> {
        let player = self.player(destination)?;
        self.record(Recorded::Get {
            destination: destination.to_string(),
            property: property.to_string(),
        });

        player
            .properties
            .get(interface)
            .and_then(|props| props.get(property))
            .cloned()
            .ok_or_else(|| MediaError::remote(format!("Get {property}"), "no such property"))
    }

    async fn get_all_properties(
        &self,
        destination: &str,
        interface: &str,
    ) -> Result<PropertyMap, MediaError> {
        let player = self.player(destination)?;
        self.record(Recorded::GetAll {
            destination: destination.to_string(),
            interface: interface.to_string(),
        });

        Ok(player.properties.get(interface).cloned().unwrap_or_default())
    }

    async fn set_property(
        &self,
        destination: &str,
        interface: &str,
        property: &str,
        value: Variant,
    ) -> Result<(), MediaError> {
        self.player(destination)?;
        self.record(Recorded::Set {
            destination: destination.to_string(),
            property: property.to_string(),
            value: value.clone(),
        });

        let stored = match (property, value.as_f64()) {
            ("Volume", Ok(volume)) => Variant::from(volume.clamp(0.0, 1.0)),
            _ => value,
        };
        self.set_value(destination, interface, property, stored);
        Ok(())
    }

    async fn subscribe_player_changes(&self) -> Result<ChangeStream, MediaError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.lock().unwrap().subscribers.push(tx);
        Ok(UnboundedReceiverStream::new(rx).boxed())
    }
}

/// Client over `bus` with nothing ignored
pub fn client(bus: &Arc<MockBus>) -> MprisClient {
    MprisClient::new(Arc::clone(bus) as Arc<dyn BusTransport>)
}

/// Two players: `a` stopped (Spotify), `b` playing (mpv)
pub fn two_players() -> Arc<MockBus> {
    let bus = MockBus::new();
    bus.add_name(":1.1");
    bus.add_player("org.mpris.MediaPlayer2.spotify", ":1.10", "Stopped", "Spotify");
    bus.add_player("org.mpris.MediaPlayer2.mpv", ":1.20", "Playing", "mpv");
    bus
}

pub const SPOTIFY: &str = "org.mpris.MediaPlayer2.spotify";
pub const SPOTIFY_OWNER: &str = ":1.10";
pub const MPV: &str = "org.mpris.MediaPlayer2.mpv";
pub const MPV_OWNER: &str = ":1.20";
