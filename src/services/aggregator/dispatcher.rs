use tracing::{debug, instrument};

use crate::services::mpris::{ControlCall, PROPERTIES_INTERFACE, PropertyMap, Variant};

use super::{
    DispatchError, Selector,
    extension::ExtensionInterface,
    introspection,
};

const MACHINE_ID_PATHS: [&str; 2] = ["/etc/machine-id", "/var/lib/dbus/machine-id"];

/// An inbound call on the aggregator object, decoded from the bus message
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// A player control method
    Control(ControlCall),

    /// `org.freedesktop.DBus.Properties.Get`
    Get {
        /// Interface owning the property
        interface: String,
        /// Property name
        property: String,
    },

    /// `org.freedesktop.DBus.Properties.GetAll`
    GetAll {
        /// Interface whose properties are requested
        interface: String,
    },

    /// `org.freedesktop.DBus.Properties.Set`
    Set {
        /// Interface owning the property
        interface: String,
        /// Property name
        property: String,
        /// New value
        value: Variant,
    },

    /// `org.freedesktop.DBus.Introspectable.Introspect`
    Introspect,

    /// `org.freedesktop.DBus.Peer.Ping`
    Ping,

    /// `org.freedesktop.DBus.Peer.GetMachineId`
    GetMachineId,

    /// A method of a registered extension interface
    Extension {
        /// Extension interface name
        interface: String,
        /// Member name
        member: String,
        /// Decoded arguments
        args: Vec<Variant>,
    },
}

/// Reply payload of a dispatched request
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// No return value
    Empty,
    /// A single variant (`v`)
    Variant(Variant),
    /// A property dictionary (`a{sv}`)
    Properties(PropertyMap),
    /// A single string (`s`)
    Text(String),
    /// A list of names (`as`)
    Names(Vec<String>),
}

/// Routes calls on the aggregator object to the selected player.
///
/// With no player selected, control calls and `Set` succeed without doing
/// anything and `GetAll` answers an empty dictionary.
pub struct ProxyDispatcher {
    selector: Selector,
    extensions: Vec<&'static ExtensionInterface>,
    introspection: String,
}

impl ProxyDispatcher {
    /// Create a dispatcher exporting only the standard interfaces
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            extensions: Vec::new(),
            introspection: introspection::render(&[]),
        }
    }

    /// Register an extension interface and append it to the introspection document
    #[must_use]
    pub fn with_extension(mut self, extension: &'static ExtensionInterface) -> Self {
        self.extensions.push(extension);
        self.introspection = introspection::render(&self.extensions);
        self
    }

    /// The selector calls are routed through
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The introspection document served verbatim to every caller
    pub fn introspection(&self) -> &str {
        &self.introspection
    }

    /// Whether `interface` is served by the aggregator itself
    pub fn is_extension(&self, interface: &str) -> bool {
        self.extensions
            .iter()
            .any(|extension| extension.name == interface)
    }

    fn is_private(&self, interface: &str) -> bool {
        interface == PROPERTIES_INTERFACE || self.is_extension(interface)
    }

    /// Handle one request.
    ///
    /// # Errors
    /// Returns error if the forwarded call fails, or the request names
    /// something the aggregator does not serve
    #[instrument(skip(self), level = "debug")]
    pub async fn dispatch(&self, request: Request) -> Result<Response, DispatchError> {
        match request {
            Request::Control(call) => self.control(call).await,
            Request::Get {
                interface,
                property,
            } => self.get(&interface, &property).await,
            Request::GetAll { interface } => self.get_all(&interface).await,
            Request::Set {
                interface,
                property,
                value,
            } => self.set(&interface, &property, value).await,
            Request::Introspect => Ok(Response::Text(self.introspection.clone())),
            Request::Ping => Ok(Response::Empty),
            Request::GetMachineId => read_machine_id().await.map(Response::Text),
            Request::Extension {
                interface,
                member,
                args,
            } => self.extension(&interface, &member, args).await,
        }
    }

    async fn control(&self, call: ControlCall) -> Result<Response, DispatchError> {
        let Some(player) = self.selector.state().current().await else {
            debug!("No player selected, ignoring {}", call.member());
            return Ok(Response::Empty);
        };

        player.control(&call).await?;
        Ok(Response::Empty)
    }

    async fn get(&self, interface: &str, property: &str) -> Result<Response, DispatchError> {
        if self.is_private(interface) {
            return Err(DispatchError::unknown_property(interface, property));
        }

        let Some(player) = self.selector.state().current().await else {
            return Err(DispatchError::unknown_property(interface, property));
        };

        Ok(Response::Variant(player.get(interface, property).await?))
    }

    async fn get_all(&self, interface: &str) -> Result<Response, DispatchError> {
        if self.is_private(interface) {
            return Ok(Response::Properties(PropertyMap::new()));
        }

        let Some(player) = self.selector.state().current().await else {
            return Ok(Response::Properties(PropertyMap::new()));
        };

        Ok(Response::Properties(player.get_all(interface).await?))
    }

    async fn set(
        &self,
        interface: &str,
        property: &str,
        value: Variant,
    ) -> Result<Response, DispatchError> {
        if self.is_private(interface) {
            return Err(DispatchError::unknown_property(interface, property));
        }

        let Some(player) = self.selector.state().current().await else {
            debug!("No player selected, ignoring Set {property}");
            return Ok(Response::Empty);
        };

        player.set(interface, property, value).await?;
        Ok(Response::Empty)
    }

    async fn extension(
        &self,
        interface: &str,
        member: &str,
        args: Vec<Variant>,
    ) -> Result<Response, DispatchError> {
        let operation = self
            .extensions
            .iter()
            .find(|extension| extension.name == interface)
            .and_then(|extension| extension.operation(member))
            .ok_or_else(|| DispatchError::unknown_method(interface, member))?;

        (operation.handler)(&self.selector, args).await
    }
}

async fn read_machine_id() -> Result<String, DispatchError> {
    let mut last_error = None;

    for path in MACHINE_ID_PATHS {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => return Ok(contents.trim().to_string()),
            Err(e) => last_error = Some(format!("{path}: {e}")),
        }
    }

    Err(DispatchError::Io(last_error.unwrap_or_default()))
}
