//! Administrative interface layered onto the aggregator object.
//!
//! Extension interfaces are declared as static tables of operations; each
//! operation carries its introspection signature and a plain function
//! pointer that handles the call.

use futures::future::BoxFuture;
use zbus::proxy;

use crate::services::mpris::Variant;

use super::{
    DispatchError, Response, Selector,
    introspection::{ArgSpec, MethodSpec},
};

/// Name of the musicwand administrative interface
pub const EXTENSION_INTERFACE: &str = "com.github.musicwand";

/// Handler of one extension operation
pub type Handler =
    for<'a> fn(&'a Selector, Vec<Variant>) -> BoxFuture<'a, Result<Response, DispatchError>>;

/// One callable operation of an extension interface
pub struct Operation {
    /// Introspected signature
    pub method: MethodSpec,
    /// Function invoked with the decoded arguments
    pub handler: Handler,
}

/// An interface registered on top of the standard ones
pub struct ExtensionInterface {
    /// Interface name
    pub name: &'static str,
    /// Operations, looked up by member name
    pub operations: &'static [Operation],
}

impl ExtensionInterface {
    /// Find the operation implementing `member`
    pub fn operation(&self, member: &str) -> Option<&'static Operation> {
        self.operations
            .iter()
            .find(|operation| operation.method.name == member)
    }
}

/// The `com.github.musicwand` interface
pub static MUSICWAND_INTERFACE: ExtensionInterface = ExtensionInterface {
    name: EXTENSION_INTERFACE,
    operations: &[
        Operation {
            method: MethodSpec {
                name: "SetCurrentPlayer",
                args: &[ArgSpec::input("name", "s")],
            },
            handler: set_current_player,
        },
        Operation {
            method: MethodSpec {
                name: "CurrentPlayer",
                args: &[ArgSpec::output("name", "s")],
            },
            handler: current_player,
        },
        Operation {
            method: MethodSpec {
                name: "ListPlayers",
                args: &[ArgSpec::output("names", "as")],
            },
            handler: list_players,
        },
    ],
};

fn expect_no_args(args: &[Variant]) -> Result<(), DispatchError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(DispatchError::InvalidArgs(format!(
            "expected no arguments, got {}",
            args.len()
        )))
    }
}

fn set_current_player(
    selector: &Selector,
    args: Vec<Variant>,
) -> BoxFuture<'_, Result<Response, DispatchError>> {
    Box::pin(async move {
        let name = match args.as_slice() {
            [name] => name
                .as_str()
                .map_err(|e| DispatchError::InvalidArgs(e.to_string()))?
                .to_string(),
            _ => {
                return Err(DispatchError::InvalidArgs(
                    "expected a player name".to_string(),
                ));
            }
        };

        match selector.select_by_name(&name).await? {
            Some(_) => Ok(Response::Empty),
            None => Err(DispatchError::ServiceNotFound(name)),
        }
    })
}

fn current_player(
    selector: &Selector,
    args: Vec<Variant>,
) -> BoxFuture<'_, Result<Response, DispatchError>> {
    Box::pin(async move {
        expect_no_args(&args)?;
        Ok(Response::Text(selector.state().current_name().await))
    })
}

fn list_players(
    selector: &Selector,
    args: Vec<Variant>,
) -> BoxFuture<'_, Result<Response, DispatchError>> {
    Box::pin(async move {
        expect_no_args(&args)?;
        Ok(Response::Names(selector.list_names().await?))
    })
}

/// Client side of the `com.github.musicwand` interface
#[proxy(
    interface = "com.github.musicwand",
    default_path = "/org/mpris/MediaPlayer2"
)]
pub trait Musicwand {
    /// Select the player whose bus name ends with `name`
    fn set_current_player(&self, name: &str) -> zbus::Result<()>;

    /// Bus name of the selected player
    fn current_player(&self) -> zbus::Result<String>;

    /// Bus names of every discoverable player
    fn list_players(&self) -> zbus::Result<Vec<String>>;
}
