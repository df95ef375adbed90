/// Player discovery over the bus
pub mod client;
/// Media player error types
pub mod error;
/// Track metadata types
pub mod metadata;
/// Handle to a single player
pub mod player;
/// D-Bus proxy trait definitions
pub mod proxy;
/// zbus session bus transport
pub mod session;
/// Transport seam between handles and the bus
pub mod transport;
/// Protocol constants and small value types
pub mod types;
/// MPRIS utility functions
pub mod utils;
/// Loosely typed property values
pub mod variant;

pub use client::*;
pub use error::*;
pub use metadata::*;
pub use player::*;
pub use proxy::*;
pub use session::*;
pub use transport::*;
pub use types::*;
pub use utils::*;
pub use variant::{
    MetadataMap, PropertyMap, TypedArray, TypedMap, TypedStruct, Variant, VariantError,
};
