//! Capabilities the gallery core uses to reach the shell.
//!
//! We use Crux's built-in Render capability directly because it provides
//! all necessary functionality for triggering view updates.

mod collection;

pub use self::collection::{
    Collection, CollectionError, CollectionOperation, CollectionOutput, CollectionResult,
    OperationKind,
};
pub use crux_core::render::Render;

use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub collection: Collection<Event>,
}
