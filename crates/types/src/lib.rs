//! Identifier types shared by the modifier synchronization crates.
//!
//! - [`ModifierId`]: content address of a block section or transaction
//! - [`ModifierTypeId`]: kind tag carried with every request
//! - [`PeerId`]: identity of a connected peer

mod identifiers;
mod modifier_id;

pub use identifiers::{ModifierTypeId, PeerId};
pub use modifier_id::{IdError, ModifierId};
