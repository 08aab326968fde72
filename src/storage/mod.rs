pub mod bag;
pub mod collection;
pub mod entity;
pub mod shared;

pub use bag::FieldBag;
pub use collection::{Collection, CollectionRef};
pub use entity::{Entity, EntityRef};
pub use shared::Shared;

/// Storage that keeps its fields in a `FieldBag`.
pub trait HasFields {
    fn fields(&self) -> &FieldBag;

    fn fields_mut(&mut self) -> &mut FieldBag;
}
