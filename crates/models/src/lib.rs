//! Domain records (User, Item, Post), their creation inputs, partial-update
//! patches and validation rules, plus the SeaORM entities that persist them.

pub mod errors;
pub mod record;
pub mod patch;
pub mod validate;
pub mod user;
pub mod item;
pub mod post;
pub mod entity;
pub mod db;

pub use errors::ModelError;
pub use item::{Item, ItemField, ItemPatch, NewItem};
pub use patch::PatchField;
pub use post::{NewPost, Post, PostField, PostPatch};
pub use record::{FieldType, FieldValue, Record, RecordField, RecordId, RecordKind, Scalar};
pub use user::{NewUser, User, UserChanges, UserField, UserPatch};
