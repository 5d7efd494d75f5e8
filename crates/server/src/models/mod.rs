//! Domain models for the catalog.
//!
//! Wire names follow the stored document layout (camelCase, `type` for the
//! card type, `_id`-backed ids exposed as plain strings). Create/update
//! request bodies are the `*Draft` types - identity and timestamps are owned
//! by the service layer, never accepted from callers.

pub mod card;
pub mod owner;

pub use card::{Card, CardDraft};
pub use owner::{Address, Owner, OwnerDraft};
