//! Database operations for the catalog MongoDB.
//!
//! # Database: `pokemon_db`
//!
//! Two collections, updated independently (no cross-collection atomicity):
//!
//! - [`CARDS_COLLECTION`] - trading cards, unique on `(name, set)`
//! - [`OWNERS_COLLECTION`] - card owners, unique on `email`
//!
//! Schema provisioning happens at startup via [`schema::provision_schema`]
//! (fire-and-forget, see `main`); [`indexes::IndexInspector`] reports the
//! indexes actually present.

pub mod cards;
pub mod indexes;
pub mod owners;
pub mod schema;

use mongodb::bson::oid::ObjectId;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

pub use cards::{CardRepository, CardStore};
pub use indexes::IndexInspector;
pub use owners::{OwnerRepository, OwnerStore};

/// Collection holding the trading cards.
pub const CARDS_COLLECTION: &str = "pokemon_cards";

/// Collection holding the card owners.
pub const OWNERS_COLLECTION: &str = "card_owners";

/// MongoDB server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Driver error from the document store.
    #[error("store error: {0}")]
    Store(#[from] mongodb::error::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique index violation (e.g. duplicate email or name+set pair).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Caller-supplied identity is not a valid document key.
    #[error("invalid id: {0}")]
    InvalidId(String),
}

/// Connect to MongoDB and select the catalog database.
///
/// The returned [`Database`] handle is the single store handle of the
/// process; it is passed explicitly into each repository constructor.
///
/// # Errors
///
/// Returns `mongodb::error::Error` if the connection string cannot be
/// parsed or the client cannot be constructed.
pub async fn connect(
    mongodb_url: &SecretString,
    database: &str,
) -> Result<Database, mongodb::error::Error> {
    let options = ClientOptions::parse(mongodb_url.expose_secret()).await?;
    let client = Client::with_options(options)?;
    Ok(client.database(database))
}

/// Parse a caller-supplied identity into a document key.
///
/// # Errors
///
/// Returns [`RepositoryError::InvalidId`] if the string is not a valid
/// ObjectId hex representation.
pub(crate) fn parse_object_id(id: &str) -> Result<ObjectId, RepositoryError> {
    ObjectId::parse_str(id).map_err(|_| RepositoryError::InvalidId(id.to_owned()))
}

/// Whether a driver error reports a unique index violation.
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// Map a write error to [`RepositoryError::Conflict`] when it reports a
/// unique index violation, passing everything else through as a store error.
pub(crate) fn conflict_on_duplicate(
    err: mongodb::error::Error,
    message: &str,
) -> RepositoryError {
    if is_duplicate_key(&err) {
        RepositoryError::Conflict(message.to_owned())
    } else {
        RepositoryError::Store(err)
    }
}
