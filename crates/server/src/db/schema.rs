//! Startup schema provisioning.
//!
//! Ensures both catalog collections and their index sets exist. Best-effort
//! by contract: the service must come up even if provisioning fails, since
//! the store may already be correctly configured. The caller (a spawned
//! startup task) logs the returned result; readiness never depends on it.
//!
//! Idempotency rides on the server's `createIndex` semantics: creating an
//! index whose key signature already exists is a no-op, so re-running
//! [`provision_schema`] against a provisioned store neither errors nor
//! duplicates indexes.

use mongodb::bson::{Bson, Document};
use mongodb::error::ErrorKind;
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use thiserror::Error;
use tracing::{error, info};

use super::{CARDS_COLLECTION, OWNERS_COLLECTION};

/// MongoDB server error code for creating a collection that already exists.
const NAMESPACE_EXISTS_CODE: i32 = 48;

/// Error summarizing a partially failed provisioning run.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// One or more provisioning steps failed; the steps are listed in order.
    #[error("schema provisioning incomplete: {} step(s) failed", .failures.len())]
    Incomplete {
        /// Human-readable description of each failed step.
        failures: Vec<String>,
    },
}

/// Declarative index definition: ordered `(field, direction)` keys plus the
/// uniqueness flag. Directions use the store convention (1 ascending,
/// -1 descending).
pub(crate) struct IndexSpec {
    pub keys: &'static [(&'static str, i32)],
    pub unique: bool,
}

/// Index plan for `pokemon_cards`, in provisioning order.
pub(crate) const CARD_INDEXES: &[IndexSpec] = &[
    IndexSpec {
        keys: &[("name", 1), ("set", 1)],
        unique: true,
    },
    IndexSpec {
        keys: &[("type", 1), ("rarity", 1)],
        unique: false,
    },
    IndexSpec {
        keys: &[("marketPrice", -1)],
        unique: false,
    },
    IndexSpec {
        keys: &[("createdAt", -1)],
        unique: false,
    },
];

/// Index plan for `card_owners`, in provisioning order.
pub(crate) const OWNER_INDEXES: &[IndexSpec] = &[
    IndexSpec {
        keys: &[("email", 1)],
        unique: true,
    },
    IndexSpec {
        keys: &[("lastName", 1), ("firstName", 1)],
        unique: false,
    },
    IndexSpec {
        keys: &[("ownedCardIds", 1)],
        unique: false,
    },
];

impl IndexSpec {
    /// Build the driver index model for this spec.
    pub(crate) fn to_model(&self) -> IndexModel {
        let mut keys = Document::new();
        for (field, direction) in self.keys {
            keys.insert((*field).to_owned(), Bson::Int32(*direction));
        }
        let options = IndexOptions::builder()
            .unique(self.unique.then_some(true))
            .build();
        IndexModel::builder().keys(keys).options(options).build()
    }
}

/// Ensure both collections and their indexes exist.
///
/// Every step runs to completion independently; no step blocks the others.
/// Collection-creation failures (typically prior existence) are logged and
/// swallowed. Index-creation failures are collected into the returned
/// error.
///
/// # Errors
///
/// Returns [`SchemaError::Incomplete`] listing the failed index steps, if
/// any.
pub async fn provision_schema(database: &Database) -> Result<(), SchemaError> {
    info!("provisioning catalog schema");

    // Creation failures are swallowed either way: prior existence is the
    // expected case, anything else is logged loudly and the index steps
    // still get their chance against a store that may already be configured.
    for name in [CARDS_COLLECTION, OWNERS_COLLECTION] {
        match database.create_collection(name).await {
            Ok(()) => info!(collection = name, "created collection"),
            Err(err) if is_namespace_exists(&err) => {
                info!(collection = name, "collection already exists");
            }
            Err(err) => error!(
                collection = name,
                error = %err,
                "failed to create collection"
            ),
        }
    }

    let mut failures = Vec::new();
    create_indexes(database, CARDS_COLLECTION, CARD_INDEXES, &mut failures).await;
    create_indexes(database, OWNERS_COLLECTION, OWNER_INDEXES, &mut failures).await;

    if failures.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Incomplete { failures })
    }
}

/// Whether a driver error reports that the collection already exists.
fn is_namespace_exists(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Command(command_error) if command_error.code == NAMESPACE_EXISTS_CODE
    )
}

async fn create_indexes(
    database: &Database,
    collection: &str,
    specs: &[IndexSpec],
    failures: &mut Vec<String>,
) {
    let handle = database.collection::<Document>(collection);
    for spec in specs {
        match handle.create_index(spec.to_model()).await {
            Ok(result) => info!(
                collection,
                index = %result.index_name,
                unique = spec.unique,
                "ensured index"
            ),
            Err(err) => {
                error!(
                    collection,
                    keys = ?spec.keys,
                    error = %err,
                    "failed to create index"
                );
                failures.push(format!("{collection} {:?}: {err}", spec.keys));
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn key_signature(spec: &IndexSpec) -> Vec<(&'static str, i32)> {
        spec.keys.to_vec()
    }

    #[test]
    fn test_card_index_plan_order_and_keys() {
        let signatures: Vec<_> = CARD_INDEXES.iter().map(key_signature).collect();
        assert_eq!(
            signatures,
            vec![
                vec![("name", 1), ("set", 1)],
                vec![("type", 1), ("rarity", 1)],
                vec![("marketPrice", -1)],
                vec![("createdAt", -1)],
            ]
        );
    }

    #[test]
    fn test_owner_index_plan_order_and_keys() {
        let signatures: Vec<_> = OWNER_INDEXES.iter().map(key_signature).collect();
        assert_eq!(
            signatures,
            vec![
                vec![("email", 1)],
                vec![("lastName", 1), ("firstName", 1)],
                vec![("ownedCardIds", 1)],
            ]
        );
    }

    #[test]
    fn test_only_intended_indexes_are_unique() {
        let unique_card_keys: Vec<_> = CARD_INDEXES
            .iter()
            .filter(|s| s.unique)
            .map(key_signature)
            .collect();
        assert_eq!(unique_card_keys, vec![vec![("name", 1), ("set", 1)]]);

        let unique_owner_keys: Vec<_> = OWNER_INDEXES
            .iter()
            .filter(|s| s.unique)
            .map(key_signature)
            .collect();
        assert_eq!(unique_owner_keys, vec![vec![("email", 1)]]);
    }

    #[test]
    fn test_to_model_preserves_key_order_and_uniqueness() {
        let spec = &CARD_INDEXES[0];
        let model = spec.to_model();

        let fields: Vec<_> = model.keys.keys().cloned().collect();
        assert_eq!(fields, vec!["name", "set"]);
        assert_eq!(model.keys.get("name"), Some(&Bson::Int32(1)));

        let options = model.options.unwrap();
        assert_eq!(options.unique, Some(true));
    }

    #[test]
    fn test_non_unique_spec_builds_without_unique_flag() {
        let spec = &CARD_INDEXES[2];
        let model = spec.to_model();
        assert_eq!(model.keys.get("marketPrice"), Some(&Bson::Int32(-1)));
        assert_eq!(model.options.unwrap().unique, None);
    }

    async fn index_count(database: &Database, collection: &str) -> usize {
        use futures::TryStreamExt;
        database
            .collection::<Document>(collection)
            .list_indexes()
            .await
            .unwrap()
            .try_collect::<Vec<_>>()
            .await
            .unwrap()
            .len()
    }

    /// Requires a live store; skipped unless `CARDFOLIO_MONGODB_URL` is set.
    #[tokio::test]
    async fn test_reprovisioning_existing_schema_is_a_no_op() {
        let Ok(url) = std::env::var("CARDFOLIO_MONGODB_URL") else {
            eprintln!("CARDFOLIO_MONGODB_URL not set, skipping");
            return;
        };
        let name = std::env::var("CARDFOLIO_DATABASE")
            .unwrap_or_else(|_| "pokemon_db".to_string());
        let database = crate::db::connect(&secrecy::SecretString::from(url), &name)
            .await
            .unwrap();

        provision_schema(&database).await.unwrap();
        let cards_before = index_count(&database, CARDS_COLLECTION).await;
        let owners_before = index_count(&database, OWNERS_COLLECTION).await;

        // Second run succeeds and creates nothing new
        provision_schema(&database).await.unwrap();
        assert_eq!(index_count(&database, CARDS_COLLECTION).await, cards_before);
        assert_eq!(
            index_count(&database, OWNERS_COLLECTION).await,
            owners_before
        );
    }
}
