//! Runtime index inspection.
//!
//! Reads the indexes actually present on a collection, independent of what
//! [`super::schema`] intended to create. Used at startup to log the live
//! index state and by the admin surface to serve index reports.

use futures::TryStreamExt;
use mongodb::bson::Document;
use mongodb::error::ErrorKind;
use mongodb::{Database, IndexModel};
use serde::Serialize;
use tracing::info;

use super::{CARDS_COLLECTION, OWNERS_COLLECTION, RepositoryError};

/// MongoDB server error code for listing indexes on a missing collection.
const NAMESPACE_NOT_FOUND_CODE: i32 = 26;

/// One index as reported by the store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDescriptor {
    pub name: String,
    /// Ordered key document, e.g. `{ "name": 1, "set": 1 }`.
    pub key: Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sparse: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_after_seconds: Option<u64>,
}

/// Index report for a single collection, shaped for the admin surface.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexReport {
    pub collection: String,
    pub total_index_count: usize,
    pub indexes: Vec<IndexDescriptor>,
}

impl IndexDescriptor {
    fn from_model(model: IndexModel) -> Self {
        let options = model.options.unwrap_or_default();
        Self {
            name: options.name.unwrap_or_default(),
            key: model.keys,
            unique: options.unique,
            sparse: options.sparse,
            background: options.background,
            expire_after_seconds: options.expire_after.map(|d| d.as_secs()),
        }
    }
}

/// Reads live index metadata from the catalog collections.
#[derive(Clone)]
pub struct IndexInspector {
    database: Database,
}

impl IndexInspector {
    #[must_use]
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Report the indexes currently present on a collection.
    ///
    /// An empty or never-created collection yields an empty report rather
    /// than an error.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Store`] if the index listing fails.
    pub async fn report(&self, collection: &str) -> Result<IndexReport, RepositoryError> {
        let handle = self.database.collection::<Document>(collection);
        let mut cursor = match handle.list_indexes().await {
            Ok(cursor) => cursor,
            // Listing a collection that was never created is NamespaceNotFound
            Err(err) if is_namespace_not_found(&err) => {
                return Ok(IndexReport {
                    collection: collection.to_owned(),
                    total_index_count: 0,
                    indexes: Vec::new(),
                });
            }
            Err(err) => return Err(err.into()),
        };
        let mut indexes = Vec::new();
        while let Some(model) = cursor.try_next().await? {
            indexes.push(IndexDescriptor::from_model(model));
        }
        Ok(IndexReport {
            collection: collection.to_owned(),
            total_index_count: indexes.len(),
            indexes,
        })
    }

    /// Log the live index state of both catalog collections.
    ///
    /// Startup diagnostics only. Failures are logged, not propagated, so a
    /// slow or unreachable store cannot block boot.
    pub async fn log_report(&self) {
        for collection in [CARDS_COLLECTION, OWNERS_COLLECTION] {
            match self.report(collection).await {
                Ok(report) => {
                    info!(
                        collection,
                        total = report.total_index_count,
                        "index report"
                    );
                    for index in &report.indexes {
                        info!(
                            collection,
                            name = %index.name,
                            key = %index.key,
                            unique = index.unique.unwrap_or(false),
                            "index"
                        );
                    }
                }
                Err(err) => info!(collection, error = %err, "index report unavailable"),
            }
        }
    }
}

/// Whether a driver error reports that the collection does not exist.
fn is_namespace_not_found(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Command(command_error) if command_error.code == NAMESPACE_NOT_FOUND_CODE
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use mongodb::options::IndexOptions;

    #[test]
    fn test_descriptor_from_model_with_options() {
        let model = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name("email_1".to_owned())
                    .unique(true)
                    .build(),
            )
            .build();

        let descriptor = IndexDescriptor::from_model(model);
        assert_eq!(descriptor.name, "email_1");
        assert_eq!(descriptor.key, doc! { "email": 1 });
        assert_eq!(descriptor.unique, Some(true));
        assert_eq!(descriptor.sparse, None);
        assert_eq!(descriptor.expire_after_seconds, None);
    }

    #[test]
    fn test_descriptor_from_bare_model() {
        let model = IndexModel::builder().keys(doc! { "_id": 1 }).build();
        let descriptor = IndexDescriptor::from_model(model);
        assert_eq!(descriptor.name, "");
        assert_eq!(descriptor.key, doc! { "_id": 1 });
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = IndexReport {
            collection: CARDS_COLLECTION.to_owned(),
            total_index_count: 1,
            indexes: vec![IndexDescriptor {
                name: "name_1_set_1".to_owned(),
                key: doc! { "name": 1, "set": 1 },
                unique: Some(true),
                sparse: None,
                background: None,
                expire_after_seconds: None,
            }],
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["collection"], "pokemon_cards");
        assert_eq!(value["totalIndexCount"], 1);
        assert_eq!(value["indexes"][0]["unique"], true);
        assert!(value["indexes"][0].get("sparse").is_none());
    }

    /// Requires a live store; skipped unless `CARDFOLIO_MONGODB_URL` is set.
    #[tokio::test]
    async fn test_missing_collection_yields_empty_report() {
        let Ok(url) = std::env::var("CARDFOLIO_MONGODB_URL") else {
            eprintln!("CARDFOLIO_MONGODB_URL not set, skipping");
            return;
        };
        let name = std::env::var("CARDFOLIO_DATABASE")
            .unwrap_or_else(|_| "pokemon_db".to_string());
        let database = crate::db::connect(&secrecy::SecretString::from(url), &name)
            .await
            .unwrap();
        let inspector = IndexInspector::new(database);

        let report = inspector
            .report("never_created_collection")
            .await
            .unwrap();
        assert_eq!(report.collection, "never_created_collection");
        assert_eq!(report.total_index_count, 0);
        assert!(report.indexes.is_empty());
    }
}
