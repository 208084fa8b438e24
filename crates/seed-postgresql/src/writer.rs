//! Transactional batch writer: one transaction per logical stage.

use crate::error::SinkError;
use crate::insert::{insert_returning_ids, DEFAULT_BATCH_SIZE};
use seed_core::model::{backfill_ids, TableRecord};
use seed_core::SqlValue;
use std::fmt;
use tokio_postgres::Client;
use tracing::{debug, info};
use uuid::Uuid;

/// Opaque run-scoped tag grouping every write of one seeding run. Eight
/// hex characters, matching the warehouse `batch_id CHAR(8)` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchId(String);

impl BatchId {
    pub fn generate() -> Self {
        let mut tag = Uuid::new_v4().simple().to_string();
        tag.truncate(8);
        Self(tag)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Writes whole stages of rows and assigns their surrogate ids.
///
/// Each [`BatchWriter::persist`] call wraps one logical stage in a single
/// transaction: either every row of the stage commits and the returned ids
/// are folded back into the rows, or the transaction rolls back when it is
/// dropped unresolved and no ids are assigned.
pub struct BatchWriter {
    client: Client,
    batch_id: BatchId,
    batch_size: usize,
}

impl BatchWriter {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            batch_id: BatchId::generate(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set the number of rows per INSERT statement.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// The run-scoped batch tag.
    pub fn batch_id(&self) -> &BatchId {
        &self.batch_id
    }

    /// The underlying session, for read-back queries after seeding.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Persist a stage of rows, returning the assigned ids in input order
    /// and backfilling them into the rows.
    pub async fn persist<R: TableRecord>(
        &mut self,
        rows: &mut [R],
    ) -> Result<Vec<i32>, SinkError> {
        let spec = R::spec();
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            table = spec.name,
            rows = rows.len(),
            batch = %self.batch_id,
            "persisting stage"
        );

        let tx = self.client.transaction().await?;
        let mut ids = Vec::with_capacity(rows.len());
        for chunk in rows.chunks(self.batch_size) {
            let values: Vec<Vec<SqlValue>> = chunk.iter().map(TableRecord::values).collect();
            ids.extend(insert_returning_ids(&tx, spec, &values).await?);
            debug!(
                table = spec.name,
                inserted = ids.len(),
                total = rows.len(),
                "chunk written"
            );
        }
        tx.commit().await?;

        // Ids become visible to callers only after the commit succeeded.
        backfill_ids(rows, &ids)?;
        Ok(ids)
    }
}
