//! redb-backed storage for trips, one table (bucket) per trip and one entry per day.

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveTime};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, TableError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Could not have duplicate transaction on the same day: {0}")]
    DuplicateTransaction(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub name: String,
    pub transactions: Vec<Transaction>,
}

impl Trip {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            transactions: Vec::new(),
        }
    }

    fn ensure_unique(&self, name: &str) -> StoreResult<()> {
        if self.transactions.iter().any(|tx| tx.name == name) {
            Err(StoreError::DuplicateTransaction(name.to_owned()))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub name: String,
    pub amount: BigDecimal,
    #[serde(default)]
    pub paid_by: Option<String>,
    pub shares: Vec<StoredShare>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredShare {
    pub member: String,
    pub amount: BigDecimal,
}

/// UTC midnight of the day, e.g. `2024-06-01T00:00:00+00:00`.
pub fn day_key(day: NaiveDate) -> String {
    day.and_time(NaiveTime::MIN).and_utc().to_rfc3339()
}

fn bucket(name: &str) -> TableDefinition<'_, &'static str, &'static [u8]> {
    TableDefinition::new(name)
}

pub struct TripStore {
    db: Database,
}

impl TripStore {
    /// Open or create the database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        debug!("opening {:?}", path.as_ref());
        let db = Database::create(path)?;
        Ok(Self { db })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Ok(Self { db })
    }

    pub fn retrieve(&self, bucket_name: &str, key: &str) -> StoreResult<Option<Trip>> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(bucket(bucket_name)) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => {
                return Err(StoreError::BucketNotFound(bucket_name.to_owned()))
            }
            Err(e) => return Err(e.into()),
        };

        match table.get(key)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Appends the transaction to the day's trip, creating the bucket and the trip as needed.
    pub fn add_transaction(
        &self,
        bucket_name: &str,
        transaction: Transaction,
        day: NaiveDate,
    ) -> StoreResult<Trip> {
        let key = day_key(day);
        let write_txn = self.db.begin_write()?;
        let trip = {
            let mut table = write_txn.open_table(bucket(bucket_name))?;

            let existing = table.get(key.as_str())?.map(|guard| guard.value().to_vec());
            let mut trip = match existing {
                Some(bytes) => serde_json::from_slice(&bytes)?,
                None => Trip::new(bucket_name),
            };

            trip.ensure_unique(&transaction.name)?;
            trip.transactions.push(transaction);

            let value = serde_json::to_vec(&trip)?;
            table.insert(key.as_str(), value.as_slice())?;
            trip
        };
        write_txn.commit()?;

        info!(
            bucket = bucket_name,
            key = %key,
            transactions = trip.transactions.len(),
            "stored transaction"
        );

        Ok(trip)
    }

    /// Every stored day of the bucket in key (chronological) order.
    pub fn trips(&self, bucket_name: &str) -> StoreResult<Vec<(String, Trip)>> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(bucket(bucket_name)) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        table
            .iter()?
            .map(|entry| -> StoreResult<(String, Trip)> {
                let (key, value) = entry?;
                Ok((key.value().to_owned(), serde_json::from_slice(value.value())?))
            })
            .collect()
    }

    pub fn delete_bucket(&self, bucket_name: &str) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        let deleted = write_txn.delete_table(bucket(bucket_name))?;
        write_txn.commit()?;

        info!(bucket = bucket_name, deleted, "deleted bucket");

        Ok(deleted)
    }
}
