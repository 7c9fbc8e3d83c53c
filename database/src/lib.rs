//! Key-value persistence for user settings and the last trend scan.
//!
//! The content façade never touches storage; the binary loads settings from a
//! store and hands them to each call.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use socialarch_core::{CoreError, DatabaseError, Settings, TrendItem};
use tracing::{debug, warn};

pub const SETTINGS_KEY: &str = "app_settings";
pub const TRENDS_KEY: &str = "app_trends";

/// Raw string storage keyed by name. Values are JSON documents.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn load_raw(&self, key: &str) -> Result<Option<String>, CoreError>;

    async fn save_raw(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// Returns whether a value was present.
    async fn remove(&self, key: &str) -> Result<bool, CoreError>;
}

/// Typed JSON access on top of any [`KeyValueStore`].
#[async_trait]
pub trait StoreExt: KeyValueStore {
    async fn load<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>, CoreError> {
        let Some(raw) = self.load_raw(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw).map(Some).map_err(|e| {
            DatabaseError::CorruptValue {
                key: key.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    async fn save<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), CoreError> {
        let raw = serde_json::to_string(value)?;
        self.save_raw(key, &raw).await
    }
}

impl<S: KeyValueStore + ?Sized> StoreExt for S {}

/// Persisted settings merged over the defaults. A missing or unreadable entry
/// yields the defaults; only storage failures are errors.
pub async fn load_settings(store: &dyn KeyValueStore) -> Result<Settings, CoreError> {
    match store.load::<Settings>(SETTINGS_KEY).await {
        Ok(Some(settings)) => Ok(settings),
        Ok(None) => {
            debug!("No stored settings, using defaults");
            Ok(Settings::default())
        }
        Err(CoreError::Database(DatabaseError::CorruptValue { reason, .. })) => {
            warn!("Stored settings are unreadable ({}), using defaults", reason);
            Ok(Settings::default())
        }
        Err(e) => Err(e),
    }
}

pub async fn save_settings(store: &dyn KeyValueStore, settings: &Settings) -> Result<(), CoreError> {
    store.save(SETTINGS_KEY, settings).await
}

/// Last saved trend list; empty when nothing usable is stored.
pub async fn load_trends(store: &dyn KeyValueStore) -> Result<Vec<TrendItem>, CoreError> {
    match store.load::<Vec<TrendItem>>(TRENDS_KEY).await {
        Ok(trends) => Ok(trends.unwrap_or_default()),
        Err(CoreError::Database(DatabaseError::CorruptValue { reason, .. })) => {
            warn!("Stored trends are unreadable ({}), discarding", reason);
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

pub async fn save_trends(store: &dyn KeyValueStore, trends: &[TrendItem]) -> Result<(), CoreError> {
    store.save(TRENDS_KEY, &trends).await
}
