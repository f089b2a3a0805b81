use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{model::UserLedger, repo::LedgerStore};
use crate::{
    config::LedgerConfig,
    error::{LedgerError, LedgerResult},
};

/// Process-local store with the same versioning rules as the Postgres one.
/// Documents go through serde on every write so schema defaults apply.
pub struct MemoryLedgerStore {
    docs: RwLock<HashMap<Uuid, (serde_json::Value, i64)>>,
    config: LedgerConfig,
}

impl MemoryLedgerStore {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
            config,
        }
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    fn config(&self) -> &LedgerConfig {
        &self.config
    }

    async fn load(&self, user_id: Uuid) -> LedgerResult<UserLedger> {
        let docs = self.docs.read().await;
        let (doc, version) = docs
            .get(&user_id)
            .ok_or_else(|| LedgerError::not_found("Ledger not found"))?;
        let mut ledger: UserLedger = serde_json::from_value(doc.clone())?;
        ledger.version = *version;
        Ok(ledger)
    }

    async fn write(&self, ledger: &mut UserLedger) -> LedgerResult<()> {
        let doc = serde_json::to_value(&*ledger)?;
        let mut docs = self.docs.write().await;
        let stored = docs.get(&ledger.user_id).map(|(_, v)| *v);
        match (stored, ledger.version) {
            (Some(_), 0) => {
                return Err(LedgerError::Conflict("Ledger already exists for this user".into()))
            }
            (Some(current), expected) if current != expected => {
                return Err(LedgerError::Conflict("Ledger was modified by another request".into()))
            }
            (None, v) if v != 0 => {
                return Err(LedgerError::Conflict("Ledger was modified by another request".into()))
            }
            _ => {}
        }
        ledger.version += 1;
        docs.insert(ledger.user_id, (doc, ledger.version));
        Ok(())
    }

    async fn delete(&self, user_id: Uuid) -> LedgerResult<bool> {
        Ok(self.docs.write().await.remove(&user_id).is_some())
    }
}
