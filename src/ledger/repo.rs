use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{
    day::Day,
    model::{DailyBucket, UserLedger, WeightSample},
};
use crate::{
    config::LedgerConfig,
    error::{LedgerError, LedgerResult},
};

/// Persistence boundary for user ledgers: one document per user.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    fn config(&self) -> &LedgerConfig;

    /// Loads the ledger, or `NotFound` if the user has none yet.
    async fn load(&self, user_id: Uuid) -> LedgerResult<UserLedger>;

    /// Raw write. Inserts when `version == 0`, otherwise compare-and-swaps on
    /// `version`; either failure is a `Conflict`. Bumps `version` on success.
    async fn write(&self, ledger: &mut UserLedger) -> LedgerResult<()>;

    /// Drops the whole ledger. Returns whether one existed.
    async fn delete(&self, user_id: Uuid) -> LedgerResult<bool>;

    /// Recomputes derived fields, checks invariants, then writes.
    async fn save(&self, ledger: &mut UserLedger) -> LedgerResult<()> {
        ledger.normalize(self.config().weight_loss_goal_kg);
        ledger.validate()?;
        self.write(ledger).await
    }

    async fn load_or_new(&self, user_id: Uuid) -> LedgerResult<UserLedger> {
        match self.load(user_id).await {
            Err(LedgerError::NotFound(_)) => {
                debug!(%user_id, "starting new ledger");
                Ok(UserLedger::new(user_id, self.config().default_calorie_goal))
            }
            other => other,
        }
    }

    /// Like `load`, but reports absence with `missing` as the message.
    async fn load_existing(&self, user_id: Uuid, missing: &str) -> LedgerResult<UserLedger> {
        self.load(user_id).await.map_err(|e| match e {
            LedgerError::NotFound(_) => LedgerError::not_found(missing),
            other => other,
        })
    }

    async fn find_bucket(&self, user_id: Uuid, date: Day) -> LedgerResult<Option<DailyBucket>> {
        Ok(self.load(user_id).await?.bucket(date).cloned())
    }

    async fn find_weight_sample(&self, user_id: Uuid, date: Day) -> LedgerResult<Option<WeightSample>> {
        Ok(self.load(user_id).await?.weight_history.sample(date).cloned())
    }
}

pub struct PgLedgerStore {
    db: PgPool,
    config: LedgerConfig,
}

impl PgLedgerStore {
    pub fn new(db: PgPool, config: LedgerConfig) -> Self {
        Self { db, config }
    }

    async fn ensure_exists(&self, user_id: Uuid) -> LedgerResult<()> {
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS (SELECT 1 FROM ledgers WHERE user_id = $1)"#,
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;
        if !exists {
            return Err(LedgerError::not_found("Ledger not found"));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    fn config(&self) -> &LedgerConfig {
        &self.config
    }

    async fn load(&self, user_id: Uuid) -> LedgerResult<UserLedger> {
        let row = sqlx::query_as::<_, (Json<UserLedger>, i64)>(
            r#"
            SELECT doc, version
            FROM ledgers
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        let (Json(mut ledger), version) =
            row.ok_or_else(|| LedgerError::not_found("Ledger not found"))?;
        if ledger.user_id != user_id {
            warn!(%user_id, doc_user = %ledger.user_id, "ledger document owner mismatch");
            ledger.user_id = user_id;
        }
        ledger.version = version;
        Ok(ledger)
    }

    async fn write(&self, ledger: &mut UserLedger) -> LedgerResult<()> {
        let doc = serde_json::to_value(&*ledger)?;

        let affected = if ledger.version == 0 {
            sqlx::query(
                r#"
                INSERT INTO ledgers (user_id, doc, version)
                VALUES ($1, $2, 1)
                ON CONFLICT (user_id) DO NOTHING
                "#,
            )
            .bind(ledger.user_id)
            .bind(&doc)
            .execute(&self.db)
            .await?
            .rows_affected()
        } else {
            sqlx::query(
                r#"
                UPDATE ledgers
                   SET doc = $2, version = version + 1, updated_at = now()
                 WHERE user_id = $1 AND version = $3
                "#,
            )
            .bind(ledger.user_id)
            .bind(&doc)
            .bind(ledger.version)
            .execute(&self.db)
            .await?
            .rows_affected()
        };

        if affected == 0 {
            warn!(user_id = %ledger.user_id, version = ledger.version, "ledger write conflict");
            return Err(if ledger.version == 0 {
                LedgerError::Conflict("Ledger already exists for this user".into())
            } else {
                LedgerError::Conflict("Ledger was modified by another request".into())
            });
        }

        ledger.version += 1;
        debug!(user_id = %ledger.user_id, version = ledger.version, "ledger saved");
        Ok(())
    }

    async fn delete(&self, user_id: Uuid) -> LedgerResult<bool> {
        let res = sqlx::query(r#"DELETE FROM ledgers WHERE user_id = $1"#)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn find_bucket(&self, user_id: Uuid, date: Day) -> LedgerResult<Option<DailyBucket>> {
        let bucket = sqlx::query_scalar::<_, Json<DailyBucket>>(
            r#"
            SELECT elem
              FROM ledgers l,
                   jsonb_array_elements(l.doc -> 'dailyTotals') AS elem
             WHERE l.user_id = $1 AND elem ->> 'date' = $2
             LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(date.to_string())
        .fetch_optional(&self.db)
        .await?;

        match bucket {
            Some(Json(b)) => Ok(Some(b)),
            None => self.ensure_exists(user_id).await.map(|_| None),
        }
    }

    async fn find_weight_sample(&self, user_id: Uuid, date: Day) -> LedgerResult<Option<WeightSample>> {
        let sample = sqlx::query_scalar::<_, Json<WeightSample>>(
            r#"
            SELECT elem
              FROM ledgers l,
                   jsonb_array_elements(l.doc -> 'weightHistory' -> 'samples') AS elem
             WHERE l.user_id = $1 AND elem ->> 'date' = $2
             LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(date.to_string())
        .fetch_optional(&self.db)
        .await?;

        match sample {
            Some(Json(s)) => Ok(Some(s)),
            None => self.ensure_exists(user_id).await.map(|_| None),
        }
    }
}
