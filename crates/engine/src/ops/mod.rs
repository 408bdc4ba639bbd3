use sea_orm::{DatabaseConnection, DatabaseTransaction};
use tokio::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::{
    ResultEngine, Sweep, distribute,
    repository::{Record, Repository},
};

mod access;
mod donations;
mod projects;
mod report;
mod users;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

/// Like `with_tx!`, holding the engine write lock for the whole transaction.
///
/// Sweeps read the open backlog and write it back, so two of them must never
/// run on the same snapshot.
macro_rules! with_write_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let _write_guard = $self.write_lock.lock().await;
        $crate::ops::with_tx!($self, |$tx| $body)
    }};
}

pub(crate) use with_tx;
pub(crate) use with_write_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    write_lock: Mutex<()>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Sweep the open `B` backlog with `incoming` and persist what changed.
async fn run_sweep<B, I>(
    db: &DatabaseTransaction,
    incoming: &mut I,
    now: DateTime<Utc>,
) -> ResultEngine<Sweep>
where
    B: Record,
    I: Record,
{
    let backlog_repo = Repository::<B>::new(db);
    let mut backlog = backlog_repo.list_open().await?;
    let sweep = distribute(&mut backlog, incoming, now)?;

    for &index in &sweep.touched {
        backlog_repo.persist(&backlog[index]).await?;
    }
    Repository::<I>::new(db).persist(incoming).await?;

    tracing::debug!(
        incoming = %incoming.id(),
        backlog = backlog.len(),
        touched = sweep.touched.len(),
        moved = sweep.moved,
        fulfilled = incoming.is_fulfilled(),
        "allocation sweep completed"
    );
    Ok(sweep)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            write_lock: Mutex::new(()),
        })
    }
}
