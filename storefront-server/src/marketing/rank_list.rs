//! Rank List Manager
//!
//! Serializes mutations of one promoted-product list behind an
//! in-process mutex, so concurrent admin edits cannot interleave their
//! read-then-write transactions. Different lists never contend with
//! each other. A `Conflict` from the repository (raced position guard)
//! is retried once under the lock; a second conflict is surfaced.

use std::sync::Arc;

use dashmap::DashMap;
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::db::repository::rank_entry::{self, RankMutation};
use crate::db::repository::{RepoError, RepoResult};
use shared::models::{MoveDirection, RankList, RankedEntry};

/// One mutex per list; lazily created on first mutation.
#[derive(Debug, Default)]
pub struct RankLocks {
    locks: DashMap<RankList, Arc<Mutex<()>>>,
}

impl RankLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, list: RankList) -> Arc<Mutex<()>> {
        self.locks
            .entry(list)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Reads do not take the lock; SQLite snapshot isolation is enough for
/// a consistent ordered view.
pub async fn list(pool: &SqlitePool, list: RankList) -> RepoResult<Vec<RankedEntry>> {
    rank_entry::find_by_list(pool, list).await
}

pub async fn add(
    pool: &SqlitePool,
    locks: &RankLocks,
    list: RankList,
    product_id: i64,
) -> RepoResult<RankMutation> {
    let lock = locks.lock_for(list);
    let _guard = lock.lock().await;
    rank_entry::add(pool, list, product_id).await
}

pub async fn remove(
    pool: &SqlitePool,
    locks: &RankLocks,
    list: RankList,
    product_id: i64,
) -> RepoResult<()> {
    let lock = locks.lock_for(list);
    let _guard = lock.lock().await;
    rank_entry::remove(pool, list, product_id).await
}

pub async fn move_entry(
    pool: &SqlitePool,
    locks: &RankLocks,
    list: RankList,
    product_id: i64,
    direction: MoveDirection,
) -> RepoResult<RankMutation> {
    let lock = locks.lock_for(list);
    let _guard = lock.lock().await;

    match rank_entry::move_entry(pool, list, product_id, direction).await {
        Err(RepoError::Conflict(_)) => {
            tracing::warn!(
                list = list.as_str(),
                product_id,
                "rank swap raced an external writer, retrying once"
            );
            rank_entry::move_entry(pool, list, product_id, direction).await
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::rank_entry::tests::{assert_contiguous, test_pool};

    #[tokio::test]
    async fn locks_are_created_per_list_and_reused() {
        let locks = RankLocks::new();
        let a = locks.lock_for(RankList::Featured);
        let b = locks.lock_for(RankList::Featured);
        let c = locks.lock_for(RankList::Hero);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[tokio::test]
    async fn concurrent_mutations_keep_positions_contiguous() {
        let pool = test_pool().await;
        let locks = Arc::new(RankLocks::new());
        for product_id in 1..=6 {
            add(&pool, &locks, RankList::Featured, product_id)
                .await
                .unwrap();
        }

        let mut tasks = tokio::task::JoinSet::new();
        for product_id in 1..=6 {
            let pool = pool.clone();
            let locks = locks.clone();
            tasks.spawn(async move {
                if product_id % 2 == 0 {
                    remove(&pool, &locks, RankList::Featured, product_id)
                        .await
                        .unwrap();
                } else {
                    move_entry(
                        &pool,
                        &locks,
                        RankList::Featured,
                        product_id,
                        MoveDirection::Up,
                    )
                    .await
                    .unwrap();
                }
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap();
        }

        let entries = list(&pool, RankList::Featured).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_contiguous(&entries);
    }

    #[tokio::test]
    async fn mutations_on_different_lists_do_not_interfere() {
        let pool = test_pool().await;
        let locks = RankLocks::new();
        add(&pool, &locks, RankList::Featured, 1).await.unwrap();
        add(&pool, &locks, RankList::Hero, 1).await.unwrap();
        remove(&pool, &locks, RankList::Featured, 1).await.unwrap();

        assert!(list(&pool, RankList::Featured).await.unwrap().is_empty());
        assert_eq!(list(&pool, RankList::Hero).await.unwrap().len(), 1);
    }
}
