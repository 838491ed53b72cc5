//! Rank Entry Repository
//!
//! Transactional maintenance of the position-ordered promoted-product
//! lists. Every mutation here keeps the per-list invariant: positions
//! form a contiguous 1..=N set with no duplicates, and a product appears
//! at most once per list.

use super::{RepoError, RepoResult};
use shared::models::{MoveDirection, RankList, RankedEntry};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, list, product_id, position";

/// Outcome of an add/move mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMutation {
    Applied,
    /// Already present (add) or already at the edge (move)
    NoOp,
}

/// All entries of one list, ordered by position
pub async fn find_by_list(pool: &SqlitePool, list: RankList) -> RepoResult<Vec<RankedEntry>> {
    let rows = sqlx::query_as::<_, RankedEntry>(&format!(
        "SELECT {COLUMNS} FROM rank_entry WHERE list = ? ORDER BY position"
    ))
    .bind(list)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Append a product at position N+1; no-op if already present
pub async fn add(pool: &SqlitePool, list: RankList, product_id: i64) -> RepoResult<RankMutation> {
    let mut tx = pool.begin().await?;

    let existing: Option<i64> =
        sqlx::query_scalar("SELECT id FROM rank_entry WHERE list = ? AND product_id = ?")
            .bind(list)
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?;
    if existing.is_some() {
        return Ok(RankMutation::NoOp);
    }

    let max_position: Option<i64> =
        sqlx::query_scalar("SELECT MAX(position) FROM rank_entry WHERE list = ?")
            .bind(list)
            .fetch_one(&mut *tx)
            .await?;

    sqlx::query("INSERT INTO rank_entry (list, product_id, position) VALUES (?1, ?2, ?3)")
        .bind(list)
        .bind(product_id)
        .bind(max_position.unwrap_or(0) + 1)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(RankMutation::Applied)
}

/// Delete an entry and close the gap: every entry with a higher position
/// shifts down by one, restoring a contiguous 1..=N sequence.
pub async fn remove(pool: &SqlitePool, list: RankList, product_id: i64) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    let removed_position: Option<i64> =
        sqlx::query_scalar("SELECT position FROM rank_entry WHERE list = ? AND product_id = ?")
            .bind(list)
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?;
    let removed_position = removed_position.ok_or_else(|| {
        RepoError::NotFound(format!(
            "Product {product_id} not in {} list",
            list.as_str()
        ))
    })?;

    sqlx::query("DELETE FROM rank_entry WHERE list = ? AND product_id = ?")
        .bind(list)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE rank_entry SET position = position - 1 WHERE list = ? AND position > ?")
        .bind(list)
        .bind(removed_position)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Swap an entry with its strict neighbor in the given direction.
///
/// The neighbor is the entry with the next lower/higher position, which
/// is not necessarily adjacent by one if the invariant was ever relaxed.
/// Both updates are guarded by the expected old positions so a raced
/// write surfaces as `Conflict` instead of corrupting the ordering.
pub async fn move_entry(
    pool: &SqlitePool,
    list: RankList,
    product_id: i64,
    direction: MoveDirection,
) -> RepoResult<RankMutation> {
    let mut tx = pool.begin().await?;

    let current: Option<i64> =
        sqlx::query_scalar("SELECT position FROM rank_entry WHERE list = ? AND product_id = ?")
            .bind(list)
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?;
    let current = current.ok_or_else(|| {
        RepoError::NotFound(format!(
            "Product {product_id} not in {} list",
            list.as_str()
        ))
    })?;

    // Strict neighbor by position, not by index
    let neighbor: Option<(i64, i64)> = match direction {
        MoveDirection::Up => sqlx::query_as(
            "SELECT product_id, position FROM rank_entry \
             WHERE list = ? AND position < ? ORDER BY position DESC LIMIT 1",
        ),
        MoveDirection::Down => sqlx::query_as(
            "SELECT product_id, position FROM rank_entry \
             WHERE list = ? AND position > ? ORDER BY position ASC LIMIT 1",
        ),
    }
    .bind(list)
    .bind(current)
    .fetch_optional(&mut *tx)
    .await?;

    let Some((neighbor_product, neighbor_position)) = neighbor else {
        // Already at the edge
        return Ok(RankMutation::NoOp);
    };

    let moved = sqlx::query(
        "UPDATE rank_entry SET position = ?1 WHERE list = ?2 AND product_id = ?3 AND position = ?4",
    )
    .bind(neighbor_position)
    .bind(list)
    .bind(product_id)
    .bind(current)
    .execute(&mut *tx)
    .await?;

    let swapped = sqlx::query(
        "UPDATE rank_entry SET position = ?1 WHERE list = ?2 AND product_id = ?3 AND position = ?4",
    )
    .bind(current)
    .bind(list)
    .bind(neighbor_product)
    .bind(neighbor_position)
    .execute(&mut *tx)
    .await?;

    if moved.rows_affected() != 1 || swapped.rows_affected() != 1 {
        // A concurrent mutation changed a position between read and write
        return Err(RepoError::Conflict(format!(
            "Rank swap lost a race on {} list",
            list.as_str()
        )));
    }

    tx.commit().await?;
    Ok(RankMutation::Applied)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    pub(crate) async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE rank_entry (
                id INTEGER PRIMARY KEY,
                list TEXT NOT NULL,
                product_id INTEGER NOT NULL,
                position INTEGER NOT NULL,
                UNIQUE (list, product_id)
            )",
        )
        .execute(&pool)
        .await
        .unwrap();
        pool
    }

    fn positions(entries: &[RankedEntry]) -> Vec<(i64, i64)> {
        entries.iter().map(|e| (e.product_id, e.position)).collect()
    }

    /// Positions must always be a contiguous duplicate-free 1..=N set
    pub(crate) fn assert_contiguous(entries: &[RankedEntry]) {
        let mut seen: Vec<i64> = entries.iter().map(|e| e.position).collect();
        seen.sort_unstable();
        let expected: Vec<i64> = (1..=entries.len() as i64).collect();
        assert_eq!(seen, expected, "positions not contiguous: {seen:?}");
    }

    #[tokio::test]
    async fn add_appends_and_is_idempotent() {
        let pool = test_pool().await;
        assert_eq!(
            add(&pool, RankList::Featured, 10).await.unwrap(),
            RankMutation::Applied
        );
        assert_eq!(
            add(&pool, RankList::Featured, 20).await.unwrap(),
            RankMutation::Applied
        );
        assert_eq!(
            add(&pool, RankList::Featured, 10).await.unwrap(),
            RankMutation::NoOp
        );

        let entries = find_by_list(&pool, RankList::Featured).await.unwrap();
        assert_eq!(positions(&entries), vec![(10, 1), (20, 2)]);
    }

    #[tokio::test]
    async fn lists_are_independent() {
        let pool = test_pool().await;
        add(&pool, RankList::Featured, 10).await.unwrap();
        add(&pool, RankList::Hero, 10).await.unwrap();
        add(&pool, RankList::Hero, 20).await.unwrap();

        let featured = find_by_list(&pool, RankList::Featured).await.unwrap();
        let hero = find_by_list(&pool, RankList::Hero).await.unwrap();
        assert_eq!(featured.len(), 1);
        assert_eq!(positions(&hero), vec![(10, 1), (20, 2)]);
    }

    #[tokio::test]
    async fn remove_closes_the_gap() {
        let pool = test_pool().await;
        for product in [10, 20, 30] {
            add(&pool, RankList::Featured, product).await.unwrap();
        }

        remove(&pool, RankList::Featured, 20).await.unwrap();

        let entries = find_by_list(&pool, RankList::Featured).await.unwrap();
        assert_eq!(positions(&entries), vec![(10, 1), (30, 2)]);
        assert_contiguous(&entries);
    }

    #[tokio::test]
    async fn remove_missing_entry_is_not_found() {
        let pool = test_pool().await;
        let err = remove(&pool, RankList::Featured, 99).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn move_up_swaps_with_the_neighbor_only() {
        let pool = test_pool().await;
        for product in [10, 20, 30] {
            add(&pool, RankList::Featured, product).await.unwrap();
        }

        // [10@1, 20@2, 30@3] -> move 20 up -> [20@1, 10@2, 30@3]
        assert_eq!(
            move_entry(&pool, RankList::Featured, 20, MoveDirection::Up)
                .await
                .unwrap(),
            RankMutation::Applied
        );

        let entries = find_by_list(&pool, RankList::Featured).await.unwrap();
        assert_eq!(positions(&entries), vec![(20, 1), (10, 2), (30, 3)]);
        assert_contiguous(&entries);
    }

    #[tokio::test]
    async fn move_at_edge_is_noop() {
        let pool = test_pool().await;
        add(&pool, RankList::Featured, 10).await.unwrap();
        add(&pool, RankList::Featured, 20).await.unwrap();

        assert_eq!(
            move_entry(&pool, RankList::Featured, 10, MoveDirection::Up)
                .await
                .unwrap(),
            RankMutation::NoOp
        );
        assert_eq!(
            move_entry(&pool, RankList::Featured, 20, MoveDirection::Down)
                .await
                .unwrap(),
            RankMutation::NoOp
        );

        let entries = find_by_list(&pool, RankList::Featured).await.unwrap();
        assert_eq!(positions(&entries), vec![(10, 1), (20, 2)]);
    }

    #[tokio::test]
    async fn move_missing_entry_is_not_found() {
        let pool = test_pool().await;
        let err = move_entry(&pool, RankList::Featured, 99, MoveDirection::Down)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn arbitrary_sequences_keep_positions_contiguous() {
        let pool = test_pool().await;
        for product in [1, 2, 3, 4, 5] {
            add(&pool, RankList::Hero, product).await.unwrap();
        }
        remove(&pool, RankList::Hero, 3).await.unwrap();
        move_entry(&pool, RankList::Hero, 5, MoveDirection::Up)
            .await
            .unwrap();
        move_entry(&pool, RankList::Hero, 1, MoveDirection::Down)
            .await
            .unwrap();
        remove(&pool, RankList::Hero, 4).await.unwrap();
        add(&pool, RankList::Hero, 6).await.unwrap();

        let entries = find_by_list(&pool, RankList::Hero).await.unwrap();
        assert_eq!(entries.len(), 4);
        assert_contiguous(&entries);
    }
}
