use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

/// user id -> current vacation balance. The eligibility endpoints read the
/// balance on every keystroke-driven validate call; this keeps those reads
/// off the database. Approvals are the only writer and invalidate explicitly.
pub static BALANCE_CACHE: Lazy<Cache<u64, i32>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000)
        .time_to_live(Duration::from_secs(3600)) // 1h TTL as a safety net
        .build()
});

/// Read-through fetch of a user's vacation balance.
/// `Ok(None)` means the user does not exist or is inactive.
pub async fn get_balance(pool: &MySqlPool, user_id: u64) -> Result<Option<i32>, sqlx::Error> {
    if let Some(balance) = BALANCE_CACHE.get(&user_id).await {
        return Ok(Some(balance));
    }

    let balance = sqlx::query_scalar::<_, i32>(
        "SELECT vacation_balance FROM users WHERE id = ? AND active = 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    if let Some(balance) = balance {
        BALANCE_CACHE.insert(user_id, balance).await;
    }

    Ok(balance)
}

/// Drop a user's cached balance after it has been debited.
pub async fn invalidate(user_id: u64) {
    BALANCE_CACHE.invalidate(&user_id).await;
}

async fn batch_insert(entries: &[(u64, i32)]) {
    let futures: Vec<_> = entries
        .iter()
        .map(|(id, balance)| BALANCE_CACHE.insert(*id, *balance))
        .collect();

    futures::future::join_all(futures).await;
}

/// Load active users' balances into the cache (batched streaming).
pub async fn warmup_balance_cache(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (u64, i32)>(
        "SELECT id, vacation_balance FROM users WHERE active = 1",
    )
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        batch.push(row?);
        total += 1;

        if batch.len() >= batch_size {
            batch_insert(&batch).await;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        batch_insert(&batch).await;
    }

    log::info!("Balance cache warmup complete: {} active users", total);
    Ok(())
}
