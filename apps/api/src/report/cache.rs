//! Latest-report URL cache. Redis is an optimisation here: every failure is
//! logged and treated as a miss.

use redis::Client as RedisClient;
use tracing::warn;
use uuid::Uuid;

pub fn cache_key(user_id: Uuid) -> String {
    format!("career_report:latest:{user_id}")
}

pub async fn get_latest_url(redis: &RedisClient, user_id: Uuid) -> Option<String> {
    let mut conn = match redis.get_multiplexed_async_connection().await {
        Ok(conn) => conn,
        Err(e) => {
            warn!("Redis unavailable, skipping report cache lookup: {e}");
            return None;
        }
    };
    match redis::cmd("GET")
        .arg(cache_key(user_id))
        .query_async::<_, Option<String>>(&mut conn)
        .await
    {
        Ok(url) => url,
        Err(e) => {
            warn!("Report cache lookup failed for {user_id}: {e}");
            None
        }
    }
}

pub async fn set_latest_url(redis: &RedisClient, user_id: Uuid, url: &str, ttl_secs: u64) {
    if ttl_secs == 0 {
        return;
    }
    let mut conn = match redis.get_multiplexed_async_connection().await {
        Ok(conn) => conn,
        Err(e) => {
            warn!("Redis unavailable, not caching report URL: {e}");
            return;
        }
    };
    if let Err(e) = redis::cmd("SET")
        .arg(cache_key(user_id))
        .arg(url)
        .arg("EX")
        .arg(ttl_secs)
        .query_async::<_, ()>(&mut conn)
        .await
    {
        warn!("Failed to cache report URL for {user_id}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_per_user() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_ne!(cache_key(a), cache_key(b));
        assert!(cache_key(a).ends_with(&a.to_string()));
    }
}
