/// Read-through caching over a [`Cache`](crate::db::Cache).
///
/// Returns the cached value when present. On a miss, or when Redis cannot
/// be reached, evaluates `$block`, queues the result for writing and returns
/// it. Errors from `$block` propagate with `?`.
///
/// # Example
/// ```rust,ignore
/// let details: MovieDetails = cached!(cache, CacheKey::MovieDetails(id), TTL, async move {
///     fetch_from_provider(id).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        match $cache.get_from_cache(&$key).await {
            Ok(Some(cached)) => Ok(cached),
            lookup => {
                if let Err(e) = lookup {
                    tracing::warn!(error = %e, key = %$key, "Cache read failed, fetching fresh value");
                }
                let value = $block.await?;
                $cache.set_in_background(&$key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
