//! Load-factor policy: when the table grows, when it shrinks, and to what.
//!
//! All thresholds are compile-time constants; the policy is part of the
//! table's design and is not configurable at runtime.

/// Bucket count of a freshly constructed table.
pub const INITIAL_BUCKET_COUNT: usize = 1;

/// The bucket array is never resized below this.
pub const MIN_BUCKET_COUNT: usize = 1;

/// Insert grows the table when the pre-insert load factor reaches this.
pub const MAX_LOAD_FACTOR: f64 = 2.0;

/// Delete shrinks the table when the pre-delete load factor is at or below
/// `MAX_LOAD_FACTOR * SHRINK_LOAD_RATIO`.
pub const SHRINK_LOAD_RATIO: f64 = 0.25;

/// Multiplier applied on grow; shrink divides by the same factor.
pub const GROWTH_FACTOR: usize = 2;

/// Average chain length for `count` entries over `bucket_count` buckets.
pub fn load_factor(count: usize, bucket_count: usize) -> f64 {
    count as f64 / bucket_count.max(MIN_BUCKET_COUNT) as f64
}

/// New bucket count if an insert at this occupancy must grow first.
pub(crate) fn grow_target(count: usize, bucket_count: usize) -> Option<usize> {
    (load_factor(count, bucket_count) >= MAX_LOAD_FACTOR)
        .then(|| bucket_count.saturating_mul(GROWTH_FACTOR))
}

/// New bucket count if a delete at this occupancy must shrink first.
///
/// Returns `None` when the table is already at `MIN_BUCKET_COUNT`; a
/// shrink there would be a no-op.
pub(crate) fn shrink_target(count: usize, bucket_count: usize) -> Option<usize> {
    if load_factor(count, bucket_count) > MAX_LOAD_FACTOR * SHRINK_LOAD_RATIO {
        return None;
    }
    let target = (bucket_count / GROWTH_FACTOR).max(MIN_BUCKET_COUNT);
    if target == bucket_count {
        tracing::trace!(bucket_count, count, "shrink skipped at minimum bucket count");
        return None;
    }
    Some(target)
}
