/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// UTC day window `[start, end)` in milliseconds for the day containing `ts`
pub fn utc_day_bounds(ts: i64) -> (i64, i64) {
    const DAY_MS: i64 = 86_400_000;
    let start = ts.div_euclid(DAY_MS) * DAY_MS;
    (start, start + DAY_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_id_monotonic_scale() {
        let a = snowflake_id();
        let b = snowflake_id();
        assert!(a > 0);
        assert!(b > 0);
        // 53-bit bound
        assert!(a < (1_i64 << 53));
    }

    #[test]
    fn test_utc_day_bounds() {
        let ts = 1_700_000_123_456;
        let (start, end) = utc_day_bounds(ts);
        assert!(start <= ts && ts < end);
        assert_eq!(end - start, 86_400_000);
        assert_eq!(start % 86_400_000, 0);
    }
}
