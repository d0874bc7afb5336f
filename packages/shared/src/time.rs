use chrono::{DateTime, FixedOffset, Utc};

/// Get current Unix timestamp in JST (milliseconds)
pub fn get_jst_timestamp() -> i64 {
    let now_utc = Utc::now();
    match FixedOffset::east_opt(9 * 3600) {
        Some(jst_offset) => {
            let now_jst: DateTime<FixedOffset> = now_utc.with_timezone(&jst_offset);
            now_jst.timestamp_millis()
        }
        None => now_utc.timestamp_millis(),
    }
}

/// Convert a millisecond timestamp into an RFC 3339 string in JST
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    let utc = DateTime::<Utc>::from_timestamp_millis(timestamp_millis).unwrap_or_default();
    match FixedOffset::east_opt(9 * 3600) {
        Some(jst_offset) => utc.with_timezone(&jst_offset).to_rfc3339(),
        None => utc.to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_to_jst_rfc3339() {
        // テスト項目: ミリ秒タイムスタンプが JST の RFC 3339 文字列に変換される
        // given (前提条件): 1970-01-01T00:00:00Z
        let timestamp = 0;

        // when (操作):
        let result = timestamp_to_jst_rfc3339(timestamp);

        // then (期待する結果):
        assert_eq!(result, "1970-01-01T09:00:00+09:00");
    }
}
