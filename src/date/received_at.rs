use chrono::{NaiveDate, NaiveDateTime};

/// received_at を解決する
///
/// extraction_queue から取得した email_received_at を使用。
/// None の場合は抽出を中断（相対日付の解釈が不可能）
pub fn resolve_received_at(
    email_received_at: Option<NaiveDateTime>,
) -> Result<NaiveDate, ReceivedAtError> {
    email_received_at
        .map(|dt| dt.date())
        .ok_or(ReceivedAtError::MissingReceivedAt)
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ReceivedAtError {
    #[error("email_received_at is missing - cannot interpret relative dates")]
    MissingReceivedAt,
}
