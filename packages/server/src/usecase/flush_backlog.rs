//! UseCase: 未配信メッセージの一括送信（Backlog Flush）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - FlushBacklogUseCase::execute() メソッド
//! - 接続直後に未配信メッセージをストア順に送信し、成功分だけ配信済みにする処理
//!
//! ### なぜこのテストが必要か
//! - 送信に失敗したメッセージが配信済みにされると永久に失われる
//! - 2 回連続で実行しても重複配信しないこと（冪等性）を保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：全件送信成功
//! - 異常系：一部送信失敗、ストア参照失敗、配信済み更新失敗
//! - エッジケース：未配信なし（更新処理を呼ばない）

use std::sync::Arc;

use crate::{
    domain::{MessageId, MessageStore},
    infrastructure::{connection::ConnectionHandle, dto::websocket::encode_frame},
};

use super::error::FlushError;

/// Outcome of one backlog flush
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Undelivered messages found in the store
    pub attempted: usize,
    /// Messages sent and marked delivered, in send order
    pub delivered: Vec<MessageId>,
}

/// 未配信メッセージ一括送信のユースケース
pub struct FlushBacklogUseCase {
    /// Repository（データアクセス層の抽象化）
    store: Arc<dyn MessageStore>,
}

impl FlushBacklogUseCase {
    /// 新しい FlushBacklogUseCase を作成
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// 未配信メッセージを接続へ送信する
    ///
    /// 送信に成功したメッセージの ID だけをまとめて 1 回で配信済みに更新する。
    /// 失敗したメッセージは未配信のまま残り、次回接続時に再送される。
    ///
    /// # Arguments
    ///
    /// * `handle` - 接続したばかりのユーザーの接続ハンドル
    pub async fn execute(&self, handle: &ConnectionHandle) -> Result<FlushReport, FlushError> {
        let user_id = handle.user_id();
        let pending = self
            .store
            .query_undelivered(user_id)
            .await
            .map_err(FlushError::Query)?;

        let mut report = FlushReport {
            attempted: pending.len(),
            delivered: Vec::with_capacity(pending.len()),
        };

        for message in &pending {
            let Some(id) = message.id() else {
                continue;
            };

            let frame = match encode_frame(message) {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!(%user_id, message_id = %id, error = %e, "Skipping unencodable backlog message");
                    continue;
                }
            };

            match handle.send(frame).await {
                Ok(()) => report.delivered.push(id),
                Err(e) => {
                    tracing::warn!(%user_id, message_id = %id, error = %e, "Backlog send failed, kept for next connect");
                }
            }
        }

        if !report.delivered.is_empty() {
            self.store
                .mark_delivered(&report.delivered)
                .await
                .map_err(|source| FlushError::MarkDelivered {
                    sent: report.delivered.len(),
                    source,
                })?;
        }

        tracing::info!(
            %user_id,
            attempted = report.attempted,
            delivered = report.delivered.len(),
            "Backlog flushed"
        );
        Ok(report)
    }
}
