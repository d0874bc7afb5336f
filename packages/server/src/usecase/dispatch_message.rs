//! UseCase: メッセージ配送判定
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DispatchMessageUseCase::execute() メソッド
//! - 受信者がオンラインなら即時配信、オフラインならストアへ保存する判定
//!
//! ### なぜこのテストが必要か
//! - WebSocket 受信ループと POST /send の両方がこの判定に集約される
//! - 送信失敗時に接続を登録解除し、メッセージを失わずに保存する必要がある
//!
//! ### どのような状況を想定しているか
//! - 正常系：オンライン配信、オフライン保存
//! - 異常系：送信失敗（切断済み接続）、ストア保存失敗

use std::sync::Arc;

use crate::{
    domain::{Message, MessageId, MessageStore},
    infrastructure::{connection::ConnectionRegistry, dto::websocket::encode_frame},
};

use super::error::DispatchError;

/// Result of routing one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Written to the receiver's live connection
    Delivered,
    /// Appended to the store for the next connect
    Persisted(MessageId),
}

/// メッセージ配送判定のユースケース
pub struct DispatchMessageUseCase {
    registry: Arc<ConnectionRegistry>,
    /// Repository（データアクセス層の抽象化）
    store: Arc<dyn MessageStore>,
}

impl DispatchMessageUseCase {
    /// 新しい DispatchMessageUseCase を作成
    pub fn new(registry: Arc<ConnectionRegistry>, store: Arc<dyn MessageStore>) -> Self {
        Self { registry, store }
    }

    /// メッセージを配送する
    ///
    /// # Returns
    ///
    /// * `Ok(DispatchOutcome::Delivered)` - 受信者の接続へ書き込み済み
    /// * `Ok(DispatchOutcome::Persisted(id))` - ストアに未配信として保存済み
    /// * `Err(DispatchError)` - 保存にも失敗し、メッセージは破棄された
    pub async fn execute(&self, message: Message) -> Result<DispatchOutcome, DispatchError> {
        if let Some(handle) = self.registry.lookup(message.receiver()) {
            let frame = encode_frame(&message).map_err(|source| DispatchError::Encode {
                receiver: message.receiver().clone(),
                source,
            })?;

            match handle.send(frame).await {
                Ok(()) => {
                    tracing::info!(
                        sender = %message.sender(),
                        receiver = %message.receiver(),
                        "Delivered to online receiver"
                    );
                    return Ok(DispatchOutcome::Delivered);
                }
                Err(e) => {
                    // a dead connection: stop routing to it, then fall back to the store
                    tracing::warn!(
                        receiver = %message.receiver(),
                        connection_id = %handle.id(),
                        error = %e,
                        "Send to online receiver failed, treating as offline"
                    );
                    self.registry.unregister_handle(&handle);
                }
            }
        }

        self.persist(message).await
    }

    async fn persist(&self, message: Message) -> Result<DispatchOutcome, DispatchError> {
        let id = self
            .store
            .append(message.sender(), message.receiver(), message.text())
            .await
            .map_err(|source| DispatchError::Store {
                sender: message.sender().clone(),
                receiver: message.receiver().clone(),
                source,
            })?;

        tracing::info!(
            sender = %message.sender(),
            receiver = %message.receiver(),
            message_id = %id,
            "Receiver offline, saved to store"
        );
        Ok(DispatchOutcome::Persisted(id))
    }
}
