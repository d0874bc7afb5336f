//! UseCase: ユーザー接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectUserUseCase::execute() メソッド
//! - 接続の登録（後勝ち）と未配信メッセージの一括送信
//!
//! ### なぜこのテストが必要か
//! - 同じユーザーの再接続で古い接続が置き換えられることを保証する
//! - 接続時に溜まっていたメッセージが届くことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続、未配信メッセージありの接続
//! - エッジケース：同じユーザー ID での再接続

use std::sync::Arc;

use crate::{
    domain::MessageStore,
    infrastructure::connection::{ConnectionHandle, ConnectionRegistry},
};

use super::{
    error::FlushError,
    flush_backlog::{FlushBacklogUseCase, FlushReport},
};

/// ユーザー接続のユースケース
pub struct ConnectUserUseCase {
    registry: Arc<ConnectionRegistry>,
    flush: FlushBacklogUseCase,
}

impl ConnectUserUseCase {
    /// 新しい ConnectUserUseCase を作成
    pub fn new(registry: Arc<ConnectionRegistry>, store: Arc<dyn MessageStore>) -> Self {
        Self {
            registry,
            flush: FlushBacklogUseCase::new(store),
        }
    }

    /// 接続を登録し、未配信メッセージを送信する
    ///
    /// 呼び出し側は、これが返るまで受信ループを開始しないこと。
    ///
    /// # Returns
    ///
    /// * `Ok(FlushReport)` - 登録と一括送信の結果
    /// * `Err(FlushError)` - 一括送信に失敗（接続の登録は維持される）
    pub async fn execute(&self, handle: &ConnectionHandle) -> Result<FlushReport, FlushError> {
        if let Some(previous) = self.registry.register(handle.clone()) {
            tracing::info!(
                user_id = %handle.user_id(),
                previous_connection = %previous.id(),
                previous_since = %previous.connected_since(),
                "User reconnected, previous connection superseded"
            );
        }

        tracing::info!(
            user_id = %handle.user_id(),
            connection_id = %handle.id(),
            online = self.registry.count(),
            "User connected"
        );

        self.flush.execute(handle).await
    }
}
