//! UseCase: ユーザー切断処理

use std::sync::Arc;

use crate::infrastructure::connection::{ConnectionHandle, ConnectionRegistry};

/// ユーザー切断のユースケース
pub struct DisconnectUserUseCase {
    registry: Arc<ConnectionRegistry>,
}

impl DisconnectUserUseCase {
    /// 新しい DisconnectUserUseCase を作成
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 接続の登録を解除する
    ///
    /// 既に同じユーザーの新しい接続に置き換わっていれば何もしない。
    ///
    /// # Returns
    ///
    /// 登録を解除した場合 true
    pub fn execute(&self, handle: &ConnectionHandle) -> bool {
        let removed = self.registry.unregister_handle(handle);
        if removed {
            tracing::info!(
                user_id = %handle.user_id(),
                connection_id = %handle.id(),
                connected_since = %handle.connected_since(),
                "User disconnected"
            );
        } else {
            tracing::debug!(
                user_id = %handle.user_id(),
                connection_id = %handle.id(),
                "Superseded connection closed"
            );
        }
        removed
    }
}
