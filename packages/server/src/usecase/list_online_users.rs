//! UseCase: オンラインユーザー一覧

use std::sync::Arc;

use crate::{domain::UserId, infrastructure::connection::ConnectionRegistry};

/// オンラインユーザー一覧のユースケース
pub struct ListOnlineUsersUseCase {
    registry: Arc<ConnectionRegistry>,
}

impl ListOnlineUsersUseCase {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 現在接続中のユーザー ID（ソート済みのスナップショット）
    pub fn execute(&self) -> Vec<UserId> {
        self.registry.list_online()
    }
}
