//! Live connection registry.
//!
//! Maps each online user to the handle of their current connection. Backed by
//! a sharded concurrent map so connects, disconnects and lookups from many
//! tasks do not contend on one lock.

use dashmap::DashMap;

use super::handle::ConnectionHandle;
use crate::domain::UserId;

/// Registry of live connections, at most one per user
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: DashMap<UserId, ConnectionHandle>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection, replacing any earlier one for the same user.
    ///
    /// Returns the superseded handle. It is not closed here; its own
    /// connection task still owns the transport.
    pub fn register(&self, handle: ConnectionHandle) -> Option<ConnectionHandle> {
        let previous = self.connections.insert(handle.user_id().clone(), handle);
        if let Some(previous) = &previous {
            tracing::debug!(
                user_id = %previous.user_id(),
                connection_id = %previous.id(),
                "Connection superseded"
            );
        }
        previous
    }

    /// Remove whatever connection is registered for `user_id`.
    pub fn unregister(&self, user_id: &UserId) -> Option<ConnectionHandle> {
        self.connections.remove(user_id).map(|(_, handle)| handle)
    }

    /// Remove `handle` only if it is still the registered connection.
    ///
    /// Returns false when the user has reconnected in the meantime, leaving
    /// the newer connection in place.
    pub fn unregister_handle(&self, handle: &ConnectionHandle) -> bool {
        self.connections
            .remove_if(handle.user_id(), |_, current| current.id() == handle.id())
            .is_some()
    }

    /// Current handle for `user_id`, if online.
    pub fn lookup(&self, user_id: &UserId) -> Option<ConnectionHandle> {
        self.connections
            .get(user_id)
            .map(|entry| entry.value().clone())
    }

    /// Snapshot of online users, sorted. May be stale by the time it is used.
    pub fn list_online(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self
            .connections
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        users.sort();
        users
    }

    pub fn count(&self) -> usize {
        self.connections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 登録・解除・検索・オンライン一覧
    // - 同一ユーザーの再接続で後勝ち (last-connect-wins) になること
    // - 古い接続の解除が新しい接続を消さないこと
    // ========================================

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        // テスト項目: 登録した接続を検索できる
        // given (前提条件):
        let registry = ConnectionRegistry::new();
        let (handle, _outbox) = ConnectionHandle::channel(user("alice"), 1);

        // when (操作):
        let previous = registry.register(handle.clone());

        // then (期待する結果):
        assert!(previous.is_none());
        let found = registry.lookup(&user("alice")).unwrap();
        assert_eq!(found.id(), handle.id());
        assert!(registry.lookup(&user("bob")).is_none());
    }

    #[test]
    fn test_register_same_user_last_connect_wins() {
        // テスト項目: 同じユーザーの 2 回目の登録で古い接続が置き換えられる
        // given (前提条件):
        let registry = ConnectionRegistry::new();
        let (first, _outbox1) = ConnectionHandle::channel(user("alice"), 1);
        let (second, _outbox2) = ConnectionHandle::channel(user("alice"), 1);
        registry.register(first.clone());

        // when (操作):
        let previous = registry.register(second.clone());

        // then (期待する結果): エントリは 1 つで、新しい接続を指す
        assert_eq!(previous.map(|h| h.id()), Some(first.id()));
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.lookup(&user("alice")).unwrap().id(), second.id());
    }

    #[test]
    fn test_unregister_stale_handle_keeps_replacement() {
        // テスト項目: 置き換え済みの古い接続を解除しても新しい接続は残る
        // given (前提条件):
        let registry = ConnectionRegistry::new();
        let (first, _outbox1) = ConnectionHandle::channel(user("alice"), 1);
        let (second, _outbox2) = ConnectionHandle::channel(user("alice"), 1);
        registry.register(first.clone());
        registry.register(second.clone());

        // when (操作):
        let removed = registry.unregister_handle(&first);

        // then (期待する結果):
        assert!(!removed);
        assert_eq!(registry.lookup(&user("alice")).unwrap().id(), second.id());

        // 現在の接続なら解除できる
        assert!(registry.unregister_handle(&second));
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_unregister_missing_user_is_noop() {
        // テスト項目: 未登録ユーザーの解除は何もしない
        let registry = ConnectionRegistry::new();
        assert!(registry.unregister(&user("ghost")).is_none());
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_list_online_is_sorted_snapshot() {
        // テスト項目: オンライン一覧がソート済みで返る
        // given (前提条件):
        let registry = ConnectionRegistry::new();
        let mut outboxes = Vec::new();
        for id in ["charlie", "alice", "bob"] {
            let (handle, outbox) = ConnectionHandle::channel(user(id), 1);
            outboxes.push(outbox);
            registry.register(handle);
        }

        // when (操作):
        let online = registry.list_online();

        // then (期待する結果):
        let names: Vec<&str> = online.iter().map(|u| u.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "charlie"]);
    }

    #[tokio::test]
    async fn test_concurrent_registration_keeps_one_entry_per_user() {
        // テスト項目: 同一ユーザーの同時登録でもエントリは常に 1 つ
        // given (前提条件):
        let registry = Arc::new(ConnectionRegistry::new());

        // when (操作): 50 タスクが同じユーザーで同時に登録する
        let mut tasks = Vec::new();
        for _ in 0..50 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                let (handle, outbox) = ConnectionHandle::channel(user("alice"), 1);
                registry.register(handle);
                outbox
            }));
        }
        let mut outboxes = Vec::new();
        for task in tasks {
            outboxes.push(task.await.unwrap());
        }

        // then (期待する結果):
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.list_online(), vec![user("alice")]);
    }
}
