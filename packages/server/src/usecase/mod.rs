//! UseCase 層
//!
//! 配送判定・接続・切断・未配信一括送信のビジネスロジックを提供します。

mod connect_user;
mod disconnect_user;
mod dispatch_message;
mod error;
mod flush_backlog;
mod list_online_users;

pub use connect_user::ConnectUserUseCase;
pub use disconnect_user::DisconnectUserUseCase;
pub use dispatch_message::{DispatchMessageUseCase, DispatchOutcome};
pub use error::{DispatchError, FlushError};
pub use flush_backlog::{FlushBacklogUseCase, FlushReport};
pub use list_online_users::ListOnlineUsersUseCase;
