mod message;
mod migrations;

pub use message::SqliteMessageStore;
