//! Domain layer for the relay.
//!
//! This module contains the message model and the store contract, independent
//! of transport DTOs and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::Message;
pub use error::{StoreError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use repository::MessageStore;
pub use value_object::{ConnectionId, MessageId, MessageText, Timestamp, UserId};
