//! Infrastructure layer: store implementations, connection plumbing and DTOs.

pub mod connection;
pub mod dto;
pub mod repository;
