//! Delivery queue and the worker pool that drains it.

pub mod queue;
pub mod worker;

pub use queue::{DEFAULT_QUEUE_CAPACITY, DeliveryQueue, QueueError, QueueReceiver, QueueSender};
pub use worker::{DEFAULT_WORKER_COUNT, WorkerPool};
