//! almanac Query Coordination Layer
//!
//! Turns one-shot backend commands into a cached, deduplicated,
//! invalidation-aware resource-fetching system:
//! - Command gateway result shapes and error taxonomy
//! - Cache key derivation
//! - Query cache with request coalescing and invalidation
//! - Bounded resource loader (strict FIFO, one job at a time)
//! - Display retry policy for post-fetch render failures

pub mod cache;
pub mod error;
pub mod gateway;
pub mod key;
pub mod loader;
pub mod retry;

pub use cache::{QueryCache, QueryEvent, QueryEventKind, QueryStatus, QuerySubscription};
pub use error::QueryError;
pub use gateway::{resolve_command, CommandError, CommandResult};
pub use key::QueryKey;
pub use loader::ResourceLoader;
pub use retry::{DisplayRetryPolicy, RetryDecision, MAX_DISPLAY_ATTEMPTS};
