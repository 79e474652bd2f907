pub mod entity;
pub mod error;
pub mod port;
pub mod watchlist;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
