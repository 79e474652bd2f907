//! # `tickview-market` - 行情序列中心
//!
//! 以不可变快照的形式保存每个证券的原始采样，并把每次更新广播给订阅者。

pub mod feeder;
pub mod hub;
