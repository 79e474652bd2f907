//! # `tickview-portfolio` - 持仓估值
//!
//! 基于行情序列快照计算持仓的当前市值与 24 小时涨跌。

pub mod valuer;
