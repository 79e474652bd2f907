//! # `tickview-core` - 领域模型与端口定义
//!
//! 本 crate 不包含任何具体实现，只定义整个看板系统共享的实体、错误与接口。
//!
//! ## 模块划分
//! - `common`: 分桶周期、时间范围预设与时钟抽象
//! - `market`: 原始行情采样、序列快照、自选列表与数据源端口
//! - `chart`: 图表窗口请求、重采样输出与图表规格
//! - `portfolio`: 持仓与估值结果
//! - `config`: 全局应用配置

pub mod chart;
pub mod common;
pub mod config;
pub mod market;
pub mod portfolio;
