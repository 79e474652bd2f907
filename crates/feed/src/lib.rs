//! # `tickview-feed` - 行情数据源适配
//!
//! 解码行情服务器的消息格式，并提供基于录制文件的回放数据源。

pub mod payload;
pub mod replay;
