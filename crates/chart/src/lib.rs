//! # `tickview-chart` - 图表重采样
//!
//! 将固定频率的原始采样序列按显示窗口切片，再折叠为 K 线或折线点。
//!
//! ## 模块划分
//! - `window`: 窗口请求到切片索引的换算
//! - `bucket`: 切片到分桶结果的折叠
//! - `resampler`: 持有采样频率与边界策略的重采样器
//! - `view`: 按图表规格组装多证券视图

pub mod bucket;
pub mod resampler;
pub mod view;
pub mod window;
