//! # Mie 消光模块
//!
//! 提供降水粒子 Mie 散射消光计算与对比图生成功能。
//!
//! ## 子模块
//! - `scattering`: Mie 散射效率计算
//! - `distribution`: 降水粒子谱分布
//! - `model`: 消光模型接口与实现
//! - `sweep`: 降水率扫描
//! - `plot`: 图表生成
//! - `export`: 数据导出
//!
//! ## 依赖关系
//! - 被 `commands/compare.rs` 和 `commands/modes.rs` 使用

pub mod distribution;
pub mod export;
pub mod model;
pub mod plot;
pub mod scattering;
pub mod sweep;

pub use distribution::Mode;
pub use model::{ExtinctionModel, MieModel, ModelConfig};
pub use sweep::{ComparisonData, SweepConfig};
