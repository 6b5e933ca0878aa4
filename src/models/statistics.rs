//! # 精修质量统计数据模型
//!
//! 定义从 .ref 文件提取的六个拟合优度 / R 因子指标。
//!
//! ## 依赖关系
//! - 被 `parsers/ref_file.rs` 和 `commands/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 精修质量统计：GoF 与 R 因子
///
/// 六个字段全部必需，缺失任何一个视为解析失败。
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RefinementStatistics {
    /// 观测反射的拟合优度
    pub gof_obs: f64,

    /// 全部反射的拟合优度
    pub gof_all: f64,

    /// 观测反射的 R 因子
    pub r_obs: f64,

    /// 全部反射的 R 因子
    pub r_all: f64,

    /// 观测反射的加权 R 因子
    pub wr_obs: f64,

    /// 全部反射的加权 R 因子
    pub wr_all: f64,
}
