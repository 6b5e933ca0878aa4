//! # 数据模型模块
//!
//! 定义精修结果的统一数据表示。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `commands/` 使用
//! - 子模块: atoms, statistics, cell

pub mod atoms;
pub mod cell;
pub mod statistics;

pub use atoms::{AtomErrorRecord, AtomErrorTable, AtomRecord, AtomTable};
pub use cell::{CellSymmetry, Centering};
pub use statistics::RefinementStatistics;
