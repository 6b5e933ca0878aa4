//! # 工具函数模块
//!
//! 提供美化输出和不确定度格式化工具。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 子模块: output, stfm

pub mod output;
pub mod stfm;
