//! # table 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/table.rs`

use clap::Args;
use std::path::PathBuf;

/// table 子命令参数
#[derive(Args, Debug)]
pub struct TableArgs {
    /// Path to any file of the refinement job (.cif, .m40, .ref or .m50);
    /// companion files are derived from the basename
    pub file: PathBuf,
}
