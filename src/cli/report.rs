//! # report 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/report.rs`

use clap::Args;
use std::path::PathBuf;

/// report 子命令参数
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Path to any file of the refinement job (.cif, .m40, .ref or .m50);
    /// companion files are derived from the basename
    pub file: PathBuf,

    /// Free-text note recorded in the report header
    #[arg(long, default_value = "")]
    pub notes: String,

    /// Write a machine-readable CSV of the atom parameters
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Do not append the report to the dated log file
    #[arg(long, default_value_t = false)]
    pub no_log: bool,
}
