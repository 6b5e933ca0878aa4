//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `report`: 输出最近一次精修的文本报告（终端 + 日志文件）
//! - `table`: 输出精修结果的 LaTeX 表格
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: report, table

pub mod report;
pub mod table;

use clap::{Parser, Subcommand};

/// jrefine - Jana2006 精修报告工具
#[derive(Parser)]
#[command(name = "jrefine")]
#[command(version)]
#[command(about = "Jana2006 crystallographic refinement report toolkit", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Display the last refinement as formatted text and append it to a dated log
    Report(report::ReportArgs),

    /// Generate a LaTeX table of the refinement results
    Table(table::TableArgs),
}
