//! # jrefine - Jana2006 精修报告工具
//!
//! 解析 Jana2006 精修输出文件 (.m40 / .ref / .m50)，
//! 生成可读的精修结果报告。
//!
//! ## 子命令
//! - `report` - 文本报告（终端 + 日期日志文件，可选 CSV 导出）
//! - `table`  - LaTeX 表格
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (固定格式解析器)
//!   │     ├── models/    (数据模型)
//!   │     └── symmetry/  (对称操作求值)
//!   ├── utils/      (格式化与输出工具)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod symmetry;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
