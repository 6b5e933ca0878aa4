//! # 统一错误处理模块
//!
//! 定义 jrefine 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// jrefine 统一错误类型
#[derive(Error, Debug)]
pub enum JrefineError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    FormatError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Invalid number in {format} file: {path}\nField: '{value}'")]
    NumericError {
        format: String,
        path: String,
        value: String,
    },

    #[error("Invalid symmetry operator: '{0}'")]
    SymmetryError(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, JrefineError>;
