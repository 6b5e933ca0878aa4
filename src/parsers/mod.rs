//! # 解析器模块
//!
//! 提供 Jana2006 各输出文件的固定格式解析器。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: m40, m50, ref_file

pub mod m40;
pub mod m50;
pub mod ref_file;

use crate::error::{JrefineError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// 由精修任务的任意一个文件推导指定扩展名的伴随文件路径
///
/// 三个伴随文件 (.m40 / .ref / .m50) 与输入文件同目录同主名。
pub fn companion_path(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension)
}

/// 读取整个文件为字符串
pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| JrefineError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 文件主名（无目录、无扩展名）
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_companion_path() {
        let path = Path::new("/data/Ca2RuO4_90.cif");
        assert_eq!(
            companion_path(path, "m40"),
            PathBuf::from("/data/Ca2RuO4_90.m40")
        );
        assert_eq!(
            companion_path(path, "ref"),
            PathBuf::from("/data/Ca2RuO4_90.ref")
        );
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(Path::new("/data/sample.m40")), "sample");
    }
}
