//! # Jana2006 .ref 精修统计解析器
//!
//! 从 .ref 文件的自由文本中提取六个拟合优度 / R 因子指标。
//!
//! ## .ref 格式说明
//! ```text
//! ... GOF(obs)= 1.23 GOF(all)= 1.45 ...
//! ... R(obs)= 0.05 R(all)= 0.06 wR(obs)= 0.07 wR(all)= 0.08 ...
//! ```
//! 每个指标由"标签 + 非数字分隔 + 小数"定位，取全文首个匹配。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/statistics.rs`

use crate::error::{JrefineError, Result};
use crate::models::RefinementStatistics;
use regex::Regex;
use std::path::Path;

/// 解析 .ref 文件
pub fn parse_ref_file(path: &Path) -> Result<RefinementStatistics> {
    let content = super::read_file(path)?;
    parse_ref_content(&content, &path.display().to_string())
}

/// 从字符串内容解析精修统计
pub fn parse_ref_content(content: &str, source: &str) -> Result<RefinementStatistics> {
    Ok(RefinementStatistics {
        gof_obs: extract_labeled_value(content, "GOF.obs", source)?,
        gof_all: extract_labeled_value(content, "GOF.all", source)?,
        r_obs: extract_labeled_value(content, "R.obs", source)?,
        r_all: extract_labeled_value(content, "R.all", source)?,
        wr_obs: extract_labeled_value(content, "wR.obs", source)?,
        wr_all: extract_labeled_value(content, "wR.all", source)?,
    })
}

/// 定位"标签 + 非数字 + 小数"，返回首个匹配的数值
///
/// 标签中的 `.` 按正则任意字符匹配，以兼容 `GOF(obs)`、`GOF obs` 等写法。
fn extract_labeled_value(content: &str, label: &str, source: &str) -> Result<f64> {
    let pattern = format!(r"{}\D+(\d+\.\d+)", label);
    let re = Regex::new(&pattern).expect("static statistic pattern");

    let captures = re
        .captures(content)
        .ok_or_else(|| JrefineError::FormatError {
            format: "ref".to_string(),
            path: source.to_string(),
            reason: format!("Missing statistic: {}", label),
        })?;

    let value = captures.get(1).map(|m| m.as_str()).unwrap_or("");
    value.parse().map_err(|_| JrefineError::NumericError {
        format: "ref".to_string(),
        path: source.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Last refinement cycle
GOF(obs)= 1.23  GOF(all)= 1.45
R(obs)= 0.05  R(all)= 0.06
wR(obs)= 0.07  wR(all)= 0.08
";

    #[test]
    fn test_parse_ref_basic() {
        let stats = parse_ref_content(SAMPLE, "test").unwrap();
        assert_eq!(stats.gof_obs, 1.23);
        assert_eq!(stats.gof_all, 1.45);
        assert_eq!(stats.r_obs, 0.05);
        assert_eq!(stats.r_all, 0.06);
        assert_eq!(stats.wr_obs, 0.07);
        assert_eq!(stats.wr_all, 0.08);
    }

    #[test]
    fn test_parse_ref_first_match_wins() {
        let content = format!("{}\nGOF(obs)= 9.99\n", SAMPLE);
        let stats = parse_ref_content(&content, "test").unwrap();
        assert_eq!(stats.gof_obs, 1.23);
    }

    #[test]
    fn test_parse_ref_missing_label() {
        let content = "GOF(obs)= 1.23 GOF(all)= 1.45 R(obs)= 0.05 R(all)= 0.06 wR(obs)= 0.07";
        let result = parse_ref_content(content, "test");
        match result {
            Err(JrefineError::FormatError { reason, .. }) => {
                assert!(reason.contains("wR.all"));
            }
            other => panic!("expected FormatError, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_ref_label_separators() {
        // 标签与数值之间允许任意非数字分隔
        let content = "GOF obs : 1.10 GOF all : 1.20 R obs : 0.10 R all : 0.20 \
                       wR obs : 0.30 wR all : 0.40";
        let stats = parse_ref_content(content, "test").unwrap();
        assert_eq!(stats.gof_obs, 1.10);
        assert_eq!(stats.wr_all, 0.40);
    }
}
