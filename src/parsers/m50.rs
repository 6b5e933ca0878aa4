//! # Jana2006 .m50 晶胞/对称性解析器
//!
//! 从 .m50 文件头提取晶格参数、点阵心化、空间群与对称操作，
//! 并按心化展开操作列表。
//!
//! ## .m50 格式说明
//! ```text
//! cell 5.4037 5.4037 7.6014 90 90 90
//! lattice P
//! spgroup P222 16
//! symmetry x y z
//! symmetry -x -y z
//! ```
//! 一般位置操作行只含带符号的 x/y/z 三元组，
//! 平移分量由心化展开补入。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/cell.rs`

use crate::error::{JrefineError, Result};
use crate::models::cell::{expand_by_centering, CellSymmetry, Centering};
use regex::Regex;
use std::path::Path;

/// 解析 .m50 文件
pub fn parse_m50_file(path: &Path) -> Result<CellSymmetry> {
    let content = super::read_file(path)?;
    parse_m50_content(&content, &path.display().to_string())
}

/// 从字符串内容解析晶胞与对称性
pub fn parse_m50_content(content: &str, source: &str) -> Result<CellSymmetry> {
    let format_err = |reason: &str| JrefineError::FormatError {
        format: "m50".to_string(),
        path: source.to_string(),
        reason: reason.to_string(),
    };

    // 晶格参数：cell 关键字后 6 个数
    let cell_re = Regex::new(
        r"cell ([-0-9.]+) ([-0-9.]+) ([-0-9.]+) ([-0-9.]+) ([-0-9.]+) ([-0-9.]+)",
    )
    .expect("static cell pattern");
    let cell_caps = cell_re
        .captures(content)
        .ok_or_else(|| format_err("Missing 'cell' line"))?;

    let mut lattice_parameters = [0.0; 6];
    for (i, slot) in lattice_parameters.iter_mut().enumerate() {
        let field = cell_caps.get(i + 1).map(|m| m.as_str()).unwrap_or("");
        *slot = field.parse().map_err(|_| JrefineError::NumericError {
            format: "m50".to_string(),
            path: source.to_string(),
            value: field.to_string(),
        })?;
    }

    // 点阵心化：lattice 关键字后单个大写字母
    let lattice_re = Regex::new(r"lattice ([A-Z])").expect("static lattice pattern");
    let letter = lattice_re
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().chars().next().unwrap_or('P'))
        .ok_or_else(|| format_err("Missing 'lattice' line"))?;
    let centering = Centering::from_letter(letter)
        .ok_or_else(|| format_err(&format!("Unknown lattice centering: {}", letter)))?;

    // 空间群符号与编号
    let spgroup_re = Regex::new(r"spgroup (\S+) (\d+)").expect("static spgroup pattern");
    let spgroup_caps = spgroup_re
        .captures(content)
        .ok_or_else(|| format_err("Missing 'spgroup' line"))?;
    let space_group_symbol = spgroup_caps[1].to_string();
    let space_group_number: u32 =
        spgroup_caps[2]
            .parse()
            .map_err(|_| JrefineError::NumericError {
                format: "m50".to_string(),
                path: source.to_string(),
                value: spgroup_caps[2].to_string(),
            })?;

    // 对称操作行："x y z" 形状的三元组，规范化为 "x,y,z"
    let sym_re = Regex::new(r"[\s-]+[xyz][\s-]+[xyz][\s-]+[xyz]").expect("static symmetry pattern");
    let raw_operators: Vec<String> = sym_re
        .find_iter(content)
        .map(|m| {
            m.as_str()
                .trim()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect();

    if raw_operators.is_empty() {
        return Err(format_err("No symmetry operator lines found"));
    }

    let symmetry_operators = expand_by_centering(&raw_operators, centering);

    Ok(CellSymmetry {
        lattice_parameters,
        space_group_symbol,
        space_group_number,
        centering,
        symmetry_operators,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
title Ca2RuO4
cell 5.4037 5.4924 11.9224 90 90 90
esdcell 0.0002 0.0002 0.0004 0 0 0
lattice P
spgroup P222 16
symmetry x y z
symmetry -x -y z
symmetry x -y -z
symmetry -x y -z
end
";

    #[test]
    fn test_parse_m50_basic() {
        let cell = parse_m50_content(SAMPLE, "test").unwrap();
        assert_eq!(cell.lattice_parameters[0], 5.4037);
        assert_eq!(cell.lattice_parameters[2], 11.9224);
        assert_eq!(cell.lattice_parameters[5], 90.0);
        assert_eq!(cell.space_group_symbol, "P222");
        assert_eq!(cell.space_group_number, 16);
        assert_eq!(cell.centering, Centering::P);
    }

    #[test]
    fn test_parse_m50_operator_normalization() {
        let cell = parse_m50_content(SAMPLE, "test").unwrap();
        assert_eq!(cell.symmetry_operators.len(), 4);
        assert_eq!(cell.symmetry_operators[0], "x,y,z");
        assert_eq!(cell.symmetry_operators[1], "-x,-y,z");
    }

    #[test]
    fn test_parse_m50_centering_expansion() {
        let content = SAMPLE.replace("lattice P", "lattice I");
        let cell = parse_m50_content(&content, "test").unwrap();
        // 4 个原始操作 × 体心重数 2
        assert_eq!(cell.symmetry_operators.len(), 8);
        assert_eq!(cell.symmetry_operators[0], "x,y,z");
        assert_eq!(cell.symmetry_operators[1], "x+1/2,y+1/2,z+1/2");
    }

    #[test]
    fn test_parse_m50_missing_cell() {
        let content = "lattice P\nspgroup P1 1\nsymmetry x y z\n";
        assert!(matches!(
            parse_m50_content(content, "test"),
            Err(JrefineError::FormatError { .. })
        ));
    }

    #[test]
    fn test_parse_m50_missing_operators() {
        let content = "cell 5 5 5 90 90 90\nlattice P\nspgroup P1 1\n";
        assert!(matches!(
            parse_m50_content(content, "test"),
            Err(JrefineError::FormatError { .. })
        ));
    }

    #[test]
    fn test_parse_m50_unknown_centering() {
        let content = SAMPLE.replace("lattice P", "lattice Q");
        assert!(parse_m50_content(&content, "test").is_err());
    }
}
