//! # Jana2006 .m40 原子参数解析器
//!
//! 解析 .m40 原子位置 / ADP 表，含主数据块和镜像的不确定度块。
//!
//! ## .m40 格式说明
//! ```text
//!    3  0  0  1                     <- 头行：4 个整数，首个为原子数
//! 0.100000                          <- 比例因子
//! ...
//! 0.010000                          <- 消光系数（头行下 4 行）
//! Ru1       3  2     1.000000 0.000000 0.000000 0.000000    <- 原子行
//! 0.000970 0.000970 0.003098 0.000485 0.000000 0.000000     <- ADP 行（6×9 字符定宽）
//! ...
//! 0.001234                          <- 不确定度块，结构与主块镜像
//! ...
//! ```
//!
//! 每个原子占 2 行；非简谐原子 (ADP 类型 >2) 额外带 2 行续行，
//! 行偏移由逐原子累加器计算。不确定度块的行布局与主块相同，
//! 但字段提取方式不同（位置取行尾 3 个空白分隔记号）。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/atoms.rs`

use crate::error::{JrefineError, Result};
use crate::models::{AtomErrorRecord, AtomErrorTable, AtomRecord, AtomTable};
use regex::Regex;
use std::path::Path;

/// ADP 行定宽字段宽度
const ADP_FIELD_WIDTH: usize = 9;
/// ADP 行字段个数
const ADP_FIELD_COUNT: usize = 6;
/// 消光系数相对头行的偏移（主块）
const EXTINCTION_OFFSET: usize = 4;
/// 消光系数相对块首的偏移（不确定度块）
const ERROR_EXTINCTION_OFFSET: usize = 3;
/// 非简谐原子的额外续行数
const ANHARMONIC_EXTRA_LINES: usize = 2;

/// 解析 .m40 文件
pub fn parse_m40_file(path: &Path) -> Result<(AtomTable, AtomErrorTable)> {
    let content = super::read_file(path)?;
    parse_m40_content(&content, &super::file_stem(path))
}

/// 固定布局上的行游标，集中所有越界检查
struct LineCursor<'a> {
    lines: Vec<&'a str>,
    source: &'a str,
}

impl<'a> LineCursor<'a> {
    fn new(content: &'a str, source: &'a str) -> Self {
        LineCursor {
            lines: content.lines().collect(),
            source,
        }
    }

    fn len(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Result<&'a str> {
        self.lines
            .get(index)
            .copied()
            .ok_or_else(|| JrefineError::FormatError {
                format: "m40".to_string(),
                path: self.source.to_string(),
                reason: format!("File truncated: expected line {}", index + 1),
            })
    }

    /// 行首记号解析为 f64
    fn first_token_f64(&self, index: usize) -> Result<f64> {
        let line = self.line(index)?;
        let token = line
            .split_whitespace()
            .next()
            .ok_or_else(|| JrefineError::FormatError {
                format: "m40".to_string(),
                path: self.source.to_string(),
                reason: format!("Empty line {} where a number was expected", index + 1),
            })?;
        parse_f64(token, self.source)
    }
}

fn parse_f64(token: &str, source: &str) -> Result<f64> {
    token.parse().map_err(|_| JrefineError::NumericError {
        format: "m40".to_string(),
        path: source.to_string(),
        value: token.to_string(),
    })
}

fn parse_i32(token: &str, source: &str) -> Result<i32> {
    token.parse().map_err(|_| JrefineError::NumericError {
        format: "m40".to_string(),
        path: source.to_string(),
        value: token.to_string(),
    })
}

/// 按 9 字符定宽切出 6 个 ADP 值（无分隔符，不能按空白切分）
fn parse_adp_line(line: &str, source: &str) -> Result<[f64; 6]> {
    let mut values = [0.0; ADP_FIELD_COUNT];
    for (i, slot) in values.iter_mut().enumerate() {
        let start = i * ADP_FIELD_WIDTH;
        let end = (start + ADP_FIELD_WIDTH).min(line.len());
        let field = line.get(start..end).unwrap_or("").trim();
        if field.is_empty() {
            return Err(JrefineError::FormatError {
                format: "m40".to_string(),
                path: source.to_string(),
                reason: format!("ADP line too short: '{}'", line.trim_end()),
            });
        }
        *slot = parse_f64(field, source)?;
    }
    Ok(values)
}

/// 从字符串内容解析 .m40 原子表与不确定度表
pub fn parse_m40_content(content: &str, name: &str) -> Result<(AtomTable, AtomErrorTable)> {
    let cursor = LineCursor::new(content, name);
    let format_err = |reason: String| JrefineError::FormatError {
        format: "m40".to_string(),
        path: name.to_string(),
        reason,
    };

    // 头行：首个恰含 4 个整数串的行
    let int_run_re = Regex::new(r"\d+").expect("static digit pattern");
    let fst = (0..cursor.len())
        .find(|&n| int_run_re.find_iter(cursor.lines[n]).count() == 4)
        .ok_or_else(|| format_err("Header line with 4 integers not found".to_string()))?;

    // 原子块首行：头行之后首个含字母的行
    let alpha_re = Regex::new(r"[a-zA-Z_]+").expect("static alpha pattern");
    let fst_atom = (fst..cursor.len())
        .find(|&n| alpha_re.is_match(cursor.lines[n]))
        .ok_or_else(|| format_err("Atom block not found after header".to_string()))?;

    let natoms: usize = {
        let token = cursor
            .line(fst)?
            .split_whitespace()
            .next()
            .ok_or_else(|| format_err("Empty header line".to_string()))?;
        token.parse().map_err(|_| JrefineError::NumericError {
            format: "m40".to_string(),
            path: name.to_string(),
            value: token.to_string(),
        })?
    };
    let scale = cursor.first_token_f64(fst + 1)?;
    let extinction = cursor.first_token_f64(fst + EXTINCTION_OFFSET)?;

    // ─────────────────────────────────────────────────────────────
    // 主数据块
    // ─────────────────────────────────────────────────────────────
    // 占据率与坐标列前无保证的分隔符，按小数模式提取：
    // 首个匹配为占据率，其后 3 个为坐标
    let decimal_re = Regex::new(r".\d+\.\d+").expect("static decimal pattern");

    let mut atoms = Vec::with_capacity(natoms);
    let mut extra_lines = 0usize;
    for n in 0..natoms {
        let atom_line = fst_atom + 2 * n + extra_lines;
        let ln1 = cursor.line(atom_line)?;
        let ln2 = cursor.line(atom_line + 1)?;

        let tokens: Vec<&str> = ln1.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(format_err(format!("Malformed atom line: '{}'", ln1.trim_end())));
        }
        let label = tokens[0].to_string();
        let type_code = parse_i32(tokens[1], name)?;
        let adp_type_code = parse_i32(tokens[2], name)?;

        let decimals: Vec<f64> = decimal_re
            .find_iter(ln1)
            .map(|m| parse_f64(m.as_str().trim_start(), name))
            .collect::<Result<_>>()?;
        if decimals.len() < 4 {
            return Err(format_err(format!(
                "Atom line lacks occupancy/position fields: '{}'",
                ln1.trim_end()
            )));
        }
        let occupancy = decimals[0];
        let position = [decimals[1], decimals[2], decimals[3]];
        let displacement_params = parse_adp_line(ln2, name)?;

        atoms.push(AtomRecord {
            label,
            type_code,
            adp_type_code,
            position,
            occupancy,
            displacement_params,
        });

        // 非简谐原子带 2 行续行
        if adp_type_code > 2 {
            extra_lines += ANHARMONIC_EXTRA_LINES;
        }
    }

    // ─────────────────────────────────────────────────────────────
    // 不确定度块：主块结束后偏移 1 行，内部布局与主块镜像
    // ─────────────────────────────────────────────────────────────
    let sublock = fst_atom + 2 * natoms + extra_lines + 1;
    let error_scale = cursor.first_token_f64(sublock)?;
    let error_extinction = cursor.first_token_f64(sublock + ERROR_EXTINCTION_OFFSET)?;

    // 块首到原子行的间距与主块的头行间距一致
    let block_gap = fst_atom - fst - 1;

    let mut error_atoms = Vec::with_capacity(natoms);
    let mut extra_lines = 0usize;
    for n in 0..natoms {
        let atom_line = sublock + block_gap + 2 * n + extra_lines;
        let ln1 = cursor.line(atom_line)?;
        let ln2 = cursor.line(atom_line + 1)?;

        // 不确定度行格式与主块略有差异：
        // 坐标取行尾 3 个记号，占据率取第 2 个记号
        let tokens: Vec<&str> = ln1.split_whitespace().collect();
        if tokens.len() < 4 {
            return Err(format_err(format!(
                "Malformed error line: '{}'",
                ln1.trim_end()
            )));
        }
        let occupancy = parse_f64(tokens[1], name)?;
        let tail = &tokens[tokens.len() - 3..];
        let position = [
            parse_f64(tail[0], name)?,
            parse_f64(tail[1], name)?,
            parse_f64(tail[2], name)?,
        ];
        let displacement_params = parse_adp_line(ln2, name)?;

        error_atoms.push(AtomErrorRecord {
            label: atoms[n].label.clone(),
            position,
            occupancy,
            displacement_params,
        });

        // 不确定度块不带独立的 ADP 类型，沿用主块分类
        if atoms[n].is_anharmonic() {
            extra_lines += ANHARMONIC_EXTRA_LINES;
        }
    }

    Ok((
        AtomTable {
            name: name.to_string(),
            scale,
            extinction,
            atoms,
        },
        AtomErrorTable {
            scale: error_scale,
            extinction: error_extinction,
            atoms: error_atoms,
        },
    ))
}
