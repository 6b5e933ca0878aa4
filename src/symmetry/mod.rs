//! # 对称操作求值模块
//!
//! 对 "x,y,z" 形式的对称操作表达式做安全求值，生成等效位置，
//! 并统计对称独立位置数用于位点占据率修正。
//!
//! ## 表达式语法
//! 每个逗号分隔分量是若干带符号项之和，项为坐标变量
//! (`x`/`y`/`z`)、整数、小数或分数 (`1/2`, `2/3`)。
//! 表达式来自外部文件，因此只接受该受限语法，不做任何动态求值。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `error.rs`

use crate::error::{JrefineError, Result};

/// 坐标折叠去重容差
const SITE_TOLERANCE: f64 = 1e-6;

/// 对单个分量表达式求值（如 "-x+1/2", "z", "y-1/3"）
fn eval_component(expr: &str, x: f64, y: f64, z: f64) -> Result<f64> {
    let mut total = 0.0;
    let mut sign = 1.0;
    let mut chars = expr.chars().peekable();

    let mut seen_term = false;
    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '+' => {
                chars.next();
                sign = 1.0;
            }
            '-' => {
                chars.next();
                sign = -1.0;
            }
            'x' => {
                chars.next();
                total += sign * x;
                sign = 1.0;
                seen_term = true;
            }
            'y' => {
                chars.next();
                total += sign * y;
                sign = 1.0;
                seen_term = true;
            }
            'z' => {
                chars.next();
                total += sign * z;
                sign = 1.0;
                seen_term = true;
            }
            '0'..='9' | '.' => {
                let mut num = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        num.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let numerator: f64 = num
                    .parse()
                    .map_err(|_| JrefineError::SymmetryError(expr.to_string()))?;
                // 可选的分数分母
                let value = if chars.peek() == Some(&'/') {
                    chars.next();
                    let mut den = String::new();
                    while let Some(&d) = chars.peek() {
                        if d.is_ascii_digit() || d == '.' {
                            den.push(d);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    let denominator: f64 = den
                        .parse()
                        .map_err(|_| JrefineError::SymmetryError(expr.to_string()))?;
                    numerator / denominator
                } else {
                    numerator
                };
                total += sign * value;
                sign = 1.0;
                seen_term = true;
            }
            _ => return Err(JrefineError::SymmetryError(expr.to_string())),
        }
    }

    if !seen_term {
        return Err(JrefineError::SymmetryError(expr.to_string()));
    }

    // 消除 -0.0
    Ok(total + 0.0)
}

/// 对单个对称操作求值，返回变换后的分数坐标
pub fn apply_operator(op: &str, x: f64, y: f64, z: f64) -> Result<[f64; 3]> {
    let op = op.to_lowercase();
    let parts: Vec<&str> = op.split(',').collect();
    if parts.len() != 3 {
        return Err(JrefineError::SymmetryError(op.to_string()));
    }
    Ok([
        eval_component(parts[0], x, y, z)?,
        eval_component(parts[1], x, y, z)?,
        eval_component(parts[2], x, y, z)?,
    ])
}

/// 由对称操作列表生成全部等效位置（保持操作顺序，不去重）
pub fn gen_sym_pos(ops: &[String], x: f64, y: f64, z: f64) -> Result<Vec<[f64; 3]>> {
    ops.iter().map(|op| apply_operator(op, x, y, z)).collect()
}

/// 坐标差是否在模 1 容差内为零
fn wraps_to_same(a: f64, b: f64) -> bool {
    let d = a - b;
    (d - d.round()).abs() < SITE_TOLERANCE
}

/// 统计对称独立位置数（折叠入单胞后去重）
pub fn count_distinct_sites(positions: &[[f64; 3]]) -> usize {
    let mut distinct: Vec<[f64; 3]> = Vec::new();
    for pos in positions {
        let found = distinct.iter().any(|d| {
            wraps_to_same(pos[0], d[0]) && wraps_to_same(pos[1], d[1]) && wraps_to_same(pos[2], d[2])
        });
        if !found {
            distinct.push(*pos);
        }
    }
    distinct.len()
}

/// 位点占据率修正系数：操作数 / 独立位置数
///
/// 一般位置得 1，特殊位置得 >1 的整数比。
pub fn occupancy_fraction(ops: &[String], x: f64, y: f64, z: f64) -> Result<f64> {
    let positions = gen_sym_pos(ops, x, y, z)?;
    let distinct = count_distinct_sites(&positions);
    Ok(ops.len() as f64 / distinct as f64)
}
