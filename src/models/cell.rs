//! # 晶胞与对称性数据模型
//!
//! 定义从 .m50 文件解析出的晶格参数、空间群与对称操作，
//! 以及按点阵心化展开对称操作的逻辑。
//!
//! ## 依赖关系
//! - 被 `parsers/m50.rs` 和 `commands/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 点阵心化类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Centering {
    /// 简单点阵
    P,
    /// A 面心
    A,
    /// B 面心
    B,
    /// C 面心
    C,
    /// 体心
    I,
    /// 全面心
    F,
    /// 菱方（正当六方设置）
    R,
}

impl Centering {
    /// 从 .m50 的 lattice 字母解析
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'P' => Some(Centering::P),
            'A' => Some(Centering::A),
            'B' => Some(Centering::B),
            'C' => Some(Centering::C),
            'I' => Some(Centering::I),
            'F' => Some(Centering::F),
            'R' => Some(Centering::R),
            _ => None,
        }
    }

    /// 心化平移模板，每项为附加到 (x, y, z) 三个分量的后缀
    ///
    /// 恒等平移总在最前，其余顺序固定。
    pub fn translation_templates(&self) -> &'static [[&'static str; 3]] {
        match self {
            Centering::P => &[["", "", ""]],
            Centering::A => &[["", "", ""], ["", "+1/2", "+1/2"]],
            Centering::B => &[["", "", ""], ["+1/2", "", "+1/2"]],
            Centering::C => &[["", "", ""], ["+1/2", "+1/2", ""]],
            Centering::I => &[["", "", ""], ["+1/2", "+1/2", "+1/2"]],
            Centering::F => &[
                ["", "", ""],
                ["+1/2", "+1/2", ""],
                ["", "+1/2", "+1/2"],
                ["+1/2", "", "+1/2"],
            ],
            Centering::R => &[
                ["", "", ""],
                ["+2/3", "+1/3", "+1/3"],
                ["+1/3", "+2/3", "+2/3"],
            ],
        }
    }

    /// 心化重数：展开后操作数 = 原始操作数 × 重数
    pub fn multiplicity(&self) -> usize {
        self.translation_templates().len()
    }
}

impl std::fmt::Display for Centering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Centering::P => 'P',
            Centering::A => 'A',
            Centering::B => 'B',
            Centering::C => 'C',
            Centering::I => 'I',
            Centering::F => 'F',
            Centering::R => 'R',
        };
        write!(f, "{}", letter)
    }
}

/// 晶胞与对称性信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellSymmetry {
    /// 晶格参数 [a, b, c, alpha, beta, gamma]
    pub lattice_parameters: [f64; 6],

    /// 空间群符号
    pub space_group_symbol: String,

    /// 空间群编号
    pub space_group_number: u32,

    /// 点阵心化
    pub centering: Centering,

    /// 对称操作表达式，已按心化展开（如 "x,y,z", "-x,-y+1/2,z+1/2"）
    pub symmetry_operators: Vec<String>,
}

/// 按心化平移展开一般位置对称操作
///
/// 外层循环保持操作顺序，内层循环保持平移模板顺序。
/// 每个操作必须是逗号分隔的三分量表达式。
pub fn expand_by_centering(operators: &[String], centering: Centering) -> Vec<String> {
    let mut expanded = Vec::with_capacity(operators.len() * centering.multiplicity());
    for op in operators {
        let parts: Vec<&str> = op.split(',').collect();
        if parts.len() != 3 {
            // 非三分量操作原样保留，交由下游求值时报错
            expanded.push(op.clone());
            continue;
        }
        for tpl in centering.translation_templates() {
            expanded.push(format!(
                "{}{},{}{},{}{}",
                parts[0], tpl[0], parts[1], tpl[1], parts[2], tpl[2]
            ));
        }
    }
    expanded
}
