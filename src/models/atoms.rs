//! # 原子参数数据模型
//!
//! 定义从 .m40 文件解析出的原子位置、占据率与 ADP 参数，
//! 以及对应的标准不确定度记录。
//!
//! ## 依赖关系
//! - 被 `parsers/m40.rs` 和 `commands/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 单个精修原子位点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtomRecord {
    /// 原子标签（文件内唯一，保持文件顺序）
    pub label: String,

    /// 散射类型编号
    pub type_code: i32,

    /// ADP 表示类型：1 = 各向同性，2 = 各向异性，>2 = 非简谐
    pub adp_type_code: i32,

    /// 分数坐标 [x, y, z]
    pub position: [f64; 3],

    /// 占据率（精修值可能越出 [0,1]，只标记不拒绝）
    pub occupancy: f64,

    /// ADP 参数 [U11, U22, U33, U12, U13, U23]
    /// 各向同性原子只有 U11 有意义，其余为 0
    pub displacement_params: [f64; 6],
}

impl AtomRecord {
    /// ADP 类型是否为非简谐（带额外续行）
    pub fn is_anharmonic(&self) -> bool {
        self.adp_type_code > 2
    }

    /// ADP 是否为各向同性（仅 U11）
    pub fn is_isotropic(&self) -> bool {
        self.displacement_params[1] == 0.0
    }
}

/// 原子参数的标准不确定度，结构与 [`AtomRecord`] 相同
///
/// 0.0 表示该参数固定未精修，无不确定度。
/// 不确定度没有独立的 ADP 类型，共享对应原子的 `adp_type_code`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtomErrorRecord {
    pub label: String,
    pub position: [f64; 3],
    pub occupancy: f64,
    pub displacement_params: [f64; 6],
}

/// .m40 主数据块解析结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtomTable {
    /// 结构名称（来自文件名）
    pub name: String,

    /// 整体比例因子
    pub scale: f64,

    /// 消光系数
    pub extinction: f64,

    /// 原子记录，按文件顺序
    pub atoms: Vec<AtomRecord>,
}

/// .m40 不确定度块解析结果，与主数据块一一对应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtomErrorTable {
    pub scale: f64,
    pub extinction: f64,
    pub atoms: Vec<AtomErrorRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_record_anharmonic() {
        let atom = AtomRecord {
            label: "Ru1".to_string(),
            type_code: 3,
            adp_type_code: 4,
            position: [0.0, 0.0, 0.0],
            occupancy: 1.0,
            displacement_params: [0.001, 0.001, 0.003, 0.0, 0.0, 0.0],
        };
        assert!(atom.is_anharmonic());
        assert!(!atom.is_isotropic());
    }

    #[test]
    fn test_atom_record_isotropic() {
        let atom = AtomRecord {
            label: "O1".to_string(),
            type_code: 1,
            adp_type_code: 1,
            position: [0.5, 0.5, 0.5],
            occupancy: 1.0,
            displacement_params: [0.005, 0.0, 0.0, 0.0, 0.0, 0.0],
        };
        assert!(!atom.is_anharmonic());
        assert!(atom.is_isotropic());
    }
}
