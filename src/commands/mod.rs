//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑，以及三个伴随文件的统一加载。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `models/`, `symmetry/`, `utils/`
//! - 子模块: report, table

pub mod report;
pub mod table;

use crate::cli::Commands;
use crate::error::{JrefineError, Result};
use crate::models::{AtomErrorTable, AtomTable, CellSymmetry, RefinementStatistics};
use crate::parsers::{self, m40, m50, ref_file};
use crate::symmetry;
use std::path::{Path, PathBuf};

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Report(args) => report::execute(args),
        Commands::Table(args) => table::execute(args),
    }
}

/// 一次精修任务的全部解析结果
pub struct RefinementData {
    /// 任务主名
    pub name: String,

    /// 任务目录
    pub directory: PathBuf,

    /// 原子参数（.m40 主块）
    pub atoms: AtomTable,

    /// 参数不确定度（.m40 镜像块）
    pub errors: AtomErrorTable,

    /// 精修质量统计（.ref）
    pub statistics: RefinementStatistics,

    /// 晶胞与对称性（.m50）
    pub cell: CellSymmetry,

    /// 逐原子的位点占据率修正系数
    pub occ_frac: Vec<f64>,
}

impl RefinementData {
    /// 对称操作数 / 修正系数 = 位点重数
    pub fn site_multiplicity(&self, atom_index: usize) -> usize {
        let n_ops = self.cell.symmetry_operators.len() as f64;
        (n_ops / self.occ_frac[atom_index]).round() as usize
    }
}

/// 由任务的任意文件路径加载三个伴随文件并计算占据率修正
pub fn load_refinement(path: &Path) -> Result<RefinementData> {
    let m40_path = parsers::companion_path(path, "m40");
    let ref_path = parsers::companion_path(path, "ref");
    let m50_path = parsers::companion_path(path, "m50");

    for companion in [&m40_path, &ref_path, &m50_path] {
        if !companion.exists() {
            return Err(JrefineError::FileNotFound {
                path: companion.display().to_string(),
            });
        }
    }

    let (atoms, errors) = m40::parse_m40_file(&m40_path)?;
    let statistics = ref_file::parse_ref_file(&ref_path)?;
    let cell = m50::parse_m50_file(&m50_path)?;

    let occ_frac = atoms
        .atoms
        .iter()
        .map(|atom| {
            symmetry::occupancy_fraction(
                &cell.symmetry_operators,
                atom.position[0],
                atom.position[1],
                atom.position[2],
            )
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(RefinementData {
        name: parsers::file_stem(path),
        directory: path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".")),
        atoms,
        errors,
        statistics,
        cell,
        occ_frac,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::stfm::stfm;
    use std::fs;

    const M40_SAMPLE: &str = "\
   2  0  0  1
0.100000
0.000000
0.000000
0.010000
Ru1       3  2     1.000000 0.166667 0.000000 0.250000
0.000970 0.000970 0.003098 0.000485 0.000000 0.000000
O1        1  1     0.500000 0.333333 0.100000 0.400000
0.005000 0.000000 0.000000 0.000000 0.000000 0.000000
0.000000
0.001000
0.000000
0.000000
0.000100
Ru1  0.000000  3  2     0.000000 0.000000 0.000000
0.000000 0.000000 0.000000 0.000000 0.000000 0.000000
O1   0.004000  1  1     0.000110 0.000120 0.000130
0.000200 0.000000 0.000000 0.000000 0.000000 0.000000
";

    const REF_SAMPLE: &str = "\
GOF(obs)= 1.23 GOF(all)= 1.45
R(obs)= 0.05 R(all)= 0.06 wR(obs)= 0.07 wR(all)= 0.08
";

    const M50_SAMPLE: &str = "\
cell 5.0 5.0 5.0 90 90 90
lattice P
spgroup P1 1
symmetry x y z
";

    /// 端到端：立方 P 点阵、单位操作、其中一个原子参数全部固定
    #[test]
    fn test_load_refinement_end_to_end() {
        let dir = std::env::temp_dir().join(format!("jrefine-e2e-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("job.m40"), M40_SAMPLE).unwrap();
        fs::write(dir.join("job.ref"), REF_SAMPLE).unwrap();
        fs::write(dir.join("job.m50"), M50_SAMPLE).unwrap();

        let data = load_refinement(&dir.join("job.m40")).unwrap();

        assert_eq!(data.name, "job");
        assert_eq!(data.atoms.atoms.len(), 2);
        assert_eq!(data.cell.symmetry_operators, vec!["x,y,z"]);
        // 单位操作下占据率修正恒为 1
        assert_eq!(data.occ_frac, vec![1.0, 1.0]);
        assert_eq!(data.site_multiplicity(0), 1);
        assert_eq!(data.statistics.gof_all, 1.45);

        // 固定参数（误差 0）的占据率渲染带 (0) 标记
        let atom = &data.atoms.atoms[0];
        let err = &data.errors.atoms[0];
        let occ = stfm(atom.occupancy * data.occ_frac[0], err.occupancy * data.occ_frac[0]);
        assert!(occ.ends_with("(0)"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_refinement_missing_companion() {
        let dir = std::env::temp_dir().join(format!("jrefine-miss-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("job.m40"), M40_SAMPLE).unwrap();
        // 缺少 .ref 和 .m50

        let result = load_refinement(&dir.join("job.m40"));
        assert!(matches!(result, Err(JrefineError::FileNotFound { .. })));

        fs::remove_dir_all(&dir).ok();
    }
}
