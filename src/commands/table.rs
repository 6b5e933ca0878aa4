//! # table 子命令实现
//!
//! 生成精修结果的 LaTeX 表格：逐原子的位点重数、坐标、
//! 占据率与等效各向同性位移参数。
//!
//! ## 依赖关系
//! - 使用 `cli/table.rs` 定义的参数
//! - 使用 `commands/mod.rs` 的统一加载
//! - 使用 `utils/stfm.rs`

use crate::cli::table::TableArgs;
use crate::commands::{load_refinement, RefinementData};
use crate::error::Result;
use crate::models::{AtomErrorRecord, AtomRecord};
use crate::utils::stfm::stfm;

/// 执行 table 命令
pub fn execute(args: TableArgs) -> Result<()> {
    let data = load_refinement(&args.file)?;
    println!("{}", build_latex_table(&data));
    Ok(())
}

/// 值带不确定度时用标准形式，否则按原值输出（固定参数无误差标记）
fn format_field(value: f64, error: f64) -> String {
    if error > 0.0 {
        stfm(value, error)
    } else {
        value.to_string()
    }
}

/// 等效各向同性位移参数及其不确定度
///
/// 各向异性时取对角分量均值，误差按分量平方和开根传播。
/// 均值对非立方晶系只是近似。
fn equivalent_uiso(atom: &AtomRecord, err: &AtomErrorRecord) -> (f64, f64) {
    let u = &atom.displacement_params;
    let du = &err.displacement_params;
    if atom.is_isotropic() {
        (u[0], du[0])
    } else {
        let mean = (u[0] + u[1] + u[2]) / 3.0;
        let error = (du[0].powi(2) + du[1].powi(2) + du[2].powi(2)).sqrt() / 3.0;
        (mean, error)
    }
}

/// 生成 LaTeX 表格文本
fn build_latex_table(data: &RefinementData) -> String {
    let mut out = String::new();
    out.push_str("\\begin{table}[htp]\n");
    out.push_str("    \\centering\n");
    out.push_str("       \\begin{tabular}{c|c|ccccc}\n");
    out.push_str("             & Site & x & y & z & Occ. & U$_{iso}$ \\\\ \\hline\n");

    for (n, atom) in data.atoms.atoms.iter().enumerate() {
        let err = &data.errors.atoms[n];
        let frac = data.occ_frac[n];

        let x = format_field(atom.position[0], err.position[0]);
        let y = format_field(atom.position[1], err.position[1]);
        let z = format_field(atom.position[2], err.position[2]);
        let occ = format_field(atom.occupancy * frac, err.occupancy * frac);

        let (uiso, du) = equivalent_uiso(atom, err);
        let uiso = stfm(uiso, du);

        out.push_str(&format!(
            "        {} & ${}a$ & {} & {} & {} & {} & {} \\\\\n",
            atom.label,
            data.site_multiplicity(n),
            x,
            y,
            z,
            occ,
            uiso
        ));
    }

    out.push_str("        \\end{tabular}\n");
    out.push_str(&format!(
        "    \\caption{{Refinement of sample with R$_w$ = {}\\%.}}\n",
        data.statistics.wr_all
    ));
    out.push_str("    \\label{tab:}\n");
    out.push_str("\\end{table}");
    out
}
