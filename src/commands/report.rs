//! # report 子命令实现
//!
//! 输出最近一次精修的格式化文本：质量统计、逐原子参数与警告，
//! 打印到终端并追加到按日期命名的日志文件。
//!
//! ## 依赖关系
//! - 使用 `cli/report.rs` 定义的参数
//! - 使用 `commands/mod.rs` 的统一加载
//! - 使用 `utils/output.rs`, `utils/stfm.rs`

use crate::cli::report::ReportArgs;
use crate::commands::{load_refinement, RefinementData};
use crate::error::{JrefineError, Result};
use crate::utils::{output, stfm::stfm};

use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tabled::{Table, Tabled};

/// ADP 数值偏大的提示阈值
const LARGE_ADP_THRESHOLD: f64 = 0.1;

/// 统计表行
#[derive(Debug, Clone, Tabled)]
struct StatRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "obs")]
    obs: String,
    #[tabled(rename = "all")]
    all: String,
}

/// 执行 report 命令
pub fn execute(args: ReportArgs) -> Result<()> {
    let data = load_refinement(&args.file)?;

    output::print_header(&format!("Refinement Report: {}", data.name));
    output::print_info(&format!(
        "{} atoms, space group {} ({}), {} symmetry operators",
        data.atoms.atoms.len(),
        data.cell.space_group_symbol,
        data.cell.space_group_number,
        data.cell.symmetry_operators.len()
    ));

    // 质量统计一览
    let stats = &data.statistics;
    let rows = vec![
        StatRow {
            metric: "GoF".to_string(),
            obs: format!("{:.2}", stats.gof_obs),
            all: format!("{:.2}", stats.gof_all),
        },
        StatRow {
            metric: "R".to_string(),
            obs: format!("{:.2}", stats.r_obs),
            all: format!("{:.2}", stats.r_all),
        },
        StatRow {
            metric: "wR".to_string(),
            obs: format!("{:.2}", stats.wr_obs),
            all: format!("{:.2}", stats.wr_all),
        },
    ];
    println!("{}", Table::new(&rows));
    output::print_separator();

    let body = build_report_body(&data, &args.file, &args.notes)?;
    let warnings = collect_warnings(&data);

    println!("{}", body);
    for warning in &warnings {
        output::print_warning(warning);
    }

    if !args.no_log {
        let log_path = append_log(&data, &body, &warnings)?;
        output::print_success(&format!("Report appended to '{}'", log_path.display()));
    }

    if let Some(ref csv_path) = args.csv {
        save_atoms_csv(&data, csv_path)?;
        output::print_success(&format!("Atom parameters saved to '{}'", csv_path.display()));
    }

    Ok(())
}

/// 生成报告正文（终端与日志共用）
fn build_report_body(data: &RefinementData, source: &Path, notes: &str) -> Result<String> {
    let modified = fs::metadata(source)
        .and_then(|m| m.modified())
        .map_err(|e| JrefineError::FileReadError {
            path: source.display().to_string(),
            source: e,
        })?;
    let date: DateTime<Local> = modified.into();

    let mut body = String::new();
    body.push_str(&format!(
        "--------------{}--------------\n",
        date.format("%a %b %e %H:%M:%S %Y")
    ));
    body.push_str(&format!("{}\n", data.directory.join(&data.name).display()));
    if !notes.is_empty() {
        body.push_str(&format!("{}\n", notes));
    }
    body.push_str(&format!(
        "GoF = {:5.2} R = {:5.2} Rw = {:5.2}\n",
        data.statistics.gof_all, data.statistics.r_all, data.statistics.wr_all
    ));

    for (n, atom) in data.atoms.atoms.iter().enumerate() {
        let err = &data.errors.atoms[n];
        let frac = data.occ_frac[n];

        let x = stfm(atom.position[0], err.position[0]);
        let y = stfm(atom.position[1], err.position[1]);
        let z = stfm(atom.position[2], err.position[2]);
        let occ = stfm(atom.occupancy * frac, err.occupancy * frac);

        let u: Vec<String> = atom
            .displacement_params
            .iter()
            .zip(err.displacement_params.iter())
            .map(|(&value, &error)| stfm(value, error))
            .collect();

        body.push_str(&format!(
            "{:8} x:{:12} y:{:12} z:{:12} occ:{:12}\n",
            atom.label, x, y, z, occ
        ));
        body.push_str(&format!(
            "U11:{:12} U22:{:12} U33:{:12} U12:{:12} U13:{:12} U23:{:12}\n",
            u[0], u[1], u[2], u[3], u[4], u[5]
        ));
    }

    Ok(body)
}

/// 收集非致命警告（标记而非拒绝）
fn collect_warnings(data: &RefinementData) -> Vec<String> {
    let mut warnings = Vec::new();

    // ADP 分量在 3σ 以上为负
    let negative_adps = data
        .atoms
        .atoms
        .iter()
        .zip(data.errors.atoms.iter())
        .flat_map(|(atom, err)| {
            atom.displacement_params
                .iter()
                .zip(err.displacement_params.iter())
        })
        .filter(|(&u, &du)| u < -3.0 * du)
        .count();
    if negative_adps > 0 {
        warnings.push(format!("***{} Negative ADPs***", negative_adps));
    }

    // ADP 分量超出合理量级
    let large_adps = data
        .atoms
        .atoms
        .iter()
        .flat_map(|atom| atom.displacement_params.iter())
        .filter(|&&u| u > LARGE_ADP_THRESHOLD)
        .count();
    if large_adps > 0 {
        warnings.push(format!("***{} Large ADPs***", large_adps));
    }

    // 占据率在 3σ 以上为负
    let negative_occ = data
        .atoms
        .atoms
        .iter()
        .zip(data.errors.atoms.iter())
        .filter(|(atom, err)| atom.occupancy < -3.0 * err.occupancy)
        .count();
    if negative_occ > 0 {
        warnings.push(format!("***{} Negative Occupancies***", negative_occ));
    }

    // 修正后占据率超过 1
    let over_occupied = data
        .atoms
        .atoms
        .iter()
        .enumerate()
        .filter(|(n, atom)| atom.occupancy * data.occ_frac[*n] > 1.0)
        .count();
    if over_occupied > 0 {
        warnings.push(format!("***{} Occupancies > 1***", over_occupied));
    }

    warnings
}

/// 追加报告到按日期命名的日志文件，返回日志路径
fn append_log(
    data: &RefinementData,
    body: &str,
    warnings: &[String],
) -> Result<std::path::PathBuf> {
    let log_name = format!("Refinement {}.txt", Local::now().format("%Y %m%b %d"));
    let log_path = data.directory.join(log_name);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| JrefineError::FileWriteError {
            path: log_path.display().to_string(),
            source: e,
        })?;

    let mut content = body.to_string();
    for warning in warnings {
        content.push_str(warning);
        content.push('\n');
    }
    content.push('\n');

    file.write_all(content.as_bytes())
        .map_err(|e| JrefineError::FileWriteError {
            path: log_path.display().to_string(),
            source: e,
        })?;

    Ok(log_path)
}

/// 保存原子参数到 CSV
fn save_atoms_csv(data: &RefinementData, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record([
        "label", "type", "adp_type", "x", "y", "z", "occ", "occ_frac", "u11", "u22", "u33",
        "u12", "u13", "u23", "err_x", "err_y", "err_z", "err_occ", "err_u11", "err_u22",
        "err_u33", "err_u12", "err_u13", "err_u23",
    ])?;

    for (n, atom) in data.atoms.atoms.iter().enumerate() {
        let err = &data.errors.atoms[n];
        let mut record: Vec<String> = vec![
            atom.label.clone(),
            atom.type_code.to_string(),
            atom.adp_type_code.to_string(),
        ];
        record.extend(atom.position.iter().map(|v| format!("{:.10}", v)));
        record.push(format!("{:.10}", atom.occupancy));
        record.push(format!("{:.10}", data.occ_frac[n]));
        record.extend(
            atom.displacement_params
                .iter()
                .map(|v| format!("{:.10}", v)),
        );
        record.extend(err.position.iter().map(|v| format!("{:.10}", v)));
        record.push(format!("{:.10}", err.occupancy));
        record.extend(
            err.displacement_params
                .iter()
                .map(|v| format!("{:.10}", v)),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush().map_err(|e| JrefineError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AtomErrorRecord, AtomErrorTable, AtomRecord, AtomTable, CellSymmetry, Centering,
        RefinementStatistics,
    };
    use std::path::PathBuf;

    fn sample_data() -> RefinementData {
        let atoms = vec![
            AtomRecord {
                label: "Ru1".to_string(),
                type_code: 3,
                adp_type_code: 2,
                position: [0.0, 0.0, 0.0],
                occupancy: 1.2,
                displacement_params: [0.2, 0.001, 0.001, 0.0, 0.0, 0.0],
            },
            AtomRecord {
                label: "O1".to_string(),
                type_code: 1,
                adp_type_code: 1,
                position: [0.1, 0.2, 0.3],
                occupancy: -0.5,
                displacement_params: [-0.05, 0.0, 0.0, 0.0, 0.0, 0.0],
            },
        ];
        let errors = vec![
            AtomErrorRecord {
                label: "Ru1".to_string(),
                position: [0.0, 0.0, 0.0],
                occupancy: 0.01,
                displacement_params: [0.001, 0.001, 0.001, 0.0, 0.0, 0.0],
            },
            AtomErrorRecord {
                label: "O1".to_string(),
                position: [0.001, 0.001, 0.001],
                occupancy: 0.1,
                displacement_params: [0.01, 0.0, 0.0, 0.0, 0.0, 0.0],
            },
        ];
        RefinementData {
            name: "sample".to_string(),
            directory: PathBuf::from("."),
            atoms: AtomTable {
                name: "sample".to_string(),
                scale: 0.1,
                extinction: 0.0,
                atoms,
            },
            errors: AtomErrorTable {
                scale: 0.0,
                extinction: 0.0,
                atoms: errors,
            },
            statistics: RefinementStatistics {
                gof_obs: 1.23,
                gof_all: 1.45,
                r_obs: 0.05,
                r_all: 0.06,
                wr_obs: 0.07,
                wr_all: 0.08,
            },
            cell: CellSymmetry {
                lattice_parameters: [5.0, 5.0, 5.0, 90.0, 90.0, 90.0],
                space_group_symbol: "P1".to_string(),
                space_group_number: 1,
                centering: Centering::P,
                symmetry_operators: vec!["x,y,z".to_string()],
            },
            occ_frac: vec![1.0, 1.0],
        }
    }

    #[test]
    fn test_collect_warnings() {
        let warnings = collect_warnings(&sample_data());
        // Ru1: U11 = 0.2 超阈值，occ*frac = 1.2 > 1
        // O1: U11 = -0.05 < -3*0.01，occ = -0.5 < -3*0.1
        assert_eq!(warnings.len(), 4);
        assert!(warnings.iter().any(|w| w == "***1 Negative ADPs***"));
        assert!(warnings.iter().any(|w| w == "***1 Large ADPs***"));
        assert!(warnings.iter().any(|w| w == "***1 Negative Occupancies***"));
        assert!(warnings.iter().any(|w| w == "***1 Occupancies > 1***"));
    }

    #[test]
    fn test_collect_warnings_clean_data() {
        let mut data = sample_data();
        data.atoms.atoms[0].occupancy = 1.0;
        data.atoms.atoms[0].displacement_params[0] = 0.001;
        data.atoms.atoms[1].occupancy = 0.5;
        data.atoms.atoms[1].displacement_params[0] = 0.005;
        assert!(collect_warnings(&data).is_empty());
    }

    #[test]
    fn test_site_multiplicity() {
        let mut data = sample_data();
        data.cell.symmetry_operators = vec!["x,y,z".to_string(), "-x,-y,z".to_string()];
        data.occ_frac = vec![2.0, 1.0];
        assert_eq!(data.site_multiplicity(0), 1);
        assert_eq!(data.site_multiplicity(1), 2);
    }
}
