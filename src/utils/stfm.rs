//! # 不确定度标准格式化
//!
//! 将 (值, 不确定度) 对渲染为紧凑的科学记法字符串，
//! 如 `35.25 (1)`、`0.0015300 (5)`、`1.56(2)E+6`。
//!
//! ## 格式规则
//! - 不确定度为 0 或小于值的 0.001%：值取 5 位有效数字，标记 `(0)`
//! - 不确定度为 NaN：标记 `(-)`
//! - 其余情况由不确定度的数量级决定保留位数，
//!   数量级超出 [-3, 4) 时切换指数记法
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 无外部模块依赖

/// 由值和不确定度生成标准形式字符串
///
/// 输出与区域设置无关，确定性；合理物理量下不超过 13 字符。
pub fn stfm(val: f64, err: f64) -> String {
    // 误差可忽略：值取 5 位有效数字，误差记 (0)
    if err == 0.0 || val / err >= 1e5 {
        let out = format_g5(val);
        return match out.split_once('E') {
            Some((mantissa, exponent)) => format!("{}(0)E{}", mantissa, exponent),
            None => format!("{} (0)", out),
        };
    }

    // 误差未知（非零）
    if err.is_nan() {
        return format!("{} (-)", val);
    }

    // 由误差数量级确定有效位：
    // 误差 >1 时取整数位，<1 时取小数位（+0.025 稳定临界舍入）
    let log_err = err.abs().log10();
    let (sigfig, dec) = if log_err > 0.0 {
        (log_err.ceil() - 1.0, 0usize)
    } else {
        let s = (log_err + 0.025).floor();
        (s, (-s).max(0.0) as usize)
    };

    // 按该数量级舍入值和误差
    let scale = 10f64.powf(sigfig);
    let rval = (val / scale).round() * scale;
    let mut rerr = (err / scale).round() * scale;

    let pw = rval.abs().log10().floor();
    let pwr = rerr.abs().log10().floor();
    let max_pw = pw.max(pwr);
    let ln = ((max_pw - sigfig).max(0.0)) as usize;

    // 小误差的显示位数：缩放后单个数字
    if log_err < 0.0 {
        rerr = err / scale;
    }

    // 小数值：指数记法（无 '+' 号）
    if max_pw < -3.0 {
        let mantissa = rval / 10f64.powf(max_pw);
        return format!("{:.*}({:.0})E{:.0}", ln, mantissa, rerr, max_pw);
    }

    // 大数值：指数记法（带 '+' 号）
    if max_pw >= 4.0 {
        let mantissa = rval / 10f64.powf(max_pw);
        let err_digit = rerr / scale;
        return format!("{:.*}({:.0})E+{:.0}", ln, mantissa, err_digit, max_pw);
    }

    format!("{:.*} ({:.0})", dec, rval, rerr)
}

/// 5 位有效数字格式化（类似 printf %.5G，指数不补零）
fn format_g5(val: f64) -> String {
    if val == 0.0 {
        return "0".to_string();
    }

    let exp = val.abs().log10().floor() as i32;
    if exp < -4 || exp >= 5 {
        let mantissa = val / 10f64.powi(exp);
        let s = format!("{:.4}", mantissa);
        let s = s.trim_end_matches('0').trim_end_matches('.');
        format!("{}E{:+}", s, exp)
    } else {
        let decimals = (4 - exp).max(0) as usize;
        let s = format!("{:.*}", decimals, val);
        if s.contains('.') {
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            s
        }
    }
}
