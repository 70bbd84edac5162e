//! # Psi4 输出日志解析器
//!
//! 扫描 Psi4 的输出文件 (psi4_output.dat / fchk.log)，判断计算是否正常结束，
//! 并提取失败原因（不收敛、基组缺失、方法不支持等）。
//!
//! ## 依赖关系
//! - 被 `engine/psi4.rs` 使用
//! - 使用 `regex`

use crate::error::{QcalcError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;

/// 日志扫描结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Psi4LogSummary {
    /// 出现 "Psi4 exiting successfully"
    pub is_finished: bool,

    /// 出现 "Psi4 encountered an error"
    pub has_error: bool,

    /// 是否为收敛失败
    pub not_converged: bool,

    /// 第一条错误信息
    pub error_message: Option<String>,

    /// 最后一次出现的 "Total Energy =" (Eh)
    pub last_total_energy: Option<f64>,
}

/// 解析 Psi4 输出文件
pub fn parse_psi4_log(path: &Path) -> Result<Psi4LogSummary> {
    let content = fs::read(path).map_err(|e| QcalcError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    // Psi4 偶尔会写出非 UTF-8 字节，这里宽松解码
    Ok(scan_psi4_log(&String::from_utf8_lossy(&content)))
}

/// 从字符串内容扫描 Psi4 日志
pub fn scan_psi4_log(content: &str) -> Psi4LogSummary {
    let exception =
        Regex::new(r"^\s*(?:[\w.]+\.)?([A-Za-z]+(?:Error|Exception))\s*:\s*(.*)$").unwrap();
    let fatal = Regex::new(r"Fatal Error:\s*(.*)$").unwrap();
    let total_energy = Regex::new(r"Total Energy\s*=\s*(-?\d+\.\d+)").unwrap();

    let mut summary = Psi4LogSummary::default();

    for line in content.lines() {
        if line.contains("Psi4 exiting successfully") {
            summary.is_finished = true;
        }

        if line.contains("Psi4 encountered an error") {
            summary.has_error = true;
        }

        if line.contains("Could not converge") || line.contains("ConvergenceError") {
            summary.not_converged = true;
        }

        if let Some(caps) = total_energy.captures(line) {
            if let Ok(e) = caps[1].parse::<f64>() {
                summary.last_total_energy = Some(e);
            }
        }

        if summary.error_message.is_some() {
            continue;
        }

        if let Some(caps) = fatal.captures(line) {
            summary.error_message = Some(caps[1].trim().to_string());
        } else if let Some(caps) = exception.captures(line) {
            let detail = caps[2].trim();
            summary.error_message = Some(if detail.is_empty() {
                caps[1].to_string()
            } else {
                format!("{}: {}", &caps[1], detail)
            });
        }
    }

    if summary.error_message.is_some() || summary.not_converged {
        summary.has_error = true;
    }

    summary
}
