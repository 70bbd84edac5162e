//! # 求解器结果文件解析器
//!
//! 生成的 Psi4 输入脚本在计算结束时写出 `qcalc_result.json`：
//!
//! ```text
//! {"energy": -76.02, "geometry": [["O", 0.0, 0.0, 0.12], ...],
//!  "frequencies": [1775.6, 4113.4, 4212.2], "fchk": "MO.fchk"}
//! ```
//!
//! ## 依赖关系
//! - 被 `engine/psi4.rs` 使用
//! - 使用 `serde_json`, `models/outcome.rs`

use crate::error::{QcalcError, Result};
use crate::models::SolverOutput;
use std::fs;
use std::path::Path;

/// 读取并解析结果文件
pub fn parse_result_file(path: &Path) -> Result<SolverOutput> {
    let content = fs::read_to_string(path).map_err(|e| QcalcError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_result_content(&content, &path.display().to_string())
}

/// 从字符串内容解析结果
pub fn parse_result_content(content: &str, source: &str) -> Result<SolverOutput> {
    serde_json::from_str(content).map_err(|e| QcalcError::ParseError {
        format: "solver result".to_string(),
        path: source.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_energy_only() {
        let out = parse_result_content(r#"{"energy": -1.117}"#, "r.json").unwrap();
        assert_eq!(out.energy, Some(-1.117));
        assert!(out.geometry.is_none());
        assert!(out.frequencies.is_none());
    }

    #[test]
    fn test_parse_full_result() {
        let json = r#"{
            "energy": -76.0266327341,
            "geometry": [["O", 0.0, 0.0, 0.1173], ["H", 0.0, 0.7572, -0.4692], ["H", 0.0, -0.7572, -0.4692]],
            "frequencies": [1775.65, 4113.38, 4212.18],
            "fchk": "MO.fchk"
        }"#;
        let out = parse_result_content(json, "r.json").unwrap();
        assert_eq!(out.frequencies.as_ref().unwrap().len(), 3);
        assert_eq!(out.fchk.as_deref(), Some("MO.fchk"));
        assert_eq!(out.molecule("").unwrap().formula(), "H2O");
    }

    #[test]
    fn test_parse_garbage_is_parse_error() {
        assert!(matches!(
            parse_result_content("not json", "r.json"),
            Err(QcalcError::ParseError { .. })
        ));
    }

    #[test]
    fn test_parse_result_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qcalc_result.json");
        fs::write(&path, r#"{"energy": -0.5, "frequencies": [-120.5, 300.0]}"#).unwrap();

        let out = parse_result_file(&path).unwrap();
        assert_eq!(out.frequencies, Some(vec![-120.5, 300.0]));
    }
}
