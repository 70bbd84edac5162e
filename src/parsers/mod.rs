//! # 解析器模块
//!
//! 提供结构输入和 Psi4 输出的解析器。
//!
//! ## 依赖关系
//! - 被 `handler.rs`, `engine/` 和 `commands/` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: xyz, smiles, psi4_log, psi4_result

pub mod psi4_log;
pub mod psi4_result;
pub mod smiles;
pub mod xyz;

use crate::error::{QcalcError, Result};
use std::path::Path;

/// 检查上传的结构文件扩展名
pub fn ensure_xyz_extension(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    if ext == "xyz" {
        Ok(())
    } else {
        Err(QcalcError::UnsupportedFormat(format!(
            "Expected an .xyz file, got: {}",
            path.display()
        )))
    }
}
