//! # 振动频率导出
//!
//! 导出频率列表为 CSV：`mode,frequency_cm-1,imaginary`
//!
//! ## 依赖关系
//! - 被 `commands/calc.rs` 调用
//! - 使用 `csv` 库写入 CSV 文件

use super::FrequencySet;
use crate::error::{QcalcError, Result};

use std::path::Path;

/// 导出频率为 CSV 格式
pub fn to_csv(set: &FrequencySet, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["mode", "frequency_cm-1", "imaginary"])?;

    for mode in &set.modes {
        wtr.write_record(&[
            mode.index.to_string(),
            format!("{:.4}", mode.wavenumber),
            mode.imaginary.to_string(),
        ])?;
    }

    wtr.flush().map_err(|e| QcalcError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
