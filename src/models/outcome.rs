//! # 计算结果数据模型
//!
//! 每个计算分支产生一种结果，由 `commands/calc.rs` 负责展示。
//!
//! ## 依赖关系
//! - 由 `handler.rs` 生成
//! - 被 `commands/calc.rs` 渲染

use super::{Atom, Molecule};
use serde::Deserialize;
use std::path::PathBuf;

/// Hartree → kcal/mol 换算系数 (CODATA 2014，与 Psi4 一致)
pub const HARTREE_TO_KCAL_MOL: f64 = 627.509_474_063_055_8;

/// 求解器返回的原始数值结果
///
/// 由生成的 Psi4 输入脚本以 JSON 写出，字段随计算类型而不同。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SolverOutput {
    /// 最终能量 (Eh)
    #[serde(default)]
    pub energy: Option<f64>,

    /// 优化后结构，每个原子为 [symbol, x, y, z] (Å)
    #[serde(default)]
    pub geometry: Option<Vec<(String, f64, f64, f64)>>,

    /// 谐振频率 (cm⁻¹)，虚频为负值
    #[serde(default)]
    pub frequencies: Option<Vec<f64>>,

    /// 导出的 fchk 文件名
    #[serde(default)]
    pub fchk: Option<String>,
}

impl SolverOutput {
    /// 将返回的结构转换为分子
    pub fn molecule(&self, comment: &str) -> Option<Molecule> {
        self.geometry.as_ref().map(|atoms| {
            Molecule::new(
                comment,
                atoms
                    .iter()
                    .map(|(el, x, y, z)| Atom::new(el.as_str(), [*x, *y, *z]))
                    .collect(),
            )
        })
    }
}

/// 可下载的文件
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    /// 文件名
    pub file_name: String,
    /// 文件内容
    pub content: String,
}

/// 一次计算的结果
#[derive(Debug, Clone, PartialEq)]
pub enum CalcOutcome {
    /// 单点能
    Energy { hartree: f64 },

    /// 结构优化完成
    Optimized {
        /// 提供给用户的下载文件
        download: Download,
        /// 求解器返回的优化后结构
        optimized: Option<Molecule>,
    },

    /// 振动频率 (cm⁻¹)
    Frequencies { values: Vec<f64> },

    /// 分子轨道导出 (fchk)
    Orbitals { fchk: PathBuf },

    /// 分支被跳过（未调用求解器）
    Skipped { warning: String },
}

impl CalcOutcome {
    /// 能量结果的展示文本
    pub fn energy_message(hartree: f64) -> String {
        format!("Energy: {:.2} kcal/mol", hartree * HARTREE_TO_KCAL_MOL)
    }
}
