//! # 外部计算程序接口
//!
//! 结构嵌入（SMILES → 3D）与量子化学计算都委托给外部程序。
//! 这里定义两者的统一接口，具体实现见子模块。
//!
//! ## 依赖关系
//! - 被 `handler.rs` 和 `commands/` 使用
//! - 子模块: embed (RDKit / Open Babel), psi4, process

pub mod embed;
pub mod process;
pub mod psi4;

pub use embed::{ObabelEmbedder, RdkitEmbedder};
pub use psi4::Psi4Solver;

use crate::error::Result;
use crate::models::{CalcType, SolverOutput};
use std::path::{Path, PathBuf};

/// SMILES → XYZ 结构生成器
pub trait Embedder {
    /// 程序名（用于提示信息）
    fn name(&self) -> &str;

    /// 加氢、嵌入三维坐标并力场预优化，返回 XYZ 文本
    fn embed(&self, smiles: &str) -> Result<String>;
}

/// 单次求解器调用的配置
///
/// 每次调用显式传入，不修改任何进程级状态。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// 内存上限，例如 "10GB"
    pub memory: String,
    /// 工作目录（所有文件名相对于此目录）
    pub work_dir: PathBuf,
    /// 输入脚本文件名
    pub input_file: String,
    /// 求解器日志文件名
    pub log_file: String,
    /// 结果 JSON 文件名
    pub result_file: String,
    /// 轨道导出文件名
    pub fchk_file: String,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            memory: "10GB".to_string(),
            work_dir: PathBuf::from("."),
            input_file: "qcalc_input.dat".to_string(),
            log_file: "psi4_output.dat".to_string(),
            result_file: "qcalc_result.json".to_string(),
            fchk_file: "MO.fchk".to_string(),
        }
    }
}

impl SolverConfig {
    pub fn input_path(&self) -> PathBuf {
        self.work_dir.join(&self.input_file)
    }

    pub fn log_path(&self) -> PathBuf {
        self.work_dir.join(&self.log_file)
    }

    pub fn result_path(&self) -> PathBuf {
        self.work_dir.join(&self.result_file)
    }

    pub fn fchk_path(&self) -> PathBuf {
        self.work_dir.join(&self.fchk_file)
    }
}

/// 单次求解任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverJob {
    /// 计算类型
    pub task: CalcType,
    /// "method/basis" 描述串
    pub level: String,
    /// XYZ 结构文本
    pub geometry: String,
}

/// 量子化学求解器
pub trait Solver {
    /// 程序名（用于提示信息）
    fn name(&self) -> &str;

    /// 只写出输入文件，不执行计算
    fn prepare(&self, job: &SolverJob, config: &SolverConfig) -> Result<PathBuf>;

    /// 执行计算并返回结果
    fn run(&self, job: &SolverJob, config: &SolverConfig) -> Result<SolverOutput>;
}

/// 确保工作目录存在
pub(crate) fn ensure_work_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| crate::error::QcalcError::FileWriteError {
        path: dir.display().to_string(),
        source: e,
    })
}
