//! # 计算请求处理
//!
//! 一次计算按固定顺序执行：
//! 1. 结构解析：SMILES → 嵌入程序，或 XYZ 文件原样透传
//! 2. 写入临时 .xyz 文件
//! 3. 为本次调用构造 `SolverConfig`（内存、日志文件）
//! 4. 按计算类型分派到 energy / optimize / frequency / orbitals
//! 5. 返回 `CalcOutcome`，由 `commands/calc.rs` 展示
//!
//! ## 依赖关系
//! - 被 `commands/calc.rs` 调用
//! - 使用 `engine/` 的 Embedder / Solver trait
//! - 使用 `parsers/xyz.rs`, `parsers/smiles.rs`

use crate::engine::{Embedder, Solver, SolverConfig, SolverJob};
use crate::error::{QcalcError, Result};
use crate::models::{CalcOutcome, CalcRequest, CalcType, Download, InputSelection, Method, Molecule};
use crate::parsers::{ensure_xyz_extension, smiles, xyz};

use std::io::Write;
use std::path::PathBuf;

/// B3LYP 振动计算的已知问题提示
pub const B3LYP_FREQUENCY_WARNING: &str =
    "Frequency calculations with B3LYP fail with a character encoding error; no calculation was run";

/// 请求处理的可配置项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerSettings {
    /// 求解器内存上限
    pub memory: String,
    /// 求解器工作目录
    pub work_dir: PathBuf,
    /// energy / optimize / frequency 的日志文件名
    pub output_file: String,
    /// orbitals 的日志文件名
    pub orbital_log: String,
    /// 轨道导出文件名
    pub fchk_file: String,
    /// optimize 下载文件名
    pub download_name: String,
    /// optimize 下载优化后的结构而不是输入结构
    pub download_optimized: bool,
    /// 临时文件目录，None 表示系统临时目录
    pub temp_dir: Option<PathBuf>,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        HandlerSettings {
            memory: "10GB".to_string(),
            work_dir: PathBuf::from("."),
            output_file: "psi4_output.dat".to_string(),
            orbital_log: "fchk.log".to_string(),
            fchk_file: "MO.fchk".to_string(),
            download_name: "optimized_struture.xyz".to_string(),
            download_optimized: false,
            temp_dir: None,
        }
    }
}

impl HandlerSettings {
    /// 为某一计算类型构造求解器配置
    pub fn solver_config(&self, calc_type: CalcType) -> SolverConfig {
        let log_file = match calc_type {
            CalcType::Orbitals => self.orbital_log.clone(),
            _ => self.output_file.clone(),
        };

        SolverConfig {
            memory: self.memory.clone(),
            work_dir: self.work_dir.clone(),
            log_file,
            fchk_file: self.fchk_file.clone(),
            ..Default::default()
        }
    }
}

/// 解析后的输入结构
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStructure {
    /// 传给求解器的 XYZ 文本
    pub xyz: String,
    /// 校验用的分子结构
    pub molecule: Molecule,
    /// 临时文件路径
    pub temp_path: PathBuf,
}

/// 一次请求的处理结果
#[derive(Debug, Clone, PartialEq)]
pub struct Handled {
    pub structure: ResolvedStructure,
    pub config: SolverConfig,
    pub outcome: CalcOutcome,
}

/// `--dry-run` 的结果
#[derive(Debug, Clone, PartialEq)]
pub enum Prepared {
    /// 已写出的输入文件
    Input(PathBuf),
    /// 该组合不会运行求解器，未写输入文件
    Skipped { warning: String },
}

/// 已知无法运行的组合，返回提示信息
fn skip_warning(request: &CalcRequest) -> Option<&'static str> {
    (request.calc_type == CalcType::Frequency && request.method == Method::B3lyp)
        .then_some(B3LYP_FREQUENCY_WARNING)
}

/// 请求处理器
pub struct RequestHandler<'a> {
    embedder: &'a dyn Embedder,
    solver: &'a dyn Solver,
    settings: &'a HandlerSettings,
}

impl<'a> RequestHandler<'a> {
    pub fn new(
        embedder: &'a dyn Embedder,
        solver: &'a dyn Solver,
        settings: &'a HandlerSettings,
    ) -> Self {
        RequestHandler {
            embedder,
            solver,
            settings,
        }
    }

    /// 执行完整的计算请求
    pub fn handle(&self, request: &CalcRequest, input: &InputSelection) -> Result<Handled> {
        let structure = self.resolve(input)?;
        let config = self.settings.solver_config(request.calc_type);
        let outcome = self.dispatch(request, &structure.xyz, &config)?;

        Ok(Handled {
            structure,
            config,
            outcome,
        })
    }

    /// 只生成求解器输入文件，不执行计算
    pub fn prepare(
        &self,
        request: &CalcRequest,
        input: &InputSelection,
    ) -> Result<(ResolvedStructure, Prepared)> {
        let structure = self.resolve(input)?;
        if let Some(warning) = skip_warning(request) {
            return Ok((
                structure,
                Prepared::Skipped {
                    warning: warning.to_string(),
                },
            ));
        }

        let config = self.settings.solver_config(request.calc_type);
        let job = SolverJob {
            task: request.calc_type,
            level: request.level_of_theory(),
            geometry: structure.xyz.clone(),
        };
        let input_path = self.solver.prepare(&job, &config)?;
        Ok((structure, Prepared::Input(input_path)))
    }

    /// 步骤 1 + 2：解析结构并写入临时文件
    pub fn resolve(&self, input: &InputSelection) -> Result<ResolvedStructure> {
        let (xyz, molecule) = resolve_structure(self.embedder, input)?;
        let temp_path = persist_temp(&xyz, self.settings.temp_dir.as_deref())?;

        Ok(ResolvedStructure {
            xyz,
            molecule,
            temp_path,
        })
    }

    /// 步骤 4：按计算类型分派
    fn dispatch(
        &self,
        request: &CalcRequest,
        xyz: &str,
        config: &SolverConfig,
    ) -> Result<CalcOutcome> {
        if let Some(warning) = skip_warning(request) {
            return Ok(CalcOutcome::Skipped {
                warning: warning.to_string(),
            });
        }

        let level = request.level_of_theory();
        let job = SolverJob {
            task: request.calc_type,
            level: level.clone(),
            geometry: xyz.to_string(),
        };

        let output = self.solver.run(&job, config)?;

        match request.calc_type {
            CalcType::Energy => {
                let hartree = output
                    .energy
                    .ok_or_else(|| QcalcError::MissingResult("energy".to_string()))?;
                Ok(CalcOutcome::Energy { hartree })
            }
            CalcType::Optimize => {
                let optimized = output.molecule(&format!("optimized at {}", level));

                let content = if self.settings.download_optimized {
                    optimized
                        .as_ref()
                        .map(|m| m.to_xyz_string())
                        .ok_or_else(|| QcalcError::MissingResult("optimized geometry".to_string()))?
                } else {
                    xyz.to_string()
                };

                Ok(CalcOutcome::Optimized {
                    download: Download {
                        file_name: self.settings.download_name.clone(),
                        content,
                    },
                    optimized,
                })
            }
            CalcType::Frequency => {
                let values = output
                    .frequencies
                    .ok_or_else(|| QcalcError::MissingResult("frequencies".to_string()))?;
                Ok(CalcOutcome::Frequencies { values })
            }
            CalcType::Orbitals => {
                let fchk = output
                    .fchk
                    .map(|name| config.work_dir.join(name))
                    .unwrap_or_else(|| config.fchk_path());
                Ok(CalcOutcome::Orbitals { fchk })
            }
        }
    }
}

/// 将输入选择解析为 XYZ 文本
///
/// SMILES 走嵌入程序；XYZ 文件只解码和校验，返回的文本与上传内容逐字节相同。
pub fn resolve_structure(
    embedder: &dyn Embedder,
    input: &InputSelection,
) -> Result<(String, Molecule)> {
    match input {
        InputSelection::Smiles(raw) => {
            let smiles = smiles::validate_smiles(raw)?;
            let text = embedder.embed(smiles)?;
            let molecule = xyz::parse_xyz_content(&text, &format!("{} output", embedder.name()))
                .map_err(|e| QcalcError::EmbeddingFailed {
                    smiles: smiles.to_string(),
                    reason: e.to_string(),
                })?;
            Ok((text, molecule))
        }
        InputSelection::XyzFile { path, bytes } => {
            ensure_xyz_extension(path)?;
            let text = String::from_utf8(bytes.clone()).map_err(|_| QcalcError::InvalidEncoding {
                path: path.display().to_string(),
            })?;
            let molecule = xyz::parse_xyz_content(&text, &path.display().to_string())?;
            Ok((text, molecule))
        }
    }
}

/// 写入临时 .xyz 文件并保留在磁盘上
fn persist_temp(xyz: &str, dir: Option<&std::path::Path>) -> Result<PathBuf> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("qcalc-").suffix(".xyz");

    let location = dir
        .map(|d| d.to_path_buf())
        .unwrap_or_else(std::env::temp_dir);
    let write_error = |source: std::io::Error| QcalcError::FileWriteError {
        path: location.display().to_string(),
        source,
    };

    let mut file = builder.tempfile_in(&location).map_err(write_error)?;
    file.write_all(xyz.as_bytes()).map_err(write_error)?;
    file.flush().map_err(write_error)?;

    let (_, path) = file.keep().map_err(|e| write_error(e.error))?;
    Ok(path)
}
