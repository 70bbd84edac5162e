//! # Psi4 求解器
//!
//! 为每次计算生成一个 Psi4 输入脚本，在工作目录中运行
//! `psi4 -i <input> -o <log>`，然后读取脚本写出的 JSON 结果文件。
//!
//! ## 输入脚本结构
//! ```text
//! psi4.set_memory('10GB')
//! mol = psi4.geometry("""<xyz>""")
//! <calc-type specific driver calls>
//! json.dump(result, ...)
//! ```
//!
//! 内存与日志文件都通过 `SolverConfig` 在每次调用时传入。
//!
//! ## 依赖关系
//! - 被 `handler.rs` 通过 `Solver` trait 调用
//! - 使用 `engine/process.rs`, `parsers/psi4_log.rs`, `parsers/psi4_result.rs`

use super::process::run_command;
use super::{ensure_work_dir, Solver, SolverConfig, SolverJob};
use crate::error::{QcalcError, Result};
use crate::models::{CalcType, SolverOutput};
use crate::parsers::{psi4_log, psi4_result};

use std::fs;
use std::path::PathBuf;

/// Psi4 可执行程序封装
pub struct Psi4Solver {
    executable: String,
}

impl Psi4Solver {
    pub fn new(executable: impl Into<String>) -> Self {
        Psi4Solver {
            executable: executable.into(),
        }
    }

    /// 生成输入脚本
    pub fn input_script(job: &SolverJob, config: &SolverConfig) -> String {
        let level = py_quote(&job.level);
        let fchk = py_quote(&config.fchk_file);
        let mut script = String::new();

        script.push_str(&format!("# qcalc: {} {}\n", job.task, job.level));
        script.push_str("import json\n\n");
        script.push_str(&format!("psi4.set_memory({})\n\n", py_quote(&config.memory)));
        script.push_str(&format!(
            "mol = psi4.geometry(\"\"\"\n{}\n\"\"\")\n\n",
            escape_triple_quoted(job.geometry.trim_end())
        ));
        script.push_str(GEOMETRY_HELPER);
        script.push_str("result = {}\n");

        match job.task {
            CalcType::Energy => {
                script.push_str(&format!("energy = psi4.energy({}, molecule=mol)\n", level));
            }
            CalcType::Optimize => {
                script.push_str(&format!(
                    "energy = psi4.optimize({}, molecule=mol)\n",
                    level
                ));
                script.push_str("result['geometry'] = geometry_of(mol)\n");
            }
            CalcType::Frequency => {
                script.push_str("psi4.set_options({'normal_modes_write': True})\n");
                script.push_str(&format!("psi4.optimize({}, molecule=mol)\n", level));
                script.push_str(&format!(
                    "energy, wfn = psi4.frequency({}, molecule=mol, return_wfn=True)\n",
                    level
                ));
                script.push_str(
                    "result['frequencies'] = [float(f) for f in wfn.frequencies().to_array()]\n",
                );
            }
            CalcType::Orbitals => {
                script.push_str(&format!("psi4.optimize({}, molecule=mol)\n", level));
                script.push_str(&format!(
                    "energy, wfn = psi4.energy({}, molecule=mol, return_wfn=True)\n",
                    level
                ));
                script.push_str(&format!("psi4.fchk(wfn, {})\n", fchk));
                script.push_str(&format!("result['fchk'] = {}\n", fchk));
            }
        }

        script.push_str("result['energy'] = float(energy)\n\n");
        script.push_str(&format!(
            "with open({}, 'w') as handle:\n    json.dump(result, handle)\n",
            py_quote(&config.result_file)
        ));

        script
    }

    /// 计算失败时根据日志生成错误
    fn failure(&self, job: &SolverJob, config: &SolverConfig, stderr: &str) -> QcalcError {
        let log_path = config.log_path();
        let summary = psi4_log::parse_psi4_log(&log_path).unwrap_or_default();

        let mut message = summary
            .error_message
            .clone()
            .or_else(|| {
                let tail = stderr.trim();
                (!tail.is_empty()).then(|| tail.to_string())
            })
            .unwrap_or_else(|| {
                if summary.is_finished && !summary.has_error {
                    format!("{} finished but wrote no results", self.executable)
                } else {
                    format!("{} exited without writing results", self.executable)
                }
            });

        if let Some(e) = summary.last_total_energy {
            message.push_str(&format!("\nLast total energy in log: {:.10} Eh", e));
        }

        if summary.not_converged {
            QcalcError::SolverNotConverged {
                level: job.level.clone(),
                log: log_path.display().to_string(),
                message,
            }
        } else {
            QcalcError::SolverFailed {
                level: job.level.clone(),
                log: log_path.display().to_string(),
                message,
            }
        }
    }
}

/// 优化后结构以 [symbol, x, y, z] (Å) 列表写入结果
const GEOMETRY_HELPER: &str = r#"def geometry_of(molecule):
    coords = molecule.geometry().np * psi4.constants.bohr2angstroms
    return [[molecule.symbol(i).capitalize()] + [float(v) for v in coords[i]]
            for i in range(molecule.natom())]

"#;

/// 转义 Python 三引号字符串中的特殊序列
fn escape_triple_quoted(text: &str) -> String {
    text.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"")
}

/// 生成单引号 Python 字符串字面量
fn py_quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for c in text.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

impl Solver for Psi4Solver {
    fn name(&self) -> &str {
        "Psi4"
    }

    fn prepare(&self, job: &SolverJob, config: &SolverConfig) -> Result<PathBuf> {
        ensure_work_dir(&config.work_dir)?;

        let input_path = config.input_path();
        fs::write(&input_path, Self::input_script(job, config)).map_err(|e| {
            QcalcError::FileWriteError {
                path: input_path.display().to_string(),
                source: e,
            }
        })?;

        Ok(input_path)
    }

    fn run(&self, job: &SolverJob, config: &SolverConfig) -> Result<SolverOutput> {
        self.prepare(job, config)?;

        // 上一次运行留下的结果文件不能被误读
        let result_path = config.result_path();
        if result_path.exists() {
            fs::remove_file(&result_path).map_err(|e| QcalcError::FileWriteError {
                path: result_path.display().to_string(),
                source: e,
            })?;
        }

        let output = run_command(
            &self.executable,
            &["-i", &config.input_file, "-o", &config.log_file],
            Some(&config.work_dir),
        )?;

        if !output.success || !result_path.exists() {
            return Err(self.failure(job, config, &output.stderr_tail(5)));
        }

        psi4_result::parse_result_file(&result_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: &str = "3\nwater\nO 0.0 0.0 0.1173\nH 0.0 0.7572 -0.4692\nH 0.0 -0.7572 -0.4692\n";

    fn job(task: CalcType) -> SolverJob {
        SolverJob {
            task,
            level: "hf/sto-3g".to_string(),
            geometry: WATER.to_string(),
        }
    }

    #[test]
    fn test_energy_script() {
        let script = Psi4Solver::input_script(&job(CalcType::Energy), &SolverConfig::default());
        assert!(script.contains("psi4.set_memory('10GB')"));
        assert!(script.contains("energy = psi4.energy('hf/sto-3g', molecule=mol)"));
        assert!(script.contains("O 0.0 0.0 0.1173"));
        assert!(script.contains("open('qcalc_result.json', 'w')"));
        assert!(!script.contains("normal_modes_write"));
        assert!(!script.contains("psi4.optimize"));
    }

    #[test]
    fn test_geometry_embedded_verbatim() {
        let script = Psi4Solver::input_script(&job(CalcType::Energy), &SolverConfig::default());
        assert!(script.contains(&format!("\"\"\"\n{}\n\"\"\"", WATER.trim_end())));
    }

    #[test]
    fn test_frequency_script_enables_normal_modes() {
        let script = Psi4Solver::input_script(&job(CalcType::Frequency), &SolverConfig::default());
        let modes = script.find("normal_modes_write").unwrap();
        let opt = script.find("psi4.optimize").unwrap();
        let freq = script.find("psi4.frequency").unwrap();
        assert!(modes < opt && opt < freq);
        assert!(script.contains("wfn.frequencies().to_array()"));
    }

    #[test]
    fn test_orbitals_script_exports_fchk() {
        let config = SolverConfig {
            fchk_file: "orbitals.fchk".to_string(),
            ..Default::default()
        };
        let script = Psi4Solver::input_script(&job(CalcType::Orbitals), &config);
        assert!(script.contains("return_wfn=True"));
        assert!(script.contains("psi4.fchk(wfn, 'orbitals.fchk')"));
    }

    #[test]
    fn test_optimize_script_reports_geometry() {
        let script = Psi4Solver::input_script(&job(CalcType::Optimize), &SolverConfig::default());
        assert!(script.contains("result['geometry'] = geometry_of(mol)"));
    }

    #[test]
    fn test_memory_comes_from_config() {
        let config = SolverConfig {
            memory: "2 GB".to_string(),
            ..Default::default()
        };
        let script = Psi4Solver::input_script(&job(CalcType::Energy), &config);
        assert!(script.contains("psi4.set_memory('2 GB')"));
    }

    #[test]
    fn test_escape_triple_quoted() {
        assert_eq!(escape_triple_quoted(r"a\b"), r"a\\b");
        assert_eq!(escape_triple_quoted(r#"x"""y"#), r#"x\"\"\"y"#);
    }

    #[test]
    fn test_py_quote_escapes_quotes_and_backslashes() {
        assert_eq!(py_quote("MO.fchk"), "'MO.fchk'");
        assert_eq!(py_quote("a'b.fchk"), r"'a\'b.fchk'");
        assert_eq!(py_quote(r"dir\x.json"), r"'dir\\x.json'");
        assert_eq!(py_quote("a\nb"), r"'a\nb'");
    }

    #[test]
    fn test_file_names_with_quotes_stay_inside_literals() {
        let config = SolverConfig {
            fchk_file: "a'b.fchk".to_string(),
            result_file: "it's.json".to_string(),
            ..Default::default()
        };
        let script = Psi4Solver::input_script(&job(CalcType::Orbitals), &config);
        assert!(script.contains(r"psi4.fchk(wfn, 'a\'b.fchk')"));
        assert!(script.contains(r"result['fchk'] = 'a\'b.fchk'"));
        assert!(script.contains(r"with open('it\'s.json', 'w')"));
        assert!(!script.contains("'a'b.fchk'"));
    }

    #[test]
    fn test_prepare_writes_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = SolverConfig {
            work_dir: dir.path().join("run"),
            ..Default::default()
        };
        let path = Psi4Solver::new("psi4")
            .prepare(&job(CalcType::Energy), &config)
            .unwrap();
        assert_eq!(path, config.input_path());
        assert!(fs::read_to_string(path).unwrap().contains("psi4.energy"));
    }

    #[test]
    fn test_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        let config = SolverConfig {
            work_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let err = Psi4Solver::new("qcalc-no-such-psi4")
            .run(&job(CalcType::Energy), &config)
            .unwrap_err();
        assert!(matches!(err, QcalcError::CommandNotFound { .. }));
    }

    #[cfg(unix)]
    fn fake_psi4(dir: &std::path::Path, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-psi4");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    #[cfg(unix)]
    #[test]
    fn test_run_reads_result_file() {
        let dir = tempfile::tempdir().unwrap();
        // $4 是日志文件名
        let exe = fake_psi4(
            dir.path(),
            r#"echo '*** Psi4 exiting successfully.' > "$4"
echo '{"energy": -74.96}' > qcalc_result.json"#,
        );
        let config = SolverConfig {
            work_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let out = Psi4Solver::new(exe)
            .run(&job(CalcType::Energy), &config)
            .unwrap();
        assert_eq!(out.energy, Some(-74.96));
        assert!(config.log_path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_stale_result_is_not_reused() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("qcalc_result.json"), r#"{"energy": -1.0}"#).unwrap();
        let exe = fake_psi4(
            dir.path(),
            r#"echo 'ValidationError: Unable to find basis set' > "$4"
exit 1"#,
        );
        let config = SolverConfig {
            work_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let err = Psi4Solver::new(exe)
            .run(&job(CalcType::Energy), &config)
            .unwrap_err();
        match err {
            QcalcError::SolverFailed { message, level, .. } => {
                assert_eq!(level, "hf/sto-3g");
                assert!(message.contains("Unable to find basis set"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_not_converged_maps_to_named_error() {
        let dir = tempfile::tempdir().unwrap();
        let exe = fake_psi4(
            dir.path(),
            r#"echo 'PsiException: Could not converge SCF iterations in 100 iterations.' > "$4"
exit 1"#,
        );
        let config = SolverConfig {
            work_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let err = Psi4Solver::new(exe)
            .run(&job(CalcType::Energy), &config)
            .unwrap_err();
        assert!(matches!(err, QcalcError::SolverNotConverged { .. }));
    }
}
