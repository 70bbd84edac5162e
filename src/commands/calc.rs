//! # calc 子命令实现
//!
//! 组装输入与配置，交给 `RequestHandler` 执行，再按结果类型输出。
//!
//! ## 输出
//! - energy: 能量 (kcal/mol)
//! - optimize: 完成提示 + 结构文件下载
//! - frequency: 频率数组、表格和汇总，可选 CSV / stick 图
//! - orbitals: fchk 文件位置
//!
//! ## 依赖关系
//! - 使用 `cli/calc.rs` 定义的 CalcArgs
//! - 使用 `handler.rs`, `engine/`, `vib/`

use crate::cli::calc::CalcArgs;
use crate::engine::{Psi4Solver, Solver};
use crate::error::{QcalcError, Result};
use crate::handler::{Handled, HandlerSettings, Prepared, RequestHandler};
use crate::models::{CalcOutcome, CalcRequest, Download, InputSelection};
use crate::utils::{output, progress};
use crate::vib::{self, FrequencySet};

use std::fs;
use std::path::Path;
use tabled::{Table, Tabled};

/// 频率表格行
#[derive(Debug, Clone, Tabled)]
struct FrequencyRow {
    #[tabled(rename = "Mode")]
    mode: usize,
    #[tabled(rename = "Frequency (cm⁻¹)")]
    frequency: String,
    #[tabled(rename = "Type")]
    kind: &'static str,
}

/// 执行 calc 命令
pub fn execute(args: CalcArgs) -> Result<()> {
    output::print_header("Quantum Chemistry Calculation");

    let input = read_input(&args)?;
    let request = CalcRequest::new(args.calc_type, args.method, args.basis);
    let settings = settings_from_args(&args);

    output::print_info(&format!(
        "Input: {} | Task: {} | Level: {}",
        input.mode(),
        request.calc_type,
        request.level_of_theory()
    ));

    let embedder = super::build_embedder(&args.tools);
    let solver = Psi4Solver::new(args.psi4.as_str());
    let handler = RequestHandler::new(embedder.as_ref(), &solver, &settings);

    if args.dry_run {
        let (structure, prepared) = handler.prepare(&request, &input)?;
        output::print_info(&format!(
            "Structure: {} ({} atoms), saved to '{}'",
            structure.molecule.formula(),
            structure.molecule.len(),
            structure.temp_path.display()
        ));
        match prepared {
            Prepared::Input(path) => {
                output::print_done(&format!("Psi4 input written to '{}'", path.display()));
            }
            Prepared::Skipped { warning } => output::print_warning(&warning),
        }
        return Ok(());
    }

    let pb = progress::create_spinner(&format!(
        "Running {} {} calculation ({})...",
        solver.name(),
        request.calc_type,
        request.level_of_theory()
    ));
    let result = handler.handle(&request, &input);
    pb.finish_and_clear();
    let handled = result?;

    report(&args, &handled)
}

/// 读取结构输入
fn read_input(args: &CalcArgs) -> Result<InputSelection> {
    if let Some(ref smiles) = args.smiles {
        return Ok(InputSelection::Smiles(smiles.clone()));
    }

    let path = args
        .xyz
        .as_ref()
        .ok_or_else(|| QcalcError::InvalidArgument("Either --smiles or --xyz is required".to_string()))?;

    if !path.exists() {
        return Err(QcalcError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let bytes = fs::read(path).map_err(|e| QcalcError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(InputSelection::XyzFile {
        path: path.clone(),
        bytes,
    })
}

/// 从命令行参数构造处理配置
fn settings_from_args(args: &CalcArgs) -> HandlerSettings {
    HandlerSettings {
        memory: args.memory.clone(),
        work_dir: args.workdir.clone(),
        output_file: args.output_file.clone(),
        orbital_log: args.orbital_log.clone(),
        fchk_file: args.fchk.clone(),
        download_name: args.download.clone(),
        download_optimized: args.download_optimized,
        temp_dir: None,
    }
}

/// 输出计算结果
fn report(args: &CalcArgs, handled: &Handled) -> Result<()> {
    output::print_info(&format!(
        "Structure: {} ({} atoms), saved to '{}'",
        handled.structure.molecule.formula(),
        handled.structure.molecule.len(),
        handled.structure.temp_path.display()
    ));

    match &handled.outcome {
        CalcOutcome::Energy { hartree } => {
            output::print_success(&CalcOutcome::energy_message(*hartree));
        }
        CalcOutcome::Optimized {
            download,
            optimized,
        } => {
            output::print_success("Optimization finished!");
            if let Some(mol) = optimized {
                output::print_info(&format!("Optimized structure: {} atoms", mol.len()));
            }
            let path = write_download(download, &handled.config.work_dir)?;
            output::print_done(&format!("Structure saved to '{}'", path.display()));
        }
        CalcOutcome::Frequencies { values } => {
            report_frequencies(args, values)?;
        }
        CalcOutcome::Orbitals { fchk } => {
            output::print_done("Calculation finished");
            output::print_info(&format!(
                "Open '{}' in Avogadro or another orbital viewer",
                fchk.display()
            ));
        }
        CalcOutcome::Skipped { warning } => {
            output::print_warning(warning);
        }
    }

    Ok(())
}

/// 写出下载文件
fn write_download(download: &Download, dir: &Path) -> Result<std::path::PathBuf> {
    let path = dir.join(&download.file_name);
    fs::write(&path, download.content.as_bytes()).map_err(|e| QcalcError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(path)
}

/// 输出频率结果
fn report_frequencies(args: &CalcArgs, values: &[f64]) -> Result<()> {
    let set = FrequencySet::from_raw(values);

    println!("{}", set.display_array());

    if !set.is_empty() {
        let rows: Vec<FrequencyRow> = set
            .modes
            .iter()
            .map(|m| FrequencyRow {
                mode: m.index,
                frequency: if m.imaginary {
                    format!("{:.2}i", m.wavenumber)
                } else {
                    format!("{:.2}", m.wavenumber)
                },
                kind: if m.imaginary { "imaginary" } else { "real" },
            })
            .collect();
        println!("{}", Table::new(&rows));
    }

    output::print_separator();
    output::print_info(&format!(
        "{} modes, {} imaginary",
        set.len(),
        set.imaginary_count()
    ));
    if let Some((low, high)) = set.real_range() {
        output::print_info(&format!(
            "Real modes span {:.2} - {:.2} cm⁻¹",
            low, high
        ));
    }
    if set.imaginary_count() > 0 {
        output::print_warning("Imaginary modes found: the structure is not a minimum");
    }

    output::print_done("Calculation finished");
    output::print_info(
        "To load the normal modes in Avogadro, change the file extension to '.molden'",
    );

    if let Some(ref path) = args.freq_csv {
        vib::export::to_csv(&set, path)?;
        output::print_success(&format!("Frequencies saved to '{}'", path.display()));
    }

    if let Some(ref path) = args.plot {
        let title = format!("Vibrational Frequencies ({}/{})", args.method, args.basis);
        vib::plot::generate_frequency_plot(&set, path, &title, args.plot_width, args.plot_height)?;
        output::print_success(&format!("Frequency plot saved to '{}'", path.display()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn parse(extra: &[&str]) -> CalcArgs {
        let mut argv = vec![
            "qcalc",
            "calc",
            "--calc-type",
            "optimize",
            "--method",
            "hf",
            "--basis",
            "sto-3g",
        ];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Calc(args) => args,
            _ => panic!("expected calc"),
        }
    }

    #[test]
    fn test_settings_from_args_defaults_match_handler_defaults() {
        let args = parse(&["--smiles", "C", "--memory", "10GB", "--workdir", "."]);
        assert_eq!(settings_from_args(&args), HandlerSettings::default());
    }

    #[test]
    fn test_settings_from_args_overrides() {
        let args = parse(&[
            "--smiles",
            "C",
            "--memory",
            "2GB",
            "--workdir",
            "/tmp/qc",
            "--download",
            "opt.xyz",
            "--download-optimized",
        ]);
        let settings = settings_from_args(&args);
        assert_eq!(settings.memory, "2GB");
        assert_eq!(settings.work_dir, Path::new("/tmp/qc"));
        assert_eq!(settings.download_name, "opt.xyz");
        assert!(settings.download_optimized);
    }

    #[test]
    fn test_read_input_missing_file() {
        let args = parse(&["--xyz", "/nonexistent/water.xyz"]);
        assert!(matches!(
            read_input(&args),
            Err(QcalcError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_read_input_file_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("h2.xyz");
        fs::write(&path, "2\n\nH 0 0 0\nH 0 0 0.74\n").unwrap();

        let path_arg = path.display().to_string();
        let args = parse(&["--xyz", path_arg.as_str()]);
        match read_input(&args).unwrap() {
            InputSelection::XyzFile { bytes, .. } => {
                assert_eq!(bytes, b"2\n\nH 0 0 0\nH 0 0 0.74\n".to_vec());
            }
            other => panic!("unexpected input: {other:?}"),
        }
    }

    #[test]
    fn test_write_download_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let download = Download {
            file_name: "optimized_struture.xyz".to_string(),
            content: "1\n\nHe 0.0 0.0 0.0\n".to_string(),
        };
        let path = write_download(&download, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("optimized_struture.xyz"));
        assert_eq!(fs::read_to_string(path).unwrap(), download.content);
    }
}
