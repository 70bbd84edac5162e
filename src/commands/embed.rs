//! # embed 子命令实现
//!
//! 只执行结构解析步骤，将 XYZ 写到文件或 stdout。
//!
//! ## 依赖关系
//! - 使用 `cli/embed.rs` 定义的 EmbedArgs
//! - 使用 `handler::resolve_structure`

use crate::cli::embed::EmbedArgs;
use crate::error::{QcalcError, Result};
use crate::handler::resolve_structure;
use crate::models::InputSelection;
use crate::utils::{output, progress};

use std::fs;

/// 执行 embed 命令
pub fn execute(args: EmbedArgs) -> Result<()> {
    if let Some(ref path) = args.output {
        if path.exists() && !args.overwrite {
            return Err(QcalcError::InvalidArgument(format!(
                "'{}' already exists (use --overwrite to replace it)",
                path.display()
            )));
        }
    }

    let embedder = super::build_embedder(&args.tools);
    let input = InputSelection::Smiles(args.smiles.clone());

    let pb = progress::create_spinner(&format!("Embedding '{}' with {}", args.smiles, embedder.name()));
    let result = resolve_structure(embedder.as_ref(), &input);
    pb.finish_and_clear();
    let (xyz, molecule) = result?;

    match args.output {
        Some(path) => {
            fs::write(&path, &xyz).map_err(|e| QcalcError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            })?;
            output::print_success(&format!(
                "{} ({} atoms) written to '{}'",
                molecule.formula(),
                molecule.len(),
                path.display()
            ));
        }
        None => print!("{}", xyz),
    }

    Ok(())
}
