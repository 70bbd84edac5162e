//! # SMILES → 3D 结构生成
//!
//! - `RdkitEmbedder`: 通过 Python 调用 RDKit
//!   (MolFromSmiles → AddHs → EmbedMolecule → UFFOptimizeMolecule → MolToXYZBlock)
//! - `ObabelEmbedder`: 调用 Open Babel 的 `--gen3d`
//!
//! ## 依赖关系
//! - 被 `handler.rs` 与 `commands/embed.rs` 通过 `Embedder` trait 调用
//! - 使用 `engine/process.rs`

use super::process::run_command;
use super::Embedder;
use crate::error::{QcalcError, Result};

/// RDKit 脚本：SMILES 由 argv[1] 传入，XYZ 写到 stdout
const RDKIT_SCRIPT: &str = r#"import sys
from rdkit import Chem
from rdkit.Chem import AllChem

mol = Chem.MolFromSmiles(sys.argv[1])
if mol is None:
    sys.stderr.write("RDKit could not parse the SMILES string\n")
    sys.exit(2)
mol = Chem.AddHs(mol)
if AllChem.EmbedMolecule(mol) != 0:
    sys.stderr.write("RDKit could not generate 3D coordinates\n")
    sys.exit(3)
AllChem.UFFOptimizeMolecule(mol)
sys.stdout.write(Chem.MolToXYZBlock(mol))
"#;

/// RDKit 嵌入器
pub struct RdkitEmbedder {
    python: String,
}

impl RdkitEmbedder {
    pub fn new(python: impl Into<String>) -> Self {
        RdkitEmbedder {
            python: python.into(),
        }
    }
}

impl Embedder for RdkitEmbedder {
    fn name(&self) -> &str {
        "RDKit"
    }

    fn embed(&self, smiles: &str) -> Result<String> {
        let output = run_command(&self.python, &["-c", RDKIT_SCRIPT, smiles], None)?;

        match output.code {
            Some(0) => Ok(output.stdout),
            Some(2) => Err(QcalcError::InvalidSmiles {
                smiles: smiles.to_string(),
                reason: output.stderr_tail(1),
            }),
            Some(3) => Err(QcalcError::EmbeddingFailed {
                smiles: smiles.to_string(),
                reason: output.stderr_tail(1),
            }),
            _ => Err(QcalcError::CommandFailed {
                command: format!("{} (RDKit)", self.python),
                stderr: output.stderr_tail(10),
            }),
        }
    }
}

/// Open Babel 嵌入器
pub struct ObabelEmbedder {
    obabel: String,
}

impl ObabelEmbedder {
    pub fn new(obabel: impl Into<String>) -> Self {
        ObabelEmbedder {
            obabel: obabel.into(),
        }
    }
}

impl Embedder for ObabelEmbedder {
    fn name(&self) -> &str {
        "Open Babel"
    }

    fn embed(&self, smiles: &str) -> Result<String> {
        let input = format!("-:{}", smiles);
        let output = run_command(
            &self.obabel,
            &[input.as_str(), "-oxyz", "--gen3d", "-h", "--minimize", "--ff", "UFF"],
            None,
        )?;

        if !output.success {
            return Err(QcalcError::CommandFailed {
                command: self.obabel.clone(),
                stderr: output.stderr_tail(10),
            });
        }

        // 解析失败时 obabel 仍返回 0，但只输出 "0 molecules converted"
        if output.stdout.trim().is_empty() {
            return Err(QcalcError::InvalidSmiles {
                smiles: smiles.to_string(),
                reason: output.stderr_tail(2),
            });
        }

        Ok(output.stdout)
    }
}
