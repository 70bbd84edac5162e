//! # XYZ 格式解析器
//!
//! ## XYZ 格式说明
//! ```text
//! 3
//! comment line
//! O   0.000000   0.000000   0.117300
//! H   0.000000   0.757200  -0.469200
//! H   0.000000  -0.757200  -0.469200
//! ```
//!
//! 原子列遵循 Psi4 的核标记写法：元素符号（可带 `_label` 或数字后缀）、
//! 1-3 位原子序数、`@He` / `Gh(He)` 鬼原子，以及 `@mass` 同位素质量。
//!
//! ## 依赖关系
//! - 被 `handler.rs` 用于校验上传文件与嵌入结果
//! - 使用 `models/molecule.rs`
//! - 使用 `regex`

use crate::error::{QcalcError, Result};
use crate::models::{Atom, Molecule};
use regex::Regex;

/// 从字符串内容解析 XYZ 格式
///
/// `source` 仅用于错误信息（文件路径或 "SMILES" 等）。
pub fn parse_xyz_content(content: &str, source: &str) -> Result<Molecule> {
    let parse_error = |reason: String| QcalcError::ParseError {
        format: "XYZ".to_string(),
        path: source.to_string(),
        reason,
    };

    let nucleus = Regex::new(
        r"(?i)^(?:@|Gh\()?(?:[A-Z]{1,3}(?:_\w+|\d+)?|\d{1,3})(?:@\d+(?:\.\d+)?)?\)?$",
    )
    .unwrap();

    let mut lines = content.lines();

    // 第一行：原子数
    let count_line = lines
        .next()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| QcalcError::EmptyStructure(source.to_string()))?;

    let natoms: usize = count_line
        .parse()
        .map_err(|_| parse_error(format!("invalid atom count line '{}'", count_line)))?;

    if natoms == 0 {
        return Err(QcalcError::EmptyStructure(source.to_string()));
    }

    // 第二行：注释（允许为空）
    let comment = lines.next().unwrap_or("").trim().to_string();

    let mut atoms = Vec::with_capacity(natoms);
    for (i, line) in lines.enumerate() {
        if atoms.len() == natoms {
            // 多余的非空行视为格式错误，空行忽略
            if line.trim().is_empty() {
                continue;
            }
            return Err(parse_error(format!(
                "found more atom lines than the declared {}",
                natoms
            )));
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(parse_error(format!(
                "line {}: expected 'symbol x y z', got '{}'",
                i + 3,
                line.trim()
            )));
        }

        let element = parts[0];
        let ghost_open = element
            .get(..3)
            .map(|p| p.eq_ignore_ascii_case("gh("))
            .unwrap_or(false);
        if !nucleus.is_match(element) || ghost_open != element.ends_with(')') {
            return Err(parse_error(format!(
                "line {}: invalid element symbol '{}'",
                i + 3,
                element
            )));
        }

        let mut position = [0.0; 3];
        for (k, value) in parts[1..4].iter().enumerate() {
            position[k] = value.parse().map_err(|_| {
                parse_error(format!("line {}: invalid coordinate '{}'", i + 3, value))
            })?;
        }

        atoms.push(Atom::new(element, position));
    }

    if atoms.len() < natoms {
        return Err(parse_error(format!(
            "declared {} atoms but found {}",
            natoms,
            atoms.len()
        )));
    }

    Ok(Molecule::new(comment, atoms))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: &str = "3
water
O   0.000000   0.000000   0.117300
H   0.000000   0.757200  -0.469200
H   0.000000  -0.757200  -0.469200
";

    #[test]
    fn test_parse_xyz_water() {
        let mol = parse_xyz_content(WATER, "water.xyz").unwrap();
        assert_eq!(mol.comment, "water");
        assert_eq!(mol.len(), 3);
        assert_eq!(mol.atoms[1].element, "H");
        assert!((mol.atoms[1].position[1] - 0.7572).abs() < 1e-9);
    }

    #[test]
    fn test_parse_xyz_rdkit_block_with_empty_comment() {
        // MolToXYZBlock 的注释行为空
        let content = "2\n\nH 0.0 0.0 0.0\nH 0.0 0.0 0.74\n";
        let mol = parse_xyz_content(content, "SMILES").unwrap();
        assert_eq!(mol.comment, "");
        assert_eq!(mol.formula(), "H2");
    }

    #[test]
    fn test_parse_xyz_empty_is_empty_structure() {
        assert!(matches!(
            parse_xyz_content("", "empty.xyz"),
            Err(QcalcError::EmptyStructure(_))
        ));
        assert!(matches!(
            parse_xyz_content("0\nnothing\n", "zero.xyz"),
            Err(QcalcError::EmptyStructure(_))
        ));
    }

    #[test]
    fn test_parse_xyz_truncated() {
        let content = "3\ntruncated\nO 0 0 0\nH 0 0 1\n";
        assert!(matches!(
            parse_xyz_content(content, "bad.xyz"),
            Err(QcalcError::ParseError { .. })
        ));
    }

    #[test]
    fn test_parse_xyz_bad_coordinate() {
        let content = "1\n\nC 0.0 abc 0.0\n";
        let err = parse_xyz_content(content, "bad.xyz").unwrap_err();
        assert!(err.to_string().contains("invalid coordinate"));
    }

    #[test]
    fn test_parse_xyz_bad_count() {
        let content = "three\n\nC 0 0 0\n";
        assert!(matches!(
            parse_xyz_content(content, "bad.xyz"),
            Err(QcalcError::ParseError { .. })
        ));
    }

    #[test]
    fn test_parse_xyz_accepts_psi4_nucleus_labels() {
        let content = "6\n\n2 0.0 0.0 0.0\n@He 0.0 0.0 3.0\nGh(He) 0.0 0.0 6.0\nH_a 0 0 9\nC1 0 0 12\nH@2.014 0 0 15\n";
        let mol = parse_xyz_content(content, "labels.xyz").unwrap();
        assert_eq!(mol.len(), 6);
        assert_eq!(mol.atoms[0].element, "2");
        assert_eq!(mol.atoms[2].element, "Gh(He)");
    }

    #[test]
    fn test_parse_xyz_rejects_malformed_nucleus_labels() {
        for label in ["1234", "Gh(He", "He)", "#C", "-1"] {
            let content = format!("1\n\n{} 0.0 0.0 0.0\n", label);
            let err = parse_xyz_content(&content, "bad.xyz").unwrap_err();
            assert!(err.to_string().contains("invalid element symbol"), "{label}");
        }
    }

    #[test]
    fn test_xyz_round_trip_through_molecule() {
        let mol = parse_xyz_content(WATER, "water.xyz").unwrap();
        let reparsed = parse_xyz_content(&mol.to_xyz_string(), "again").unwrap();
        assert_eq!(reparsed.len(), mol.len());
        assert_eq!(reparsed.formula(), "H2O");
    }
}
