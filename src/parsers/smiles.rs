//! # SMILES 预校验
//!
//! 在调用外部嵌入程序之前做语法层面的检查，
//! 保证明显错误的输入以 `InvalidSmiles` 报出，而不是在下游以含糊的错误失败。
//!
//! 只检查语法（原子符号、括号、环闭合标记），不检查化合价等化学合理性，
//! 后者由嵌入程序负责。第一个空白之后的内容（分子名、CXSMILES 扩展）
//! 不做检查，原样交给嵌入程序。
//!
//! ## 依赖关系
//! - 被 `handler.rs` 与 `commands/embed.rs` 使用
//! - 无外部模块依赖

use crate::error::{QcalcError, Result};
use std::collections::HashSet;

/// 有机子集中允许出现在方括号外的原子
const ORGANIC_SUBSET: [&str; 16] = [
    "Cl", "Br", "B", "C", "N", "O", "P", "S", "F", "I", "b", "c", "n", "o", "p", "s",
];

/// 校验 SMILES 字符串，返回去除首尾空白后的完整文本
pub fn validate_smiles(smiles: &str) -> Result<&str> {
    let text = smiles.trim();
    let invalid = |reason: String| QcalcError::InvalidSmiles {
        smiles: text.to_string(),
        reason,
    };

    if text.is_empty() {
        return Err(invalid("empty string".to_string()));
    }

    let token = text.split_whitespace().next().unwrap_or("");
    let chars: Vec<char> = token.chars().collect();
    let mut i = 0;
    let mut depth = 0usize;
    let mut seen_atom = false;
    let mut open_rings: HashSet<u32> = HashSet::new();

    while i < chars.len() {
        let c = chars[i];
        match c {
            '[' => {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&ch| ch == ']' || ch == '[')
                    .map(|p| p + i + 1);
                match close {
                    Some(j) if chars[j] == ']' => {
                        if !chars[i + 1..j].iter().any(|ch| ch.is_ascii_alphabetic() || *ch == '*') {
                            return Err(invalid(format!("empty bracket atom at position {}", i)));
                        }
                        seen_atom = true;
                        i = j + 1;
                        continue;
                    }
                    _ => return Err(invalid(format!("unclosed '[' at position {}", i))),
                }
            }
            ']' => return Err(invalid(format!("unexpected ']' at position {}", i))),
            '(' => {
                if !seen_atom {
                    return Err(invalid("branch opened before any atom".to_string()));
                }
                depth += 1;
            }
            ')' => {
                if depth == 0 {
                    return Err(invalid(format!("unmatched ')' at position {}", i)));
                }
                depth -= 1;
            }
            '0'..='9' => {
                toggle_ring(&mut open_rings, c.to_digit(10).unwrap_or(0));
            }
            '%' => {
                let digits: String = chars[i + 1..].iter().take(2).collect();
                if digits.len() != 2 || !digits.chars().all(|d| d.is_ascii_digit()) {
                    return Err(invalid(format!(
                        "'%' must be followed by two digits at position {}",
                        i
                    )));
                }
                toggle_ring(&mut open_rings, digits.parse::<u32>().unwrap_or(0) + 100);
                i += 3;
                continue;
            }
            '-' | '=' | '#' | '$' | ':' | '/' | '\\' | '.' => {}
            '*' => seen_atom = true,
            c if c.is_ascii_alphabetic() => {
                // 两字母原子优先匹配
                let two: String = chars[i..].iter().take(2).collect();
                let one = c.to_string();
                if two.chars().count() == 2 && ORGANIC_SUBSET.contains(&two.as_str()) {
                    seen_atom = true;
                    i += 2;
                    continue;
                }
                if !ORGANIC_SUBSET.contains(&one.as_str()) {
                    return Err(invalid(format!(
                        "unknown atom '{}' at position {} (use brackets for elements outside the organic subset)",
                        c, i
                    )));
                }
                seen_atom = true;
            }
            _ => return Err(invalid(format!("unexpected character '{}' at position {}", c, i))),
        }
        i += 1;
    }

    if depth != 0 {
        return Err(invalid("unclosed '('".to_string()));
    }

    if !open_rings.is_empty() {
        let mut labels: Vec<u32> = open_rings.into_iter().collect();
        labels.sort_unstable();
        let labels: Vec<String> = labels
            .iter()
            .map(|l| if *l >= 100 { format!("%{:02}", l - 100) } else { l.to_string() })
            .collect();
        return Err(invalid(format!("unclosed ring bond(s): {}", labels.join(", "))));
    }

    if !seen_atom {
        return Err(invalid("no atoms".to_string()));
    }

    Ok(text)
}

/// 环闭合标记：第一次出现开环，第二次出现闭环
fn toggle_ring(open: &mut HashSet<u32>, label: u32) {
    if !open.remove(&label) {
        open.insert(label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_smiles() {
        for s in [
            "C",
            "CCO",
            "c1ccccc1",
            "CC(=O)O",
            "C1CC1C2CC2",
            "[NH4+]",
            "O=C=O",
            "ClC(Cl)Cl",
            "C%10CC%10",
            "[Na+].[Cl-]",
            "F/C=C/F",
            "  CCO  ",
        ] {
            assert!(validate_smiles(s).is_ok(), "{} should be valid", s);
        }
    }

    #[test]
    fn test_validate_returns_trimmed() {
        assert_eq!(validate_smiles("  CCO\n").unwrap(), "CCO");
    }

    #[test]
    fn test_invalid_smiles() {
        for s in [
            "", "   ", "C1CC", "CC(C", "CC)C", "(C)C", "C[NH4", "Xx", "C%1C", "C1CC name",
            "[]", "C!",
        ] {
            assert!(
                matches!(validate_smiles(s), Err(QcalcError::InvalidSmiles { .. })),
                "{:?} should be rejected",
                s
            );
        }
    }

    #[test]
    fn test_trailing_name_is_kept_for_embedder() {
        assert_eq!(validate_smiles("CCO ethanol").unwrap(), "CCO ethanol");
        assert_eq!(
            validate_smiles(" C1=CC=CC=C1 |c:0,2,4| \n").unwrap(),
            "C1=CC=CC=C1 |c:0,2,4|"
        );
    }

    #[test]
    fn test_ring_labels_can_be_reused() {
        assert!(validate_smiles("C1CC1C1CC1").is_ok());
    }

    #[test]
    fn test_unclosed_ring_reason() {
        let err = validate_smiles("C1CC2CC").unwrap_err();
        assert!(err.to_string().contains("1, 2"));
    }
}
