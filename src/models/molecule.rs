//! # 分子结构数据模型
//!
//! 非周期体系的原子列表表示，坐标为笛卡尔坐标 (Å)。
//!
//! ## 依赖关系
//! - 被 `parsers/xyz.rs`, `parsers/psi4_result.rs` 使用
//! - 无外部模块依赖

/// 原子信息
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// 元素符号
    pub element: String,

    /// 笛卡尔坐标 [x, y, z] (Å)
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Atom {
            element: element.into(),
            position,
        }
    }
}

/// 分子
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    /// 注释行 (XYZ 第二行)
    pub comment: String,

    /// 原子列表
    pub atoms: Vec<Atom>,
}

impl Molecule {
    pub fn new(comment: impl Into<String>, atoms: Vec<Atom>) -> Self {
        Molecule {
            comment: comment.into(),
            atoms,
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// 计算化学式（Hill 顺序：C, H 在前，其余按字母）
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for atom in &self.atoms {
            *counts.entry(atom.element.as_str()).or_insert(0) += 1;
        }

        let mut ordered: Vec<(&str, usize)> = Vec::with_capacity(counts.len());
        if let Some(c) = counts.remove("C") {
            ordered.push(("C", c));
            if let Some(h) = counts.remove("H") {
                ordered.push(("H", h));
            }
        }
        ordered.extend(counts);

        ordered
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// 转换为 XYZ 格式
    pub fn to_xyz_string(&self) -> String {
        let mut result = String::new();
        result.push_str(&format!("{}\n", self.atoms.len()));
        result.push_str(&format!("{}\n", self.comment));

        for atom in &self.atoms {
            result.push_str(&format!(
                "{:<2} {:16.10} {:16.10} {:16.10}\n",
                atom.element, atom.position[0], atom.position[1], atom.position[2]
            ));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Molecule {
        Molecule::new(
            "water",
            vec![
                Atom::new("O", [0.0, 0.0, 0.1173]),
                Atom::new("H", [0.0, 0.7572, -0.4692]),
                Atom::new("H", [0.0, -0.7572, -0.4692]),
            ],
        )
    }

    #[test]
    fn test_formula_hill_order() {
        assert_eq!(water().formula(), "H2O");

        let ethanol = Molecule::new(
            "",
            vec![
                Atom::new("O", [0.0; 3]),
                Atom::new("C", [0.0; 3]),
                Atom::new("C", [0.0; 3]),
                Atom::new("H", [0.0; 3]),
                Atom::new("H", [0.0; 3]),
                Atom::new("H", [0.0; 3]),
                Atom::new("H", [0.0; 3]),
                Atom::new("H", [0.0; 3]),
                Atom::new("H", [0.0; 3]),
            ],
        );
        assert_eq!(ethanol.formula(), "C2H6O");
    }

    #[test]
    fn test_to_xyz_string_header() {
        let xyz = water().to_xyz_string();
        let lines: Vec<&str> = xyz.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "3");
        assert_eq!(lines[1], "water");
        assert!(lines[2].starts_with("O "));
    }
}
