//! # 振动频率处理模块
//!
//! 对求解器返回的谐振频率做汇总、导出与绘图。
//!
//! ## 依赖关系
//! - 被 `commands/calc.rs` 调用
//! - 子模块: export (CSV), plot (stick spectrum)

pub mod export;
pub mod plot;

/// 单个振动模式
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mode {
    /// 模式序号（从 1 开始）
    pub index: usize,
    /// 频率 (cm⁻¹)，虚频取绝对值
    pub wavenumber: f64,
    /// 是否为虚频
    pub imaginary: bool,
}

/// 频率列表汇总
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySet {
    pub modes: Vec<Mode>,
}

impl FrequencySet {
    /// 从求解器原始数组构造（负值表示虚频）
    pub fn from_raw(values: &[f64]) -> Self {
        let modes = values
            .iter()
            .enumerate()
            .map(|(i, v)| Mode {
                index: i + 1,
                wavenumber: v.abs(),
                imaginary: *v < 0.0,
            })
            .collect();

        FrequencySet { modes }
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// 虚频个数
    pub fn imaginary_count(&self) -> usize {
        self.modes.iter().filter(|m| m.imaginary).count()
    }

    /// 实频范围 (最低, 最高)
    pub fn real_range(&self) -> Option<(f64, f64)> {
        let real: Vec<f64> = self
            .modes
            .iter()
            .filter(|m| !m.imaginary)
            .map(|m| m.wavenumber)
            .collect();

        if real.is_empty() {
            return None;
        }

        let min = real.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = real.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    /// 以原始数组形式展示，例如 `[1775.65, 4113.38]`，虚频显示为 `123.45i`
    pub fn display_array(&self) -> String {
        let items: Vec<String> = self
            .modes
            .iter()
            .map(|m| {
                if m.imaginary {
                    format!("{:.2}i", m.wavenumber)
                } else {
                    format!("{:.2}", m.wavenumber)
                }
            })
            .collect();
        format!("[{}]", items.join(", "))
    }
}
