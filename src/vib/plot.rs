//! # 振动频率 stick 图
//!
//! 使用 `plotters` 将每个振动模式画成一条竖线。
//! 求解器不返回红外强度，所有模式取相同高度，虚频画在负半轴并以红色区分。
//!
//! ## 依赖关系
//! - 被 `commands/calc.rs` 调用
//! - 使用 `vib/mod.rs` 的 FrequencySet

use super::FrequencySet;
use crate::error::{QcalcError, Result};

use plotters::prelude::*;
use std::path::Path;

/// 生成频率 stick 图（扩展名为 .svg 时输出 SVG，否则 PNG）
pub fn generate_frequency_plot(
    set: &FrequencySet,
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
) -> Result<()> {
    let use_svg = output_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);

    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_frequency_chart(&root, set, title)?;
        root.present()
            .map_err(|e| QcalcError::Other(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_frequency_chart(&root, set, title)?;
        root.present()
            .map_err(|e| QcalcError::Other(e.to_string()))?;
    }
    Ok(())
}

/// 横轴范围：覆盖全部模式并留出边距
fn axis_range(set: &FrequencySet) -> (f64, f64) {
    let max = set
        .modes
        .iter()
        .map(|m| m.wavenumber)
        .fold(0.0, f64::max);
    (0.0, ((max + 200.0) / 500.0).ceil() * 500.0)
}

fn draw_frequency_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    set: &FrequencySet,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| QcalcError::Other(format!("{:?}", e)))?;

    let (x_min, x_max) = axis_range(set);
    let y_min = if set.imaginary_count() > 0 { -1.1 } else { 0.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(40)
        .build_cartesian_2d(x_min..x_max, y_min..1.1)
        .map_err(|e| QcalcError::Other(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(0)
        .x_desc("Wavenumber (cm⁻¹)")
        .x_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| QcalcError::Other(format!("{:?}", e)))?;

    let real_color = RGBColor(0, 102, 204);
    let imaginary_color = RGBColor(204, 0, 0);

    for mode in &set.modes {
        let (top, color) = if mode.imaginary {
            (-1.0, imaginary_color)
        } else {
            (1.0, real_color)
        };

        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(mode.wavenumber, 0.0), (mode.wavenumber, top)],
                color.stroke_width(2),
            )))
            .map_err(|e| QcalcError::Other(format!("{:?}", e)))?;
    }

    let summary = format!(
        "{} modes, {} imaginary",
        set.len(),
        set.imaginary_count()
    );
    chart
        .draw_series(std::iter::once(Text::new(
            summary,
            (x_min + (x_max - x_min) * 0.02, 1.05),
            ("sans-serif", 14).into_font().color(&BLACK),
        )))
        .map_err(|e| QcalcError::Other(format!("{:?}", e)))?;

    Ok(())
}
