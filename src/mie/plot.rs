//! # 对比图生成
//!
//! 使用 `plotters` 库绘制 Mie 模型与经验公式的三面板对比图。
//!
//! ## 布局
//! ```text
//! ┌──────────────┬────────────┐
//! │ Q_ext vs D   │            │
//! ├──────────────┤  k vs Rr   │
//! │ N(D) vs D    │            │
//! └──────────────┴────────────┘
//!      1.2       :     1
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/compare.rs` 调用
//! - 使用 `mie/sweep.rs` 的 ComparisonData 结构
//! - 使用 `plotters` 渲染图表

use crate::error::{MieplotError, Result};
use crate::mie::sweep::ComparisonData;

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// matplotlib 默认配色
const SERIES_COLORS: [RGBColor; 3] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
];

/// 效率面板坐标范围
const QEXT_X_RANGE: (f64, f64) = (1e-4, 10.0);
const QEXT_Y_RANGE: (f64, f64) = (1e-3, 5.0);

/// 右侧面板横轴刻度数
const RAIN_RATE_TICKS: usize = 6;

/// 图像尺寸与分辨率
#[derive(Debug, Clone, Copy)]
pub struct FigureConfig {
    /// 宽度（英寸）
    pub width_in: f64,
    /// 高度（英寸）
    pub height_in: f64,
    pub dpi: u32,
    /// 左列与右列宽度比
    pub width_ratio: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        FigureConfig {
            width_in: 6.0,
            height_in: 6.0,
            dpi: 300,
            width_ratio: 1.2,
        }
    }
}

impl FigureConfig {
    /// 像素尺寸
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi as f64).round() as u32,
            (self.height_in * self.dpi as f64).round() as u32,
        )
    }

    /// 字号（磅）转像素
    fn font_px(&self, pt: f64) -> f64 {
        pt * self.dpi as f64 / 72.0
    }

    /// 长度（磅）转整数像素，用于边距与线宽
    fn px(&self, pt: f64) -> u32 {
        (self.font_px(pt).round() as u32).max(1)
    }

    /// 图例样线长度（像素）
    fn legend_line_px(&self) -> i32 {
        self.px(12.0) as i32
    }
}

/// 渲染对比图为 PNG
pub fn render_comparison(
    data: &ComparisonData,
    model_title: &str,
    output_path: &Path,
    figure: &FigureConfig,
) -> Result<()> {
    let size = figure.pixel_size();
    if size.0 == 0 || size.1 == 0 {
        return Err(MieplotError::InvalidArgument(format!(
            "figure size must be positive, got {}x{} px",
            size.0, size.1
        )));
    }

    let root = BitMapBackend::new(output_path, size).into_drawing_area();
    draw_comparison(&root, data, model_title, figure)?;
    root.present().map_err(plot_error)?;
    Ok(())
}

/// 绘制三面板布局
fn draw_comparison<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    data: &ComparisonData,
    model_title: &str,
    figure: &FigureConfig,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_error)?;

    let (width, _) = root.dim_in_pixel();
    let left_px = (width as f64 * figure.width_ratio / (figure.width_ratio + 1.0)) as u32;
    let (left, right) = root.split_horizontally(left_px);
    let rows = left.split_evenly((2, 1));

    draw_efficiency_panel(&rows[0], data, figure)?;
    draw_distribution_panel(&rows[1], data, figure)?;
    draw_extinction_panel(&right, data, model_title, figure)?;

    Ok(())
}

/// 左上：消光效率 vs 直径
fn draw_efficiency_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &ComparisonData,
    figure: &FigureConfig,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let label_font = ("sans-serif", figure.font_px(12.0));
    let tick_font = ("sans-serif", figure.font_px(9.0));

    let mut chart = ChartBuilder::on(area)
        .margin(figure.px(6.0))
        .x_label_area_size(figure.px(20.0))
        .y_label_area_size(figure.px(34.0))
        .build_cartesian_2d(
            (QEXT_X_RANGE.0..QEXT_X_RANGE.1).log_scale(),
            (QEXT_Y_RANGE.0..QEXT_Y_RANGE.1).log_scale(),
        )
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .y_desc("Extinction Efficiency")
        .x_label_formatter(&|v: &f64| format!("{:.0e}", v))
        .y_label_formatter(&|v: &f64| format!("{:.0e}", v))
        .x_label_style(tick_font)
        .y_label_style(tick_font)
        .axis_desc_style(label_font)
        .draw()
        .map_err(plot_error)?;

    let points = positive_points(&data.diameters, &data.qext);
    chart
        .draw_series(LineSeries::new(
            points,
            SERIES_COLORS[0].stroke_width(figure.px(1.0)),
        ))
        .map_err(plot_error)?;

    Ok(())
}

/// 左下：三个降水率下的粒子谱
fn draw_distribution_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &ComparisonData,
    figure: &FigureConfig,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let label_font = ("sans-serif", figure.font_px(12.0));
    let tick_font = ("sans-serif", figure.font_px(9.0));
    let stroke = figure.px(1.0);
    let legend_len = figure.legend_line_px();

    let x_range = decade_bounds(&data.diameters).unwrap_or(QEXT_X_RANGE);
    let all_nd: Vec<f64> = data
        .snapshots
        .iter()
        .flat_map(|s| s.nd.iter().copied())
        .collect();
    let y_range = decade_bounds(&all_nd).unwrap_or((1e-3, 1e5));

    let mut chart = ChartBuilder::on(area)
        .margin(figure.px(6.0))
        .x_label_area_size(figure.px(30.0))
        .y_label_area_size(figure.px(34.0))
        .build_cartesian_2d(
            (x_range.0..x_range.1).log_scale(),
            (y_range.0..y_range.1).log_scale(),
        )
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("Droplet Diameter (mm)")
        .y_desc("Raindrop Size Distribution (m⁻³ mm⁻¹)")
        .x_label_formatter(&|v: &f64| format!("{:.0e}", v))
        .y_label_formatter(&|v: &f64| format!("{:.0e}", v))
        .x_label_style(tick_font)
        .y_label_style(tick_font)
        .axis_desc_style(label_font)
        .draw()
        .map_err(plot_error)?;

    for (i, snapshot) in data.snapshots.iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        chart
            .draw_series(LineSeries::new(
                positive_points(&data.diameters, &snapshot.nd),
                color.stroke_width(stroke),
            ))
            .map_err(plot_error)?
            .label(format!("Rr={} mm/hr", snapshot.rain_rate))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + legend_len, y)], color.stroke_width(stroke))
            });
    }

    chart
        .configure_series_labels()
        .legend_area_size(figure.px(16.0))
        .position(SeriesLabelPosition::UpperRight)
        .label_font(tick_font)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_error)?;

    Ok(())
}

/// 右侧：消光系数 vs 降水率
fn draw_extinction_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    data: &ComparisonData,
    model_title: &str,
    figure: &FigureConfig,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let label_font = ("sans-serif", figure.font_px(12.0));
    let tick_font = ("sans-serif", figure.font_px(9.0));
    let stroke = figure.px(1.0);
    let legend_len = figure.legend_line_px();

    let x_min = data.rain_rate.first().copied().unwrap_or(1.0);
    let x_max = data.rain_rate.last().copied().unwrap_or(50.0);
    let y_max = data
        .k1
        .iter()
        .chain(&data.k2)
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };

    let mut chart = ChartBuilder::on(area)
        .margin(figure.px(6.0))
        .x_label_area_size(figure.px(30.0))
        .y_label_area_size(figure.px(30.0))
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("Rain rate (mm/hr)")
        .y_desc("Extinction Coefficient (dB/km)")
        .x_labels(RAIN_RATE_TICKS)
        .x_label_formatter(&rain_rate_label)
        .x_label_style(tick_font)
        .y_label_style(tick_font)
        .axis_desc_style(label_font)
        .draw()
        .map_err(plot_error)?;

    let curves = [("Ulbrich-Atlas", &data.k1), (model_title, &data.k2)];
    for (i, (label, values)) in curves.into_iter().enumerate() {
        let color = SERIES_COLORS[i];
        chart
            .draw_series(LineSeries::new(
                data.rain_rate
                    .iter()
                    .zip(values.iter())
                    .filter(|(_, y)| y.is_finite())
                    .map(|(x, y)| (*x, *y)),
                color.stroke_width(stroke),
            ))
            .map_err(plot_error)?
            .label(label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + legend_len, y)], color.stroke_width(stroke))
            });
    }

    chart
        .configure_series_labels()
        .legend_area_size(figure.px(16.0))
        .position(SeriesLabelPosition::UpperLeft)
        .label_font(tick_font)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_error)?;

    Ok(())
}

/// 降水率刻度取整显示
fn rain_rate_label(v: &f64) -> String {
    format!("{:.0}", v)
}

/// 对数坐标只能绘制正值
fn positive_points(x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
    x.iter()
        .zip(y)
        .filter(|(x, y)| **x > 0.0 && **y > 0.0 && y.is_finite())
        .map(|(x, y)| (*x, *y))
        .collect()
}

/// 正值数据外扩到整数量级，并限制跨度不超过 12 个量级
fn decade_bounds(values: &[f64]) -> Option<(f64, f64)> {
    let max = values
        .iter()
        .copied()
        .filter(|v| *v > 0.0 && v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return None;
    }
    let min = values
        .iter()
        .copied()
        .filter(|v| *v > 0.0)
        .fold(f64::INFINITY, f64::min)
        .max(max * 1e-12);

    let lo = 10f64.powf(min.log10().floor());
    let mut hi = 10f64.powf(max.log10().ceil());
    if hi <= lo {
        hi = lo * 10.0;
    }
    Some((lo, hi))
}

fn plot_error<E: std::fmt::Debug>(e: E) -> MieplotError {
    MieplotError::PlotError(format!("{:?}", e))
}
