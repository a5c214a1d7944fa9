//! # 降水率扫描
//!
//! 在给定降水率区间内计算经验公式与 Mie 模型的消光系数曲线。
//!
//! ## 算法概述
//! 1. 生成均匀降水率网格 Rr
//! 2. 经验曲线 k1 = 1.45 · Rr^0.64 (Ulbrich & Atlas, Eq. 8)
//! 3. 对每个 Rr: Nd → alpha, beta → k2 = alpha · 1000 · 10/ln(10)
//! 4. 计算固定降水率 (10, 20, 50 mm/hr) 下的粒子谱快照
//!
//! ## 依赖关系
//! - 被 `commands/compare.rs` 调用
//! - 使用 `mie/model.rs` 的 ExtinctionModel 接口
//! - 使用 `rayon` 并行计算各降水率点（线程数受 `jobs` 限制）

use crate::error::{MieplotError, Result};
use crate::mie::model::{build_pool, linspace, ExtinctionModel};

use rayon::prelude::*;

/// 粒子谱快照使用的降水率 (mm/hr)
pub const SNAPSHOT_RATES: [f64; 3] = [10.0, 20.0, 50.0];

/// 扫描配置
#[derive(Debug, Clone, Copy)]
pub struct SweepConfig {
    /// 采样点数
    pub points: usize,
    /// 降水率下限 (mm/hr)
    pub rr_min: f64,
    /// 降水率上限 (mm/hr)
    pub rr_max: f64,
    /// 并行线程数（0 = 自动）
    pub jobs: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            points: 100,
            rr_min: 1.0,
            rr_max: 50.0,
            jobs: 0,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.points < 2 {
            return Err(MieplotError::InvalidArgument(format!(
                "sweep needs at least 2 points, got {}",
                self.points
            )));
        }
        if !(self.rr_min > 0.0) || !(self.rr_max > self.rr_min) {
            return Err(MieplotError::InvalidArgument(format!(
                "rain rate range must satisfy 0 < min < max, got {}..{} mm/hr",
                self.rr_min, self.rr_max
            )));
        }
        Ok(())
    }
}

/// 单个降水率的粒子谱快照
#[derive(Debug, Clone)]
pub struct DsdSnapshot {
    pub rain_rate: f64,
    pub nd: Vec<f64>,
}

/// 扫描结果
#[derive(Debug, Clone)]
pub struct ComparisonData {
    /// 直径网格 (mm)
    pub diameters: Vec<f64>,
    /// 消光效率
    pub qext: Vec<f64>,
    /// 降水率 (mm/hr)
    pub rain_rate: Vec<f64>,
    /// 体消光系数 (m⁻¹)
    pub alpha: Vec<f64>,
    /// 体后向散射系数 (m⁻¹ sr⁻¹)
    pub beta: Vec<f64>,
    /// Ulbrich-Atlas 经验消光系数 (dB/km)
    pub k1: Vec<f64>,
    /// 模型消光系数 (dB/km)
    pub k2: Vec<f64>,
    /// 固定降水率下的粒子谱
    pub snapshots: Vec<DsdSnapshot>,
}

/// 由粒子谱标识符生成图例标题
///
/// `"marshall_palmer_Nd"` → `"Marshall-Palmer"`
pub fn derive_title(identifier: &str) -> String {
    identifier
        .replace("_Nd", "")
        .split('_')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join("-")
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Ulbrich & Atlas 经验公式 (dB/km)
pub fn ulbrich_atlas(rain_rate: f64) -> f64 {
    1.45 * rain_rate.powf(0.64)
}

/// 线性消光系数 (m⁻¹) 转换为 dB/km
pub fn to_db_per_km(alpha: f64) -> f64 {
    alpha * 1000.0 * (10.0 / 10f64.ln())
}

/// 执行降水率扫描
pub fn run_sweep<M>(model: &M, config: &SweepConfig) -> Result<ComparisonData>
where
    M: ExtinctionModel + Sync,
{
    config.validate()?;

    let d = model.diameters();
    let qext = model.qext();
    if d.len() != qext.len() {
        return Err(MieplotError::ShapeMismatch {
            what: "D vs qext".to_string(),
            left: d.len(),
            right: qext.len(),
        });
    }

    let rain_rate = linspace(config.rr_min, config.rr_max, config.points);
    let k1: Vec<f64> = rain_rate.iter().map(|&rr| ulbrich_atlas(rr)).collect();

    let pool = build_pool(config.jobs)?;
    let per_rate: Vec<(f64, f64)> = pool.install(|| {
        rain_rate
            .par_iter()
            .map(|&rr| {
                let nd = checked_nd(model, d, rr)?;
                Ok((model.alpha(&nd), model.beta(&nd)))
            })
            .collect::<Result<Vec<_>>>()
    })?;

    let (alpha, beta): (Vec<f64>, Vec<f64>) = per_rate.into_iter().unzip();
    let k2: Vec<f64> = alpha.iter().map(|&a| to_db_per_km(a)).collect();

    let snapshots = SNAPSHOT_RATES
        .iter()
        .map(|&rr| {
            Ok(DsdSnapshot {
                rain_rate: rr,
                nd: checked_nd(model, d, rr)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ComparisonData {
        diameters: d.to_vec(),
        qext: qext.to_vec(),
        rain_rate,
        alpha,
        beta,
        k1,
        k2,
        snapshots,
    })
}

/// 计算粒子谱并检查与直径网格等长
fn checked_nd<M: ExtinctionModel>(model: &M, d: &[f64], rain_rate: f64) -> Result<Vec<f64>> {
    let nd = model.nd(d, rain_rate);
    if nd.len() != d.len() {
        return Err(MieplotError::ShapeMismatch {
            what: format!("Nd at {} mm/hr vs D", rain_rate),
            left: nd.len(),
            right: d.len(),
        });
    }
    Ok(nd)
}
