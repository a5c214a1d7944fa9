//! # 扫描数据导出
//!
//! 导出降水率扫描结果与效率表到 CSV 格式。
//!
//! ## 支持格式
//! - 扫描: rain_rate_mm_hr, alpha_per_m, beta_per_m_sr, k1_db_km, k2_db_km
//! - 效率表: diameter_mm, qext
//!
//! ## 依赖关系
//! - 被 `commands/compare.rs` 调用
//! - 使用 `mie/sweep.rs` 的 ComparisonData 结构
//! - 使用 `csv` + `serde` 写入 CSV 文件

use crate::error::{MieplotError, Result};
use crate::mie::sweep::ComparisonData;

use serde::Serialize;
use std::path::Path;

/// 扫描结果的一行
#[derive(Debug, Serialize)]
struct SweepRow {
    rain_rate_mm_hr: f64,
    alpha_per_m: f64,
    beta_per_m_sr: f64,
    k1_db_km: f64,
    k2_db_km: f64,
}

/// 效率表的一行
#[derive(Debug, Serialize)]
struct EfficiencyRow {
    diameter_mm: f64,
    qext: f64,
}

/// 导出扫描结果
pub fn sweep_to_csv(data: &ComparisonData, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for i in 0..data.rain_rate.len() {
        wtr.serialize(SweepRow {
            rain_rate_mm_hr: data.rain_rate[i],
            alpha_per_m: data.alpha[i],
            beta_per_m_sr: data.beta[i],
            k1_db_km: data.k1[i],
            k2_db_km: data.k2[i],
        })?;
    }

    wtr.flush().map_err(|e| MieplotError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 导出直径-消光效率表
pub fn efficiency_to_csv(diameters: &[f64], qext: &[f64], output_path: &Path) -> Result<()> {
    if diameters.len() != qext.len() {
        return Err(MieplotError::ShapeMismatch {
            what: "D vs qext".to_string(),
            left: diameters.len(),
            right: qext.len(),
        });
    }

    let mut wtr = csv::Writer::from_path(output_path)?;

    for (d, q) in diameters.iter().zip(qext) {
        wtr.serialize(EfficiencyRow {
            diameter_mm: *d,
            qext: *q,
        })?;
    }

    wtr.flush().map_err(|e| MieplotError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mie::sweep::{run_sweep, tests::StubModel, SweepConfig};

    #[test]
    fn test_sweep_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.csv");

        let data = run_sweep(&StubModel::new(), &SweepConfig::default()).unwrap();
        sweep_to_csv(&data, &path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec![
                "rain_rate_mm_hr",
                "alpha_per_m",
                "beta_per_m_sr",
                "k1_db_km",
                "k2_db_km"
            ]
        );
        let rows: Vec<_> = rdr.records().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 100);
        let first_rr: f64 = rows[0][0].parse().unwrap();
        assert_eq!(first_rr, 1.0);
    }

    #[test]
    fn test_efficiency_csv_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qext.csv");
        assert!(efficiency_to_csv(&[1.0, 2.0], &[0.5], &path).is_err());
        assert!(!path.exists());
    }
}
