use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;
use serde_json::json;
use skewdecomp::{Affine2, DecompCfg, Strategy};
use std::fs::File;
use std::path::Path;

use crate::provenance::write_sidecar;
use crate::record::{worst, Record};

pub const INPUT_COLUMNS: [&str; 6] = ["m11", "m12", "m21", "m22", "tx", "ty"];
const SLOT_COLUMNS: [&str; 8] = [
    "scale1_x",
    "scale1_y",
    "rotate1",
    "scale2_x",
    "scale2_y",
    "rotate2",
    "translate_x",
    "translate_y",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub rows: usize,
    pub failures: usize,
    pub max_error: f64,
}

/// Decompose every row of a CSV with columns m11,m12,m21,m22,tx,ty.
///
/// Writes CSV (or Parquet when `out` ends in `.parquet`) plus a provenance sidecar.
/// Null cells make the row fail (`ok = false`) rather than the run.
pub fn run(input: &Path, out: &Path, cfg: &DecompCfg, strategy: Strategy) -> Result<Summary> {
    let df = LazyCsvReader::new(input)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("opening {}", input.display()))?
        .collect()
        .with_context(|| format!("reading {}", input.display()))?;
    tracing::info!(rows = df.height(), cols = df.width(), "batch_input");

    let mut columns = Vec::with_capacity(INPUT_COLUMNS.len());
    for name in INPUT_COLUMNS {
        columns.push(float_column(&df, name)?);
    }
    let records: Vec<Record> = (0..df.height())
        .map(|i| {
            let [m11, m12, m21, m22, tx, ty] =
                std::array::from_fn(|c| columns[c][i].unwrap_or(f64::NAN));
            Record::solve(
                &Affine2::from_components(m11, m12, m21, m22, tx, ty),
                cfg,
                strategy,
            )
        })
        .collect();

    let summary = summarize(&records);
    let mut frame = to_frame(&records)?;
    write_frame(&mut frame, out)?;
    write_sidecar(
        out,
        json!({
            "command": "batch",
            "input": input.to_string_lossy(),
            "eps": cfg.eps,
            "rotate_eps": cfg.rotate_eps,
            "probe_side": cfg.probe_side,
            "strategy": format!("{strategy:?}"),
            "summary": summary,
        }),
    )?;
    tracing::info!(
        rows = summary.rows,
        failures = summary.failures,
        max_error = summary.max_error,
        out = %out.display(),
        "batch"
    );
    Ok(summary)
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df
        .column(name)
        .with_context(|| format!("missing column `{name}`"))?
        .cast(&DataType::Float64)
        .with_context(|| format!("column `{name}` is not numeric"))?;
    Ok(series.f64()?.into_iter().collect())
}

pub fn summarize(records: &[Record]) -> Summary {
    Summary {
        rows: records.len(),
        failures: records.iter().filter(|r| !r.ok).count(),
        max_error: records
            .iter()
            .filter_map(|r| r.probe_error)
            .fold(0.0, worst),
    }
}

fn to_frame(records: &[Record]) -> Result<DataFrame> {
    let input = |c: usize| records.iter().map(|r| r.input[c]).collect::<Vec<f64>>();
    let slot = |c: usize| {
        records
            .iter()
            .map(|r| r.slot_columns()[c])
            .collect::<Vec<Option<f64>>>()
    };
    let mut series: Vec<Series> = INPUT_COLUMNS
        .iter()
        .enumerate()
        .map(|(c, name)| Series::new((*name).into(), input(c)))
        .collect();
    series.push(Series::new(
        "ok".into(),
        records.iter().map(|r| r.ok).collect::<Vec<bool>>(),
    ));
    series.push(Series::new(
        "path".into(),
        records.iter().map(|r| r.path).collect::<Vec<&str>>(),
    ));
    series.extend(
        SLOT_COLUMNS
            .iter()
            .enumerate()
            .map(|(c, name)| Series::new((*name).into(), slot(c))),
    );
    series.push(Series::new(
        "probe_error".into(),
        records
            .iter()
            .map(|r| r.probe_error)
            .collect::<Vec<Option<f64>>>(),
    ));
    Ok(DataFrame::new(series)?)
}

fn write_frame(df: &mut DataFrame, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    if out.extension().is_some_and(|e| e == "parquet") {
        ParquetWriter::new(file).finish(df)?;
    } else {
        CsvWriter::new(&mut file).include_header(true).finish(df)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const ROWS: &str = "m11,m12,m21,m22,tx,ty\n\
                        1,0,0,1,0,0\n\
                        1,0.5,0,1,3,-2\n\
                        1,1,1,1,0,0\n\
                        2,0,0,2,0,0\n";

    #[test]
    fn batch_writes_one_row_per_input() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.csv");
        let out = dir.path().join("nested/out.csv");
        fs::write(&input, ROWS).unwrap();

        let summary = run(&input, &out, &DecompCfg::default(), Strategy::FastPaths).unwrap();
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.failures, 1);
        assert!(summary.max_error < 0.3);

        let text = fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("m11,m12,m21,m22,tx,ty,ok,path,scale1_x"));
        assert!(header.ends_with("probe_error"));
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), 4);
        assert!(rows[2].contains("false"));
        assert!(rows[1].contains("sheared"));
        assert!(dir.path().join("nested/out.provenance.json").exists());
    }

    #[test]
    fn summary_surfaces_non_finite_errors() {
        let row = |probe_error| Record {
            input: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            ok: true,
            path: "diagonal",
            steps: Vec::new(),
            probe_error: Some(probe_error),
            decomposition: None,
        };
        let s = summarize(&[row(0.1), row(f64::INFINITY), row(0.2)]);
        assert_eq!(s.max_error, f64::INFINITY);
        let s = summarize(&[row(f64::NAN), row(0.2)]);
        assert!(s.max_error.is_nan());
        assert_eq!(summarize(&[row(0.1), row(0.2)]).max_error, 0.2);
    }

    #[test]
    fn missing_column_names_the_column() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.csv");
        fs::write(&input, "m11,m12,m21,m22,tx\n1,0,0,1,0\n").unwrap();
        let err = run(
            &input,
            &dir.path().join("out.csv"),
            &DecompCfg::default(),
            Strategy::FastPaths,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("`ty`"));
    }
}
