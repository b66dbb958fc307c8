use anyhow::{ensure, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use skewdecomp::sample::SampleCfg;
use skewdecomp::{Affine2, DecompCfg, Strategy, EPS, PROBE_SIDE, ROTATE_EPS};
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

mod batch;
mod provenance;
mod record;
mod sweep;

use provenance::Provenance;
use record::Record;

#[derive(Parser)]
#[command(name = "skewdecomp")]
#[command(about = "Decompose skewed 2D affine maps into scale/rotate/translate chains")]
struct Cmd {
    #[command(flatten)]
    tol: TolArgs,

    #[command(subcommand)]
    action: Action,
}

#[derive(Args)]
struct TolArgs {
    /// Identity threshold for scale, rotation and translation
    #[arg(long, global = true, default_value_t = EPS)]
    eps: f64,
    /// Right-angle threshold for the rectangle shortcut (radians)
    #[arg(long, global = true, default_value_t = ROTATE_EPS)]
    rotate_eps: f64,
    /// Side length of the probe square
    #[arg(long, global = true, default_value_t = PROBE_SIDE)]
    probe_side: f64,
    /// Skip the diagonal and rectangle shortcuts
    #[arg(long, global = true)]
    general: bool,
}

impl TolArgs {
    fn cfg(&self) -> Result<DecompCfg> {
        ensure!(self.eps >= 0.0, "--eps must be non-negative");
        ensure!(self.rotate_eps >= 0.0, "--rotate-eps must be non-negative");
        ensure!(self.probe_side > 0.0, "--probe-side must be positive");
        Ok(DecompCfg {
            eps: self.eps,
            rotate_eps: self.rotate_eps,
            probe_side: self.probe_side,
        })
    }

    fn strategy(&self) -> Strategy {
        if self.general {
            Strategy::General
        } else {
            Strategy::FastPaths
        }
    }
}

/// Row-vector components: `p' = p·[[m11, m12], [m21, m22]] + (tx, ty)`.
#[derive(Args, Clone, Copy)]
struct MatrixArgs {
    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    m11: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    m12: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    m21: f64,
    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    m22: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    tx: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    ty: f64,
}

impl MatrixArgs {
    fn affine(self) -> Affine2 {
        Affine2::from_components(self.m11, self.m12, self.m21, self.m22, self.tx, self.ty)
    }
}

#[derive(Subcommand)]
enum Action {
    /// Decompose one matrix and print the steps as JSON
    Decompose {
        #[command(flatten)]
        matrix: MatrixArgs,
    },
    /// Decompose every row of a CSV (m11,m12,m21,m22,tx,ty) into a table
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Decompose seeded random matrices and report failures and probe error
    Sweep {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 10_000)]
        count: u64,
        /// Linear entries are drawn from [-range, range]
        #[arg(long, default_value_t = 3.0)]
        range: f64,
        /// Lower bound on |m12| and |m21|
        #[arg(long, default_value_t = 0.0)]
        min_off_diagonal: f64,
    },
    /// Print the nested-node plan a host would build for one matrix
    Chain {
        #[command(flatten)]
        matrix: MatrixArgs,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    let cfg = cmd.tol.cfg()?;
    let strategy = cmd.tol.strategy();
    match cmd.action {
        Action::Decompose { matrix } => {
            let record = Record::solve(&matrix.affine(), &cfg, strategy);
            tracing::info!(
                ok = record.ok,
                path = record.path,
                steps = record.steps.len(),
                "decompose"
            );
            print_json(&record)
        }
        Action::Batch { input, out } => {
            let summary = batch::run(&input, &out, &cfg, strategy)?;
            print_json(&summary)
        }
        Action::Sweep {
            seed,
            count,
            range,
            min_off_diagonal,
        } => {
            let sample = SampleCfg {
                linear_range: range,
                min_off_diagonal,
                ..SampleCfg::default()
            };
            print_json(&sweep::sweep(sample, seed, count, &cfg, strategy))
        }
        Action::Chain { matrix } => print_json(&sweep::plan(&matrix.affine(), &cfg, strategy)),
        Action::Report => print_json(&Provenance::build(json!({
            "eps": cfg.eps,
            "rotate_eps": cfg.rotate_eps,
            "probe_side": cfg.probe_side,
        }))),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cmd::command().debug_assert();
    }

    #[test]
    fn negative_components_and_global_flags_parse() {
        let cmd = Cmd::try_parse_from([
            "skewdecomp",
            "decompose",
            "--m12",
            "-0.5",
            "--tx",
            "-3",
            "--general",
            "--eps",
            "0.001",
        ])
        .unwrap();
        assert!(cmd.tol.general);
        assert_eq!(cmd.tol.cfg().unwrap().eps, 0.001);
        match cmd.action {
            Action::Decompose { matrix } => {
                let f = matrix.affine();
                assert_eq!(f.components(), [1.0, -0.5, 0.0, 1.0, -3.0, 0.0]);
            }
            _ => panic!("expected decompose"),
        }
    }

    #[test]
    fn bad_probe_side_is_rejected() {
        let cmd = Cmd::try_parse_from(["skewdecomp", "report", "--probe-side", "0"]).unwrap();
        assert!(cmd.tol.cfg().is_err());
    }
}
