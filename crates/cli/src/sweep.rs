use serde::Serialize;
use skewdecomp::chain::{replay, Layer, Layers, NodeSink};
use skewdecomp::sample::{draw_batch, SampleCfg};
use skewdecomp::{decompose_with, probe_error, Affine2, DecompCfg, Step, Strategy};

use crate::record::{worst, StepOut};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepReport {
    pub seed: u64,
    pub count: u64,
    pub failures: u64,
    pub max_error: f64,
    pub mean_error: f64,
    /// Index of the worst draw; `draw_affine(cfg, ReplayToken::new(seed, index))` replays it.
    pub worst_index: Option<u64>,
}

pub fn sweep(
    sample: SampleCfg,
    seed: u64,
    count: u64,
    cfg: &DecompCfg,
    strategy: Strategy,
) -> SweepReport {
    let mut report = SweepReport {
        seed,
        count,
        failures: 0,
        max_error: 0.0,
        mean_error: 0.0,
        worst_index: None,
    };
    let mut total = 0.0;
    for (index, f) in (0..).zip(draw_batch(sample, seed, count)) {
        let Some(d) = decompose_with(&f, cfg, strategy) else {
            report.failures += 1;
            tracing::warn!(seed, index, matrix = ?f.components(), "sweep_failure");
            continue;
        };
        let err = probe_error(&f, &d, cfg.probe_side);
        total += err;
        if report.max_error.is_nan() {
            continue;
        }
        if err.is_nan() || err > report.max_error {
            report.max_error = worst(report.max_error, err);
            report.worst_index = Some(index);
        }
    }
    let solved = count - report.failures;
    if solved > 0 {
        report.mean_error = total / solved as f64;
    }
    tracing::info!(
        seed,
        count,
        failures = report.failures,
        max_error = report.max_error,
        mean_error = report.mean_error,
        "sweep"
    );
    report
}

/// Node plan a host would build, one entry per nested node.
#[derive(Debug, Default, Serialize)]
pub struct Plan {
    pub nodes: Vec<StepOut>,
    pub fallback: bool,
    pub inner: Option<LayerOut>,
    pub outer: Option<LayerOut>,
}

#[derive(Debug, Serialize)]
pub struct LayerOut {
    pub scale: [f64; 2],
    pub rotation: f64,
    pub offset: [f64; 2],
}

impl From<Layer> for LayerOut {
    fn from(l: Layer) -> Self {
        Self {
            scale: [l.scale.0, l.scale.1],
            rotation: l.rotation,
            offset: [l.offset.x, l.offset.y],
        }
    }
}

impl NodeSink for Plan {
    fn begin(&mut self) {
        self.nodes.clear();
        self.fallback = false;
    }

    fn push(&mut self, step: &Step) {
        tracing::debug!(slot = step.slot.name(), depth = self.nodes.len(), "node");
        self.nodes.push(StepOut::from(step));
    }

    fn fallback(&mut self) {
        tracing::warn!("no decomposition; target stays at identity");
        self.fallback = true;
    }
}

pub fn plan(matrix: &Affine2, cfg: &DecompCfg, strategy: Strategy) -> Plan {
    let d = decompose_with(matrix, cfg, strategy);
    let mut plan = Plan::default();
    replay(d.as_ref(), &mut plan);
    if let Some(d) = &d {
        let layers = Layers::group(d);
        plan.inner = layers.inner.map(LayerOut::from);
        plan.outer = layers.outer.map(LayerOut::from);
    }
    plan
}
