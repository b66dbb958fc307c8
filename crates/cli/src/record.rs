use serde::Serialize;
use skewdecomp::{
    classify, decompose_with, probe_error, Affine2, DecompCfg, Decomposition, Primitive, Step,
    Strategy,
};

/// One step as printed by `decompose` and `chain`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOut {
    pub slot: &'static str,
    #[serde(flatten)]
    pub primitive: PrimitiveOut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrimitiveOut {
    Scale { sx: f64, sy: f64 },
    Rotate { radians: f64, degrees: f64 },
    Translate { tx: f64, ty: f64 },
}

impl From<&Step> for StepOut {
    fn from(step: &Step) -> Self {
        let primitive = match step.primitive {
            Primitive::Scale { sx, sy } => PrimitiveOut::Scale { sx, sy },
            Primitive::Rotate(a) => PrimitiveOut::Rotate {
                radians: a,
                degrees: a.to_degrees(),
            },
            Primitive::Translate(t) => PrimitiveOut::Translate { tx: t.x, ty: t.y },
        };
        Self {
            slot: step.slot.name(),
            primitive,
        }
    }
}

/// Outcome for a single input matrix.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub input: [f64; 6],
    pub ok: bool,
    pub path: &'static str,
    pub steps: Vec<StepOut>,
    pub probe_error: Option<f64>,
    #[serde(skip)]
    pub decomposition: Option<Decomposition>,
}

impl Record {
    pub fn solve(matrix: &Affine2, cfg: &DecompCfg, strategy: Strategy) -> Self {
        let decomposition = decompose_with(matrix, cfg, strategy);
        Self {
            input: matrix.components(),
            ok: decomposition.is_some(),
            path: classify(matrix, cfg).name(),
            steps: decomposition
                .iter()
                .flat_map(|d| d.steps())
                .map(StepOut::from)
                .collect(),
            probe_error: decomposition
                .as_ref()
                .map(|d| probe_error(matrix, d, cfg.probe_side)),
            decomposition,
        }
    }

    /// Flat slot columns for tabular output, in slot order:
    /// scale1 x/y, rotate1, scale2 x/y, rotate2, translate x/y.
    pub fn slot_columns(&self) -> [Option<f64>; 8] {
        let Some(d) = &self.decomposition else {
            return [None; 8];
        };
        let (s1x, s1y) = split(d.scale1());
        let (s2x, s2y) = split(d.scale2());
        let (tx, ty) = split(d.translate().map(|t| (t.x, t.y)));
        [s1x, s1y, d.rotate1(), s2x, s2y, d.rotate2(), tx, ty]
    }
}

/// `f64::max` that keeps NaN instead of skipping it.
pub fn worst(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

fn split(pair: Option<(f64, f64)>) -> (Option<f64>, Option<f64>) {
    match pair {
        Some((x, y)) => (Some(x), Some(y)),
        None => (None, None),
    }
}
