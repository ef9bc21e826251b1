//! Parallel evaluation of many design points.

use af_geometry::ShapeParameters;
use af_xfoil::{IdSource, SolverInvoker};
use rayon::prelude::*;
use tracing::info;

use crate::error::EvaluationFailed;
use crate::evaluator::{Evaluation, Evaluator};

/// Evaluate every point on the rayon pool, results in input order.
///
/// Each point runs in its own workspace; failures stay per point.
pub fn evaluate_batch<S: SolverInvoker, I: IdSource>(
    evaluator: &Evaluator<S, I>,
    points: &[ShapeParameters],
) -> Vec<Result<Evaluation, EvaluationFailed>> {
    let results: Vec<_> = points.par_iter().map(|p| evaluator.evaluate(p)).collect();
    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(points = points.len(), failed, "batch evaluation finished");
    results
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchSummary {
    pub evaluated: usize,
    pub failed: usize,
    /// Index and value of the highest maximum efficiency among successes.
    pub best: Option<(usize, f64)>,
}

impl BatchSummary {
    pub fn from_results(results: &[Result<Evaluation, EvaluationFailed>]) -> Self {
        let mut best: Option<(usize, f64)> = None;
        for (i, r) in results.iter().enumerate() {
            if let Ok(eval) = r {
                let e = eval.performance.max_efficiency;
                if best.is_none_or(|(_, b)| e > b) {
                    best = Some((i, e));
                }
            }
        }
        Self {
            evaluated: results.len(),
            failed: results.iter().filter(|r| r.is_err()).count(),
            best,
        }
    }
}
