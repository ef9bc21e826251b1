//! Named-mapping interface used by an outer optimization framework.
//!
//! Inputs are `NACA_M`, `NACA_P`, `NACA_T`. Outputs are the contour
//! (`AirfoilX`, `AirfoilY`), the polar arrays (`Alpha`, `CL`, `CD`, `E`)
//! and the scalars `E_max` and `Alpha_E_max`.

use std::collections::BTreeMap;

use af_geometry::ShapeParameters;
use af_xfoil::{IdSource, SolverInvoker};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::evaluator::{Evaluation, Evaluator};

pub const INPUT_CAMBER: &str = "NACA_M";
pub const INPUT_CAMBER_POS: &str = "NACA_P";
pub const INPUT_THICKNESS: &str = "NACA_T";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputValue {
    Scalar(f64),
    Array(Vec<f64>),
}

impl OutputValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            OutputValue::Scalar(v) => Some(*v),
            OutputValue::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&[f64]> {
        match self {
            OutputValue::Scalar(_) => None,
            OutputValue::Array(v) => Some(v),
        }
    }
}

/// Default design point, NACA 2415.
pub fn default_inputs() -> BTreeMap<String, f64> {
    BTreeMap::from([
        (INPUT_CAMBER.to_string(), 2.0),
        (INPUT_CAMBER_POS.to_string(), 4.0),
        (INPUT_THICKNESS.to_string(), 15.0),
    ])
}

pub fn shape_from_inputs(inputs: &BTreeMap<String, f64>) -> AppResult<ShapeParameters> {
    let get = |key: &str| {
        inputs
            .get(key)
            .copied()
            .ok_or_else(|| AppError::InvalidInput(format!("missing input '{key}'")))
    };
    Ok(ShapeParameters::new(
        get(INPUT_CAMBER)?,
        get(INPUT_CAMBER_POS)?,
        get(INPUT_THICKNESS)?,
    ))
}

pub fn output_map(evaluation: &Evaluation) -> BTreeMap<String, OutputValue> {
    let perf = &evaluation.performance;
    let mut out = BTreeMap::new();
    out.insert("AirfoilX".to_string(), OutputValue::Array(evaluation.contour.xs()));
    out.insert("AirfoilY".to_string(), OutputValue::Array(evaluation.contour.ys()));
    out.insert("Alpha".to_string(), OutputValue::Array(perf.alpha.clone()));
    out.insert("CL".to_string(), OutputValue::Array(perf.cl.clone()));
    out.insert("CD".to_string(), OutputValue::Array(perf.cd.clone()));
    out.insert("E".to_string(), OutputValue::Array(perf.efficiency.clone()));
    out.insert("E_max".to_string(), OutputValue::Scalar(perf.max_efficiency));
    out.insert(
        "Alpha_E_max".to_string(),
        OutputValue::Scalar(perf.alpha_at_max_efficiency),
    );
    out
}

/// One call of the outer framework: named inputs to named outputs.
pub fn evaluate_named<S: SolverInvoker, I: IdSource>(
    evaluator: &Evaluator<S, I>,
    inputs: &BTreeMap<String, f64>,
) -> AppResult<BTreeMap<String, OutputValue>> {
    let params = shape_from_inputs(inputs)?;
    let evaluation = evaluator.evaluate(&params)?;
    Ok(output_map(&evaluation))
}
