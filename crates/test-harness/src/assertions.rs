//! Assertion helpers with diagnostic output.
//!
//! Every failure names the context it was raised in and carries the oracle
//! detail, so a failing scenario reads without a debugger.

use gate_builder::pipeline::from_gate_bounds;
use gate_kernel::geometry::BoundingBox;
use gate_types::GateBounds;

use crate::helpers::HarnessError;
use crate::obj_import::ImportedObject;
use crate::oracle::{check_bounds_match, OracleVerdict};

/// Turn a failed verdict into an error.
pub fn assert_verdict(verdict: &OracleVerdict, ctx: &str) -> Result<(), HarnessError> {
    if verdict.passed {
        Ok(())
    } else {
        Err(HarnessError::OracleFailure {
            oracle: verdict.oracle_name.clone(),
            detail: format!("[{ctx}] {}", verdict.detail),
        })
    }
}

/// Assert every verdict passed, reporting all failures at once.
pub fn assert_all(verdicts: &[OracleVerdict], ctx: &str) -> Result<(), HarnessError> {
    let failures: Vec<String> = verdicts
        .iter()
        .filter(|v| !v.passed)
        .map(|v| format!("{}: {}", v.oracle_name, v.detail))
        .collect();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!("[{ctx}] {} failing oracles:\n  {}", failures.len(), failures.join("\n  ")),
        })
    }
}

/// Assert a persisted checkpoint matches an in-memory box.
pub fn assert_checkpoint_matches(
    checkpoint: &GateBounds,
    expected: &BoundingBox,
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    assert_verdict(&check_bounds_match(&from_gate_bounds(checkpoint), expected, tol), ctx)
}

/// Assert the imported object names are exactly `expected`, in order.
pub fn assert_object_names(objects: &[ImportedObject], expected: &[&str], ctx: &str) -> Result<(), HarnessError> {
    let names: Vec<&str> = objects.iter().map(|o| o.name.as_str()).collect();
    if names == expected {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!("[{ctx}] expected objects {expected:?}, got {names:?}"),
        })
    }
}

/// Assert a value lies within `tol` of `expected`.
pub fn assert_close(actual: f64, expected: f64, tol: f64, ctx: &str) -> Result<(), HarnessError> {
    if (actual - expected).abs() <= tol {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!("[{ctx}] expected {expected:.6}, got {actual:.6} (tol={tol})"),
        })
    }
}
