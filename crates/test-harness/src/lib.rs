//! Test harness for the gate pipeline.
//!
//! Runs both pipeline stages against a scratch directory, re-imports the
//! exported OBJ files and checks the results.
//!
//! # Key Components
//!
//! - [`helpers`]: error type, stage runner, coordinate helpers
//! - [`obj_import`]: OBJ re-import through `tobj`
//! - [`oracle`]: Verification functions returning pass/fail verdicts
//! - [`assertions`]: Assertion helpers with diagnostics

pub mod assertions;
pub mod helpers;
pub mod obj_import;
pub mod oracle;

pub use helpers::{render_to, HarnessError, RenderedGate};
pub use obj_import::{import_obj, ImportedObject};
pub use oracle::OracleVerdict;
