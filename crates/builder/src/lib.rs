//! Parametric gate construction on top of `gate-kernel`.
//!
//! [`dispatcher`] resolves a [`gate_types::GateSpec`] into a plan,
//! [`tiler`] fills the gate rectangle with base segments, [`pivot`] turns
//! swing gates into rotated leaves and [`accessories`] places rails,
//! windows, vents, pass-doors and handles from the persisted bounding box.
//! [`pipeline`] runs all of it as two checkpointed stages.

pub mod accessories;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod library;
pub mod pipeline;
pub mod pivot;
pub mod tiler;

pub use config::{LeafCalibration, PipelineConfig, PlacementRules};
pub use dispatcher::{dispatch, GatePlan};
pub use error::BuildError;
pub use library::{AccessoryTemplate, BaseSegment, SegmentId, SegmentLibrary};
pub use pipeline::{GatePipeline, GeometryOutcome, Stage, StageReport};
pub use pivot::{Leaf, LeafConfig};
pub use tiler::{TiledSolid, TilingMode, GATE_SOLID_NAME};
