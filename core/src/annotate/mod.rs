//! Signature-block annotation of timesheet PDFs.

pub mod engine;
pub mod lopdf_engine;
pub mod naming;
pub mod overlay;
pub mod pipeline;
pub mod signature;

pub use engine::DocumentEngine;
pub use lopdf_engine::LopdfEngine;
pub use naming::{default_output_name, default_output_path};
pub use overlay::{build_signature_block, Offset, OverlayContent, OverlaySpec, OverlayStep};
pub use pipeline::{apply_overlays, sign, SignReport, SignRequest, Signer};
pub use signature::{expand_signature_path, read_signature};
