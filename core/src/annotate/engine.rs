use crate::error::EngineError;

use super::overlay::OverlaySpec;

/// A page-addressable overlay compositor.
///
/// Every `apply` call takes a complete serialized document and returns a new one; callers
/// chain overlays by feeding each output into the next call.
pub trait DocumentEngine {
    fn page_count(&self, document: &[u8]) -> Result<u32, EngineError>;

    fn apply(&self, document: &[u8], overlay: &OverlaySpec) -> Result<Vec<u8>, EngineError>;
}

impl<E: DocumentEngine + ?Sized> DocumentEngine for &E {
    fn page_count(&self, document: &[u8]) -> Result<u32, EngineError> {
        (**self).page_count(document)
    }

    fn apply(&self, document: &[u8], overlay: &OverlaySpec) -> Result<Vec<u8>, EngineError> {
        (**self).apply(document, overlay)
    }
}
