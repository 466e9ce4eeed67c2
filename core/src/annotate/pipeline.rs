//! Signing pipeline: read inputs -> build the signature block -> fold overlays -> write.
//!
//! Every overlay is applied to the complete output of the previous one, targeting only the
//! last page. The first failure aborts the run; the destination is written only after all
//! seven overlays succeeded.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::error::{EngineError, SignError};

use super::engine::DocumentEngine;
use super::lopdf_engine::LopdfEngine;
use super::signature::{materialize_signature, read_signature};
use super::overlay::{build_signature_block, OverlaySpec};

#[derive(Debug, Clone, Copy)]
pub struct SignRequest<'a> {
    pub source: &'a Path,
    pub destination: &'a Path,
    pub employee_name: &'a str,
    pub manager_name: &'a str,
    pub signature_path: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignReport {
    pub destination: PathBuf,
    pub page: u32,
    pub overlays: usize,
}

pub struct Signer<E> {
    engine: E,
    temp_dir: PathBuf,
    date: Option<NaiveDate>,
}

impl Signer<LopdfEngine> {
    pub fn with_lopdf() -> Self {
        Self::new(LopdfEngine::new())
    }
}

impl<E: DocumentEngine> Signer<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            temp_dir: std::env::temp_dir(),
            date: None,
        }
    }

    /// Directory for the temporary signature file.
    #[must_use]
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    /// Pin the date stamped into the employee date label.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[tracing::instrument(
        name = "annotate.sign",
        skip(self, request),
        fields(source = %request.source.display(), destination = %request.destination.display())
    )]
    pub fn sign(&self, request: &SignRequest<'_>) -> Result<SignReport, SignError> {
        let signature = read_signature(request.signature_path)?;

        let source = std::fs::read(request.source).map_err(|source| SignError::ReadSource {
            path: request.source.to_path_buf(),
            source,
        })?;
        let page = self
            .engine
            .page_count(&source)
            .map_err(SignError::OpenDocument)?;
        if page == 0 {
            return Err(SignError::OpenDocument(EngineError::NoPages));
        }
        debug!(pages = page, "source opened, signing last page");

        let signature_file = materialize_signature(&self.temp_dir, &signature)?;

        let today = self.date.unwrap_or_else(|| Local::now().date_naive());
        let overlays = build_signature_block(
            page,
            request.employee_name,
            request.manager_name,
            today,
            &signature_file,
        )?;

        let signed = apply_overlays(&self.engine, source, &overlays)?;
        write_output(request.destination, &signed)?;

        info!(page, overlays = overlays.len(), "signed PDF written");
        Ok(SignReport {
            destination: request.destination.to_path_buf(),
            page,
            overlays: overlays.len(),
        })
    }
}

/// Fold `overlays` over `document` left to right, short-circuiting on the first failure.
pub fn apply_overlays<E: DocumentEngine>(
    engine: &E,
    document: Vec<u8>,
    overlays: &[OverlaySpec],
) -> Result<Vec<u8>, SignError> {
    overlays.iter().try_fold(document, |doc, overlay| {
        debug!(step = %overlay.step, page = overlay.page, "applying overlay");
        engine
            .apply(&doc, overlay)
            .map_err(|source| SignError::ApplyOverlay {
                step: overlay.step,
                source,
            })
    })
}

/// Write through a sibling temp file so a failed write never leaves a partial destination.
fn write_output(destination: &Path, data: &[u8]) -> Result<(), SignError> {
    let fail = |source: std::io::Error| SignError::WriteOutput {
        path: destination.to_path_buf(),
        source,
    };
    let dir = match destination.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".hours-signer-")
        .suffix(".pdf.part")
        .tempfile_in(dir)
        .map_err(fail)?;
    tmp.write_all(data).map_err(fail)?;
    tmp.flush().map_err(fail)?;
    tmp.persist(destination).map_err(|e| fail(e.error))?;
    Ok(())
}

/// Sign `source` into `destination` with the lopdf engine and today's date.
pub fn sign(
    source: &Path,
    destination: &Path,
    employee_name: &str,
    manager_name: &str,
    signature_path: &str,
) -> Result<SignReport, SignError> {
    Signer::with_lopdf().sign(&SignRequest {
        source,
        destination,
        employee_name,
        manager_name,
        signature_path,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::annotate::overlay::OverlayStep;

    /// Fake engine: the "document" is a text log, each overlay appends its step name.
    struct RecordingEngine {
        pages: u32,
        fail_at: Option<OverlayStep>,
        calls: RefCell<Vec<(OverlayStep, u32)>>,
        page_count_calls: RefCell<usize>,
    }

    impl RecordingEngine {
        fn new(pages: u32) -> Self {
            Self {
                pages,
                fail_at: None,
                calls: RefCell::new(Vec::new()),
                page_count_calls: RefCell::new(0),
            }
        }

        fn failing_at(pages: u32, step: OverlayStep) -> Self {
            Self {
                fail_at: Some(step),
                ..Self::new(pages)
            }
        }
    }

    impl DocumentEngine for RecordingEngine {
        fn page_count(&self, _document: &[u8]) -> Result<u32, EngineError> {
            *self.page_count_calls.borrow_mut() += 1;
            Ok(self.pages)
        }

        fn apply(&self, document: &[u8], overlay: &OverlaySpec) -> Result<Vec<u8>, EngineError> {
            self.calls.borrow_mut().push((overlay.step, overlay.page));
            if self.fail_at == Some(overlay.step) {
                return Err(EngineError::Malformed("boom".to_string()));
            }
            let mut out = document.to_vec();
            out.extend_from_slice(format!("|{}", overlay.step).as_bytes());
            Ok(out)
        }
    }

    struct Fixture {
        dir: tempfile::TempDir,
        temp: PathBuf,
        source: PathBuf,
        destination: PathBuf,
        signature: String,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let temp = dir.path().join("tmp");
        std::fs::create_dir(&temp).unwrap();
        let source = dir.path().join("in.pdf");
        std::fs::write(&source, b"SRC").unwrap();
        let signature = dir.path().join("sig.png");
        image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]))
            .save(&signature)
            .unwrap();
        Fixture {
            destination: dir.path().join("out.pdf"),
            signature: signature.to_string_lossy().to_string(),
            temp,
            source,
            dir,
        }
    }

    fn request<'a>(fx: &'a Fixture, signature: &'a str) -> SignRequest<'a> {
        SignRequest {
            source: &fx.source,
            destination: &fx.destination,
            employee_name: "Alice",
            manager_name: "Bob",
            signature_path: signature,
        }
    }

    fn temp_entries(fx: &Fixture) -> usize {
        std::fs::read_dir(&fx.temp).unwrap().count()
    }

    #[test]
    fn targets_only_the_last_page() {
        let fx = fixture();
        let signer = Signer::new(RecordingEngine::new(5)).with_temp_dir(&fx.temp);

        let report = signer.sign(&request(&fx, &fx.signature)).unwrap();

        assert_eq!(report.page, 5);
        assert_eq!(report.overlays, 7);
        let calls = signer.engine().calls.borrow();
        assert_eq!(calls.len(), 7);
        assert!(calls.iter().all(|(_, page)| *page == 5));
    }

    #[test]
    fn overlays_are_chained_in_fixed_order() {
        let fx = fixture();
        let signer = Signer::new(RecordingEngine::new(1)).with_temp_dir(&fx.temp);

        signer.sign(&request(&fx, &fx.signature)).unwrap();

        let steps: Vec<OverlayStep> = signer.engine().calls.borrow().iter().map(|c| c.0).collect();
        assert_eq!(steps, OverlayStep::ALL.to_vec());
        let written = std::fs::read_to_string(&fx.destination).unwrap();
        assert_eq!(
            written,
            "SRC|employee label|employee date|handtekening label|signature\
             |manager label|manager date|manager handtekening label"
        );
    }

    #[test]
    fn empty_signature_fails_before_any_document_io() {
        let fx = fixture();
        std::fs::remove_file(&fx.source).unwrap();
        let signer = Signer::new(RecordingEngine::new(1)).with_temp_dir(&fx.temp);

        let err = signer.sign(&request(&fx, "")).unwrap_err();

        assert!(matches!(err, SignError::MissingSignature));
        assert_eq!(*signer.engine().page_count_calls.borrow(), 0);
        assert!(signer.engine().calls.borrow().is_empty());
        assert_eq!(temp_entries(&fx), 0);
        assert!(!fx.destination.exists());
    }

    #[test]
    fn temp_signature_removed_after_success() {
        let fx = fixture();
        let signer = Signer::new(RecordingEngine::new(2)).with_temp_dir(&fx.temp);

        signer.sign(&request(&fx, &fx.signature)).unwrap();

        assert_eq!(temp_entries(&fx), 0);
    }

    #[test]
    fn mid_pipeline_failure_names_step_and_writes_nothing() {
        let fx = fixture();
        let signer = Signer::new(RecordingEngine::failing_at(3, OverlayStep::ManagerLabel))
            .with_temp_dir(&fx.temp);

        let err = signer.sign(&request(&fx, &fx.signature)).unwrap_err();

        assert_eq!(err.step(), Some(OverlayStep::ManagerLabel));
        assert!(err.to_string().starts_with("failed to add manager label"));
        assert_eq!(signer.engine().calls.borrow().len(), 5);
        assert_eq!(temp_entries(&fx), 0);
        assert!(!fx.destination.exists());
    }

    #[test]
    fn unreadable_source_is_reported() {
        let fx = fixture();
        std::fs::remove_file(&fx.source).unwrap();
        let signer = Signer::new(RecordingEngine::new(1)).with_temp_dir(&fx.temp);

        let err = signer.sign(&request(&fx, &fx.signature)).unwrap_err();

        assert!(matches!(err, SignError::ReadSource { .. }));
        assert_eq!(temp_entries(&fx), 0);
    }

    #[test]
    fn empty_document_is_rejected() {
        let fx = fixture();
        let signer = Signer::new(RecordingEngine::new(0)).with_temp_dir(&fx.temp);

        let err = signer.sign(&request(&fx, &fx.signature)).unwrap_err();

        assert!(matches!(err, SignError::OpenDocument(EngineError::NoPages)));
        assert!(signer.engine().calls.borrow().is_empty());
    }

    #[test]
    fn existing_destination_is_overwritten() {
        let fx = fixture();
        std::fs::write(&fx.destination, b"old contents").unwrap();
        let signer = Signer::new(RecordingEngine::new(1)).with_temp_dir(&fx.temp);

        signer.sign(&request(&fx, &fx.signature)).unwrap();

        let written = std::fs::read_to_string(&fx.destination).unwrap();
        assert!(written.starts_with("SRC|employee label"));
        let leftovers: Vec<_> = std::fs::read_dir(fx.dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".pdf.part"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn missing_destination_directory_fails_the_write() {
        let fx = fixture();
        let destination = fx.dir.path().join("nope").join("out.pdf");
        let signer = Signer::new(RecordingEngine::new(1)).with_temp_dir(&fx.temp);

        let err = signer
            .sign(&SignRequest {
                destination: &destination,
                ..request(&fx, &fx.signature)
            })
            .unwrap_err();

        assert!(matches!(err, SignError::WriteOutput { .. }));
        assert!(!destination.exists());
        assert_eq!(temp_entries(&fx), 0);
    }
}
