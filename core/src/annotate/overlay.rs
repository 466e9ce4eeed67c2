//! Overlay descriptors and the fixed signature-block layout.

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{EngineError, SignError};

pub const LABEL_FONT: &str = "Helvetica";
pub const LABEL_POINTS: f32 = 10.0;
pub const SIGNATURE_SCALE: f32 = 0.35;

const EMPLOYEE_COLUMN: f32 = 40.0;
const MANAGER_COLUMN: f32 = 350.0;
const NAME_ROW: f32 = 210.0;
const DATE_ROW: f32 = 195.0;
const CAPTION_ROW: f32 = 180.0;

/// One element of the signature block. The order of `ALL` is the application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayStep {
    EmployeeLabel,
    EmployeeDate,
    EmployeeCaption,
    Signature,
    ManagerLabel,
    ManagerDate,
    ManagerCaption,
}

impl OverlayStep {
    pub const ALL: [OverlayStep; 7] = [
        OverlayStep::EmployeeLabel,
        OverlayStep::EmployeeDate,
        OverlayStep::EmployeeCaption,
        OverlayStep::Signature,
        OverlayStep::ManagerLabel,
        OverlayStep::ManagerDate,
        OverlayStep::ManagerCaption,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OverlayStep::EmployeeLabel => "employee label",
            OverlayStep::EmployeeDate => "employee date",
            OverlayStep::EmployeeCaption => "handtekening label",
            OverlayStep::Signature => "signature",
            OverlayStep::ManagerLabel => "manager label",
            OverlayStep::ManagerDate => "manager date",
            OverlayStep::ManagerCaption => "manager handtekening label",
        }
    }
}

impl fmt::Display for OverlayStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Offset in points from the bottom-left corner of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, PartialEq)]
pub enum OverlayContent {
    Text {
        text: String,
        font: String,
        points: f32,
    },
    Image {
        data: Vec<u8>,
        width: u32,
        height: u32,
        scale: f32,
    },
}

impl fmt::Debug for OverlayContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayContent::Text { text, font, points } => f
                .debug_struct("Text")
                .field("text", text)
                .field("font", font)
                .field("points", points)
                .finish(),
            OverlayContent::Image {
                data,
                width,
                height,
                scale,
            } => f
                .debug_struct("Image")
                .field("bytes", &data.len())
                .field("width", width)
                .field("height", height)
                .field("scale", scale)
                .finish(),
        }
    }
}

/// Immutable descriptor of one text or image element stamped onto a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySpec {
    pub step: OverlayStep,
    pub page: u32,
    pub offset: Offset,
    pub rotation: f32,
    pub content: OverlayContent,
}

impl OverlaySpec {
    pub fn text(step: OverlayStep, page: u32, offset: Offset, text: impl Into<String>) -> Self {
        Self {
            step,
            page,
            offset,
            rotation: 0.0,
            content: OverlayContent::Text {
                text: text.into(),
                font: LABEL_FONT.to_string(),
                points: LABEL_POINTS,
            },
        }
    }

    /// Image overlay from an encoded PNG/JPEG file. The file is read and its header
    /// inspected here; the pixels are decoded when the overlay is applied.
    pub fn image_from_file(
        step: OverlayStep,
        page: u32,
        offset: Offset,
        path: &Path,
        scale: f32,
    ) -> Result<Self, EngineError> {
        let data = std::fs::read(path)
            .map_err(|e| EngineError::Image(format!("{}: {e}", path.display())))?;
        let (width, height) = image::ImageReader::new(std::io::Cursor::new(&data))
            .with_guessed_format()
            .map_err(|e| EngineError::Image(e.to_string()))?
            .into_dimensions()
            .map_err(|e| EngineError::Image(e.to_string()))?;
        Ok(Self {
            step,
            page,
            offset,
            rotation: 0.0,
            content: OverlayContent::Image {
                data,
                width,
                height,
                scale,
            },
        })
    }

    pub fn text_value(&self) -> Option<&str> {
        match &self.content {
            OverlayContent::Text { text, .. } => Some(text),
            OverlayContent::Image { .. } => None,
        }
    }
}

/// Format used for the employee date label.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Build the seven overlays of the signature block for `page`.
///
/// The manager date caption carries no value, unlike the employee date.
pub fn build_signature_block(
    page: u32,
    employee_name: &str,
    manager_name: &str,
    today: NaiveDate,
    signature_file: &Path,
) -> Result<Vec<OverlaySpec>, SignError> {
    let signature = OverlaySpec::image_from_file(
        OverlayStep::Signature,
        page,
        Offset::new(120.0, 90.0),
        signature_file,
        SIGNATURE_SCALE,
    )
    .map_err(|source| SignError::BuildOverlay {
        step: OverlayStep::Signature,
        source,
    })?;

    Ok(vec![
        OverlaySpec::text(
            OverlayStep::EmployeeLabel,
            page,
            Offset::new(EMPLOYEE_COLUMN, NAME_ROW),
            format!("Werknemer: {employee_name}"),
        ),
        OverlaySpec::text(
            OverlayStep::EmployeeDate,
            page,
            Offset::new(EMPLOYEE_COLUMN, DATE_ROW),
            format!("Datum: {}", format_date(today)),
        ),
        OverlaySpec::text(
            OverlayStep::EmployeeCaption,
            page,
            Offset::new(EMPLOYEE_COLUMN, CAPTION_ROW),
            "Handtekening:",
        ),
        signature,
        OverlaySpec::text(
            OverlayStep::ManagerLabel,
            page,
            Offset::new(MANAGER_COLUMN, NAME_ROW),
            format!("Manager: {manager_name}"),
        ),
        OverlaySpec::text(
            OverlayStep::ManagerDate,
            page,
            Offset::new(MANAGER_COLUMN, DATE_ROW),
            "Datum:",
        ),
        OverlaySpec::text(
            OverlayStep::ManagerCaption,
            page,
            Offset::new(MANAGER_COLUMN, CAPTION_ROW),
            "Handtekening:",
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_png(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("sig.png");
        image::RgbaImage::from_pixel(20, 10, image::Rgba([0, 0, 0, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn block_follows_fixed_order_and_layout() {
        let dir = tempfile::tempdir().unwrap();
        let sig = write_png(dir.path());
        let today = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();

        let specs = build_signature_block(4, "Alice", "Bob", today, &sig).unwrap();

        let steps: Vec<OverlayStep> = specs.iter().map(|s| s.step).collect();
        assert_eq!(steps, OverlayStep::ALL.to_vec());
        assert!(specs.iter().all(|s| s.page == 4 && s.rotation == 0.0));

        let layout: Vec<(f32, f32, Option<&str>)> = specs
            .iter()
            .map(|s| (s.offset.x, s.offset.y, s.text_value()))
            .collect();
        assert_eq!(
            layout,
            vec![
                (40.0, 210.0, Some("Werknemer: Alice")),
                (40.0, 195.0, Some("Datum: 07-03-2024")),
                (40.0, 180.0, Some("Handtekening:")),
                (120.0, 90.0, None),
                (350.0, 210.0, Some("Manager: Bob")),
                (350.0, 195.0, Some("Datum:")),
                (350.0, 180.0, Some("Handtekening:")),
            ]
        );
    }

    #[test]
    fn signature_overlay_records_natural_size_and_scale() {
        let dir = tempfile::tempdir().unwrap();
        let sig = write_png(dir.path());
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let specs = build_signature_block(1, "A", "B", today, &sig).unwrap();
        match &specs[3].content {
            OverlayContent::Image {
                width,
                height,
                scale,
                ..
            } => {
                assert_eq!((*width, *height), (20, 10));
                assert_eq!(*scale, SIGNATURE_SCALE);
            }
            other => panic!("expected image overlay, got {other:?}"),
        }
    }

    #[test]
    fn undecodable_signature_fails_at_build_time() {
        let dir = tempfile::tempdir().unwrap();
        let sig = dir.path().join("sig.png");
        std::fs::write(&sig, b"definitely not an image").unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let err = build_signature_block(1, "A", "B", today, &sig).unwrap_err();
        assert_eq!(err.step(), Some(OverlayStep::Signature));
        assert!(matches!(err, SignError::BuildOverlay { .. }));
    }

    #[test]
    fn dates_use_day_month_year() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(format_date(date), "31-12-2025");
    }
}
