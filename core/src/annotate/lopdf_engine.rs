//! `DocumentEngine` backed by lopdf.
//!
//! Text is drawn with a standard Type1 font (WinAnsi encoded); images are embedded as an RGB
//! XObject with a DeviceGray soft mask. The page's existing content is wrapped in `q`/`Q` so
//! that a transform left behind by the original content cannot displace the overlay.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::error::EngineError;

use super::engine::DocumentEngine;
use super::overlay::{OverlayContent, OverlaySpec};

const MAX_TREE_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfEngine;

impl LopdfEngine {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentEngine for LopdfEngine {
    fn page_count(&self, document: &[u8]) -> Result<u32, EngineError> {
        let doc = load(document)?;
        Ok(doc.get_pages().len() as u32)
    }

    fn apply(&self, document: &[u8], overlay: &OverlaySpec) -> Result<Vec<u8>, EngineError> {
        let mut doc = load(document)?;
        let pages = doc.get_pages();
        let page_id = *pages
            .get(&overlay.page)
            .ok_or(EngineError::PageOutOfRange {
                page: overlay.page,
                count: pages.len() as u32,
            })?;

        let frame = page_frame(&doc, page_id);
        let (x, y) = frame.anchor(overlay.offset.x, overlay.offset.y);
        let (sin, cos) = (overlay.rotation + frame.rotate as f32)
            .to_radians()
            .sin_cos();

        let operations = match &overlay.content {
            OverlayContent::Text { text, font, points } => {
                let font_id = doc.add_object(dictionary! {
                    "Type" => "Font",
                    "Subtype" => "Type1",
                    "BaseFont" => Object::Name(font.as_bytes().to_vec()),
                    "Encoding" => "WinAnsiEncoding",
                });
                let name = register_resource(&mut doc, page_id, "Font", "FHs", font_id)?;
                vec![
                    Operation::new("q", vec![]),
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec![Object::Name(name.into_bytes()), Object::Real(*points)]),
                    Operation::new("Tm", matrix(cos, sin, -sin, cos, x, y)),
                    Operation::new(
                        "Tj",
                        vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                    ),
                    Operation::new("ET", vec![]),
                    Operation::new("Q", vec![]),
                ]
            }
            OverlayContent::Image { data, scale, .. } => {
                let (image_id, width, height) = embed_image(&mut doc, data)?;
                let name = register_resource(&mut doc, page_id, "XObject", "ImHs", image_id)?;
                let w = width as f32 * scale;
                let h = height as f32 * scale;
                vec![
                    Operation::new("q", vec![]),
                    Operation::new("cm", matrix(w * cos, w * sin, -h * sin, h * cos, x, y)),
                    Operation::new("Do", vec![Object::Name(name.into_bytes())]),
                    Operation::new("Q", vec![]),
                ]
            }
        };

        let content = Content { operations }
            .encode()
            .map_err(|e| EngineError::Serialize(e.to_string()))?;
        append_isolated_contents(&mut doc, page_id, content)?;
        reset_trailer(&mut doc);

        let mut out = Vec::new();
        doc.save_to(&mut out)
            .map_err(|e| EngineError::Serialize(e.to_string()))?;
        Ok(out)
    }
}

fn load(document: &[u8]) -> Result<Document, EngineError> {
    Document::load_mem(document).map_err(|e| EngineError::Parse(e.to_string()))
}

fn matrix(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Vec<Object> {
    [a, b, c, d, e, f].into_iter().map(Object::Real).collect()
}

/// Keys that describe the xref section the document was read from. The writer produces a
/// single fresh section, so none of them may survive into the output trailer.
const STALE_TRAILER_KEYS: [&[u8]; 8] = [
    b"Prev",
    b"XRefStm",
    b"Type",
    b"W",
    b"Index",
    b"Filter",
    b"DecodeParms",
    b"Length",
];

fn reset_trailer(doc: &mut Document) {
    for key in STALE_TRAILER_KEYS {
        doc.trailer.remove(key);
    }
}

/// The visible area of a page and the clockwise rotation it is displayed with.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PageFrame {
    llx: f32,
    lly: f32,
    urx: f32,
    ury: f32,
    /// One of 0, 90, 180 or 270.
    rotate: i64,
}

impl PageFrame {
    /// Map an offset from the bottom-left corner of the page as displayed into user space.
    fn anchor(&self, dx: f32, dy: f32) -> (f32, f32) {
        match self.rotate {
            90 => (self.urx - dy, self.lly + dx),
            180 => (self.urx - dx, self.ury - dy),
            270 => (self.llx + dy, self.ury - dx),
            _ => (self.llx + dx, self.lly + dy),
        }
    }
}

/// CropBox (falling back to MediaBox, then US Letter) and Rotate of a page, following
/// inheritance through the page tree.
fn page_frame(doc: &Document, page_id: ObjectId) -> PageFrame {
    let [llx, lly, urx, ury] = inherited_attribute(doc, page_id, b"CropBox")
        .and_then(rectangle)
        .or_else(|| inherited_attribute(doc, page_id, b"MediaBox").and_then(rectangle))
        .unwrap_or([0.0, 0.0, 612.0, 792.0]);
    let rotate = inherited_attribute(doc, page_id, b"Rotate")
        .and_then(obj_to_f32)
        .map(|r| (r as i64).rem_euclid(360))
        .filter(|r| r % 90 == 0)
        .unwrap_or(0);
    PageFrame {
        llx,
        lly,
        urx,
        ury,
        rotate,
    }
}

/// Look `key` up on the page, then on its ancestors, resolving a top-level reference.
fn inherited_attribute<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = Some(page_id);
    for _ in 0..MAX_TREE_DEPTH {
        let id = current?;
        let dict = doc.get_object(id).and_then(Object::as_dict).ok()?;
        if let Ok(raw) = dict.get(key) {
            return match raw {
                Object::Reference(target) => doc.get_object(*target).ok(),
                other => Some(other),
            };
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

/// Normalised `[llx, lly, urx, ury]` of a rectangle array.
fn rectangle(obj: &Object) -> Option<[f32; 4]> {
    let arr = obj.as_array().ok()?;
    if arr.len() != 4 {
        return None;
    }
    let (a, b) = (obj_to_f32(&arr[0])?, obj_to_f32(&arr[1])?);
    let (c, d) = (obj_to_f32(&arr[2])?, obj_to_f32(&arr[3])?);
    Some([a.min(c), b.min(d), a.max(c), b.max(d)])
}

fn obj_to_f32(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(f) => Some(*f),
        _ => None,
    }
}

/// Make sure the page owns a Resources entry. Returns the object id when Resources is an
/// indirect dictionary, `None` when it is inline on the page.
fn ensure_page_resources(doc: &mut Document, page_id: ObjectId) -> Result<Option<ObjectId>, EngineError> {
    {
        let page = doc.get_object(page_id)?.as_dict()?;
        match page.get(b"Resources") {
            Ok(Object::Reference(id)) => return Ok(Some(*id)),
            Ok(Object::Dictionary(_)) => return Ok(None),
            _ => {}
        }
    }
    let inherited = inherited_resources(doc, page_id);
    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Resources", Object::Dictionary(inherited));
    Ok(None)
}

fn inherited_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    let mut current = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .ok()
        .and_then(|d| d.get(b"Parent").and_then(Object::as_reference).ok());
    for _ in 0..MAX_TREE_DEPTH {
        let Some(id) = current else { break };
        let Ok(dict) = doc.get_object(id).and_then(Object::as_dict) else {
            break;
        };
        match dict.get(b"Resources") {
            Ok(Object::Dictionary(res)) => return res.clone(),
            Ok(Object::Reference(res_id)) => {
                if let Ok(res) = doc.get_object(*res_id).and_then(Object::as_dict) {
                    return res.clone();
                }
            }
            _ => {}
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    Dictionary::new()
}

fn resources_mut(
    doc: &mut Document,
    page_id: ObjectId,
    location: Option<ObjectId>,
) -> Result<&mut Dictionary, EngineError> {
    match location {
        Some(id) => Ok(doc.get_object_mut(id)?.as_dict_mut()?),
        None => Ok(doc
            .get_object_mut(page_id)?
            .as_dict_mut()?
            .get_mut(b"Resources")?
            .as_dict_mut()?),
    }
}

enum Slot {
    Indirect(ObjectId),
    Inline,
    Missing,
}

/// Insert `target` into the page's `category` resource dictionary under a fresh name.
fn register_resource(
    doc: &mut Document,
    page_id: ObjectId,
    category: &str,
    prefix: &str,
    target: ObjectId,
) -> Result<String, EngineError> {
    let location = ensure_page_resources(doc, page_id)?;
    let slot = {
        let resources = resources_mut(doc, page_id, location)?;
        match resources.get(category.as_bytes()) {
            Ok(Object::Reference(id)) => Slot::Indirect(*id),
            Ok(Object::Dictionary(_)) => Slot::Inline,
            _ => Slot::Missing,
        }
    };

    let entries = match slot {
        Slot::Indirect(id) => doc.get_object_mut(id)?.as_dict_mut()?,
        Slot::Inline => resources_mut(doc, page_id, location)?
            .get_mut(category.as_bytes())?
            .as_dict_mut()?,
        Slot::Missing => {
            let resources = resources_mut(doc, page_id, location)?;
            resources.set(category, Object::Dictionary(Dictionary::new()));
            resources.get_mut(category.as_bytes())?.as_dict_mut()?
        }
    };

    let name = unique_name(entries, prefix);
    entries.set(name.clone(), Object::Reference(target));
    Ok(name)
}

fn unique_name(dict: &Dictionary, prefix: &str) -> String {
    let mut n = 0usize;
    loop {
        let candidate = format!("{prefix}{n}");
        if !dict.has(candidate.as_bytes()) {
            return candidate;
        }
        n += 1;
    }
}

fn embed_image(doc: &mut Document, data: &[u8]) -> Result<(ObjectId, u32, u32), EngineError> {
    let img = image::load_from_memory(data)
        .map_err(|e| EngineError::Image(e.to_string()))?
        .to_rgba8();
    let (width, height) = img.dimensions();

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    for pixel in img.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }

    let smask_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        },
        deflate(&alpha)?,
    ));

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
            "SMask" => Object::Reference(smask_id),
        },
        deflate(&rgb)?,
    ));

    Ok((image_id, width, height))
}

fn deflate(raw: &[u8]) -> Result<Vec<u8>, EngineError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(raw)
        .map_err(|e| EngineError::Serialize(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| EngineError::Serialize(e.to_string()))
}

/// Wrap the existing page content in `q`/`Q` and append `content` after it.
fn append_isolated_contents(
    doc: &mut Document,
    page_id: ObjectId,
    content: Vec<u8>,
) -> Result<(), EngineError> {
    let existing = {
        let page = doc.get_object(page_id)?.as_dict()?;
        match page.get(b"Contents") {
            Ok(Object::Reference(id)) => match doc.get_object(*id) {
                Ok(Object::Array(items)) => items.clone(),
                _ => vec![Object::Reference(*id)],
            },
            Ok(Object::Array(items)) => items.clone(),
            _ => Vec::new(),
        }
    };

    let overlay_id = doc.add_object(Stream::new(dictionary! {}, content));
    let mut contents = Vec::with_capacity(existing.len() + 3);
    if !existing.is_empty() {
        let save_id = doc.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
        let restore_id = doc.add_object(Stream::new(dictionary! {}, b"\nQ\n".to_vec()));
        contents.push(Object::Reference(save_id));
        contents.extend(existing);
        contents.push(Object::Reference(restore_id));
    }
    contents.push(Object::Reference(overlay_id));

    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Contents", Object::Array(contents));
    Ok(())
}

/// Encode `text` for a WinAnsiEncoding font. Unmappable characters become `?`.
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch as u32 {
            0x20..=0x7e | 0xa0..=0xff => ch as u32 as u8,
            _ => win_ansi_extra(ch).unwrap_or(b'?'),
        })
        .collect()
}

fn win_ansi_extra(ch: char) -> Option<u8> {
    let byte = match ch {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => return None,
    };
    Some(byte)
}
