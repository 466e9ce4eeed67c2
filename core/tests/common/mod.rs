use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// Build an A4 document with `pages` pages. Resources and MediaBox live on the Pages node so
/// every page inherits them.
pub fn build_pdf(pages: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for i in 0..pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("Page {}", i + 1))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

pub fn write_pdf(dir: &Path, name: &str, pages: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_pdf(pages)).unwrap();
    path
}

pub fn write_signature_png(dir: &Path) -> PathBuf {
    let path = dir.join("signature.png");
    image::RgbaImage::from_fn(40, 20, |x, _| {
        if x % 2 == 0 {
            image::Rgba([0, 0, 0, 255])
        } else {
            image::Rgba([255, 255, 255, 0])
        }
    })
    .save(&path)
    .unwrap();
    path
}

pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

/// All strings drawn with `Tj` on a page.
pub fn page_texts(doc: &Document, page_id: ObjectId) -> Vec<Vec<u8>> {
    let raw = doc.get_page_content(page_id).unwrap();
    Content::decode(&raw)
        .unwrap()
        .operations
        .into_iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| op.operands.first().and_then(|o| o.as_str().ok()).map(<[u8]>::to_vec))
        .collect()
}

pub fn page_draws_xobject(doc: &Document, page_id: ObjectId) -> bool {
    let raw = doc.get_page_content(page_id).unwrap();
    Content::decode(&raw)
        .unwrap()
        .operations
        .iter()
        .any(|op| op.operator == "Do")
}

/// Append an incremental update to `pdf`: a new Info dictionary, plus an xref section and
/// trailer that chain back to the previous section through `/Prev`.
pub fn append_incremental_update(mut pdf: Vec<u8>) -> Vec<u8> {
    let doc = Document::load_mem(&pdf).unwrap();
    let (root_num, root_gen) = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
    let info_num = doc.max_id + 1;
    let prev = last_startxref(&pdf);

    if !pdf.ends_with(b"\n") {
        pdf.push(b'\n');
    }
    let object_offset = pdf.len();
    pdf.extend_from_slice(
        format!("{info_num} 0 obj\n<< /Producer (timesheet editor) >>\nendobj\n").as_bytes(),
    );
    let xref_offset = pdf.len();
    pdf.extend_from_slice(
        format!(
            "xref\n0 1\n0000000000 65535 f \n{info_num} 1\n{object_offset:010} 00000 n \n\
             trailer\n<< /Size {size} /Root {root_num} {root_gen} R /Info {info_num} 0 R /Prev {prev} >>\n\
             startxref\n{xref_offset}\n%%EOF\n",
            size = info_num + 1,
        )
        .as_bytes(),
    );
    pdf
}

fn last_startxref(pdf: &[u8]) -> usize {
    let marker = b"startxref";
    let at = pdf
        .windows(marker.len())
        .rposition(|w| w == marker)
        .unwrap();
    std::str::from_utf8(&pdf[at + marker.len()..])
        .unwrap()
        .split_whitespace()
        .next()
        .unwrap()
        .parse()
        .unwrap()
}
