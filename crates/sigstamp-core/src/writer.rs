//! Single-page PDF output
//!
//! The flattened raster becomes one image XObject stretched over a page whose
//! MediaBox is the native (unzoomed) page size.

use crate::coords::Size;
use crate::error::StampError;
use crate::raster::Raster;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::io::Write;

const IMAGE_NAME: &str = "Im0";

/// Write `raster` as the full-page image of a new one-page PDF
///
/// # Errors
///
/// Returns `StampError::Write` if the page size is not positive or
/// serialization fails.
pub fn write_single_page_pdf(raster: &Raster, page_size: Size) -> Result<Vec<u8>, StampError> {
    if !(page_size.width > 0.0 && page_size.height > 0.0) {
        return Err(StampError::Write(format!(
            "Invalid page size {}x{}",
            page_size.width, page_size.height
        )));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = add_image(&mut doc, raster)?;

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(page_size.width as f32),
                    0.into(),
                    0.into(),
                    Object::Real(page_size.height as f32),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_bytes = content
        .encode()
        .map_err(|e| StampError::Write(format!("Failed to encode content: {}", e)))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content_bytes));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            0.into(),
            0.into(),
            Object::Real(page_size.width as f32),
            Object::Real(page_size.height as f32),
        ],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                IMAGE_NAME => image_id,
            },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| StampError::Write(e.to_string()))?;
    Ok(buffer)
}

/// Add the raster as an RGB image, with an SMask when it has transparency
fn add_image(doc: &mut Document, raster: &Raster) -> Result<lopdf::ObjectId, StampError> {
    let pixels = raster.pixels();
    let rgb: Vec<u8> = pixels
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut image_dict = image_dictionary(raster, "DeviceRGB");

    if !raster.is_opaque() {
        let alpha: Vec<u8> = pixels.chunks_exact(4).map(|px| px[3]).collect();
        let smask_id = doc.add_object(Stream::new(
            image_dictionary(raster, "DeviceGray"),
            deflate(&alpha)?,
        ));
        image_dict.set("SMask", smask_id);
    }

    Ok(doc.add_object(Stream::new(image_dict, deflate(&rgb)?)))
}

fn image_dictionary(raster: &Raster, color_space: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => raster.width() as i64,
        "Height" => raster.height() as i64,
        "ColorSpace" => Object::Name(color_space.as_bytes().to_vec()),
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, StampError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| StampError::Write(format!("Compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| StampError::Write(format!("Compression failed: {}", e)))
}
