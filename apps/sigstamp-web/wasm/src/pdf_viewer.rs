//! PDF.js integration: the rendering surface adapter
//!
//! pdf.js decodes the selected file once into a [`PdfHandle`] and rasterizes
//! pages from it into an offscreen canvas; the pixels come back as
//! `ImageData` and are turned into a core `Raster`.

use js_sys::Uint8Array;
use sigstamp_core::Raster;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

// External JavaScript functions from pdf-bridge.js
#[wasm_bindgen(module = "/www/js/pdf-bridge.js")]
extern "C" {
    #[wasm_bindgen(catch, js_name = initPdfJs)]
    async fn init_pdf_js_internal(worker_src: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_name = loadDocument)]
    async fn load_document_internal(data: Uint8Array) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = pageCount)]
    fn page_count_internal(document: &JsValue) -> u32;

    #[wasm_bindgen(js_name = destroyDocument)]
    fn destroy_document_internal(document: &JsValue);

    #[wasm_bindgen(catch, js_name = renderPage)]
    async fn render_page_internal(
        document: &JsValue,
        page_num: u32,
        scale: f64,
    ) -> Result<JsValue, JsValue>;
}

/// Default pdf.js worker
pub const PDF_WORKER_SRC: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/pdf.js/3.11.174/pdf.worker.min.js";

/// Initialize PDF.js with the default worker
#[wasm_bindgen(js_name = initPdfJs)]
pub async fn init_pdf_js() -> Result<(), JsValue> {
    init_pdf_js_internal(PDF_WORKER_SRC).await?;
    Ok(())
}

/// Initialize PDF.js with a custom worker URL
#[wasm_bindgen(js_name = initPdfJsWithWorker)]
pub async fn init_pdf_js_with_worker(worker_src: &str) -> Result<(), JsValue> {
    init_pdf_js_internal(worker_src).await?;
    Ok(())
}

/// A document decoded by pdf.js (a `PDFDocumentProxy`)
///
/// Clones share the same proxy. [`PdfHandle::destroy`] releases it for all
/// of them.
#[derive(Debug, Clone)]
pub struct PdfHandle {
    proxy: JsValue,
}

impl PdfHandle {
    pub fn page_count(&self) -> u32 {
        page_count_internal(&self.proxy)
    }

    /// Free the worker's copy of the document
    pub fn destroy(self) {
        destroy_document_internal(&self.proxy);
    }
}

/// Decode `bytes` with pdf.js
///
/// A rejection here is a document decode failure.
pub async fn load_document(bytes: &[u8]) -> Result<PdfHandle, JsValue> {
    let data = Uint8Array::new_with_length(bytes.len() as u32);
    data.copy_from(bytes);

    let proxy = load_document_internal(data).await?;
    Ok(PdfHandle { proxy })
}

/// Rasterize one page of a decoded document at `scale`
pub async fn render_page(document: &PdfHandle, page_num: u32, scale: f64) -> Result<Raster, JsValue> {
    let image = render_page_internal(&document.proxy, page_num, scale)
        .await?
        .dyn_into::<ImageData>()?;

    image_data_to_raster(&image)
}

/// Copy canvas pixels into a `Raster`
pub fn image_data_to_raster(image: &ImageData) -> Result<Raster, JsValue> {
    Raster::from_rgba(image.width(), image.height(), image.data().0)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resize `canvas` to the raster and paint it
pub fn paint(canvas: &HtmlCanvasElement, raster: &Raster) -> Result<(), JsValue> {
    canvas.set_width(raster.width());
    canvas.set_height(raster.height());

    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("Canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let image = ImageData::new_with_u8_clamped_array_and_sh(
        wasm_bindgen::Clamped(raster.pixels()),
        raster.width(),
        raster.height(),
    )?;
    ctx.put_image_data(&image, 0.0, 0.0)
}
