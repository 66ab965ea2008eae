//! End-to-end signing scenarios
//!
//! Drives `SigningSession` the way the browser page does: pick a PDF, render
//! page 1, pick a signature, drag/resize it, save.

use lopdf::{Document, Object};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sigstamp_core::{
    LoadOutcome, PointerEvent, PointerTarget, Raster, Rect, SigningSession, Size, SourceDocument,
    StampConfig,
};

const PDF: &str = "application/pdf";
const PNG: &str = "image/png";

/// Stand-in for pdf.js decoding the selected file
fn load(session: &mut SigningSession, name: &str) {
    let ticket = session.begin_document_load(name, PDF).unwrap();
    let document = SourceDocument::new(name, 1).unwrap();
    assert!(session.complete_document_load(ticket, document));
}

fn signature_png(width: u32, height: u32) -> Vec<u8> {
    Raster::filled(width, height, [0, 0, 0, 255])
        .encode_png()
        .unwrap()
}

/// Stand-in for pdf.js rendering: a white page of native size `page` at the
/// requested zoom
fn render(session: &mut SigningSession, page: Size) {
    let request = session.begin_render().unwrap();
    let raster = Raster::filled(
        (page.width * request.zoom).round() as u32,
        (page.height * request.zoom).round() as u32,
        [255, 255, 255, 255],
    );
    assert!(session.complete_render(request, raster));
}

fn media_box(bytes: &[u8]) -> Vec<f64> {
    let doc = Document::load_mem(bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);
    let page = doc.get_object(pages[&1]).unwrap().as_dict().unwrap();
    page.get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|o| match o {
            Object::Integer(i) => *i as f64,
            Object::Real(r) => *r as f64,
            other => panic!("unexpected MediaBox entry {:?}", other),
        })
        .collect()
}

#[test]
fn page_600x800_at_default_zoom() {
    let mut session = SigningSession::default();
    load(&mut session, "lease.pdf");
    render(&mut session, Size::new(600.0, 800.0));
    assert_eq!(session.surface().unwrap().size(), Size::new(900.0, 1200.0));

    let outcome = session
        .load_signature("sig.png", PNG, &signature_png(300, 120))
        .unwrap();
    assert_eq!(outcome, LoadOutcome::Loaded);
    assert!(session.can_export());

    let artifact = session.export().unwrap().unwrap();
    assert_eq!(artifact.filename, "signed-document.pdf");
    assert_eq!(artifact.layout.page_size, Size::new(600.0, 800.0));

    let overlay = artifact.layout.overlay;
    assert!((overlay.x - 33.333).abs() < 0.001);
    assert!((overlay.y - 33.333).abs() < 0.001);
    assert!((overlay.width - 100.0).abs() < 1e-9);
    // 150px wide at 5:2 -> 60px tall on screen -> 40 units in the document
    assert!((overlay.height - 40.0).abs() < 1e-9);

    assert_eq!(media_box(&artifact.bytes), vec![0.0, 0.0, 600.0, 800.0]);
}

#[test]
fn drag_and_resize_then_export() {
    let mut session = SigningSession::default();
    load(&mut session, "lease.pdf");
    render(&mut session, Size::new(600.0, 800.0));
    session
        .load_signature("sig.png", PNG, &signature_png(100, 50))
        .unwrap();

    // Drag the body 300px right and 600px down
    session.pointer(PointerEvent::down(100.0, 100.0, PointerTarget::OverlayBody));
    session.pointer(PointerEvent::moved(400.0, 700.0));
    session.pointer(PointerEvent::up(400.0, 700.0));

    // Widen by 150px from the handle
    session.pointer(PointerEvent::down(500.0, 725.0, PointerTarget::ResizeHandle));
    let placement = session
        .pointer(PointerEvent::moved(650.0, 9999.0))
        .unwrap();
    session.pointer(PointerEvent::up(650.0, 9999.0));

    assert_eq!(placement.rect(), Rect::new(350.0, 650.0, 300.0, 150.0));
    assert!(session.gesture().is_idle());

    let artifact = session.export().unwrap().unwrap();
    assert_eq!(
        artifact.layout.overlay,
        Rect::new(350.0, 650.0, 300.0, 150.0).unscaled(1.5)
    );
}

#[test]
fn export_is_noop_until_both_inputs_exist() {
    let mut session = SigningSession::default();
    assert!(session.export().unwrap().is_none());

    load(&mut session, "lease.pdf");
    render(&mut session, Size::new(600.0, 800.0));
    assert!(!session.can_export());
    assert!(session.export().unwrap().is_none());

    session
        .load_signature("sig.png", PNG, &signature_png(10, 10))
        .unwrap();
    assert!(session.export().unwrap().is_some());

    session.clear_signature();
    assert!(session.export().unwrap().is_none());
}

#[test]
fn custom_zoom_and_filename() {
    let config = StampConfig::from_json(r#"{"zoom": 2.0, "output_filename": "out.pdf"}"#).unwrap();
    let mut session = SigningSession::new(config).unwrap();
    load(&mut session, "a4.pdf");
    render(&mut session, Size::new(595.0, 842.0));
    assert_eq!(session.surface().unwrap().size(), Size::new(1190.0, 1684.0));

    session
        .load_signature("sig.png", PNG, &signature_png(10, 10))
        .unwrap();
    let artifact = session.export().unwrap().unwrap();
    assert_eq!(artifact.filename, "out.pdf");
    assert_eq!(artifact.layout.page_size, Size::new(595.0, 842.0));
    assert_eq!(artifact.layout.overlay, Rect::new(25.0, 25.0, 75.0, 75.0));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any sequence of drags keeps the overlay within the surface
    #[test]
    fn drags_never_escape_surface(
        moves in prop::collection::vec((-2000.0f64..2000.0, -2000.0f64..2000.0), 1..8),
    ) {
        let mut session = SigningSession::default();
        load(&mut session, "p.pdf");
        render(&mut session, Size::new(400.0, 400.0));
        session.load_signature("s.png", PNG, &signature_png(40, 20)).unwrap();

        for (dx, dy) in moves {
            let start = session.overlay().unwrap();
            let (x, y) = (start.left + 10.0, start.top + 10.0);
            session.pointer(PointerEvent::down(x, y, PointerTarget::OverlayBody));
            session.pointer(PointerEvent::moved(x + dx, y + dy));
            session.pointer(PointerEvent::up(x + dx, y + dy));

            let p = session.overlay().unwrap();
            prop_assert!(p.left >= 0.0 && p.left <= 600.0 - p.width);
            prop_assert!(p.top >= 0.0 && p.top <= 600.0 - p.height());
        }
    }
}
