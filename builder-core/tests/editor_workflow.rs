//! Editor Workflow Integration Tests
//!
//! Drives an [`EditorSession`] the way a host would:
//! - Palette drop, config editor commit
//! - Mouse and touch drags clamped to the canvas
//! - Keyboard delete on the selection
//! - Save lifecycle and export round-trip

use builder_core::{
    CanvasSize, EditorSession, Element, ElementId, ElementStore, ElementType, EventResponse,
    ExportDocument, Field, ImageData, InputEvent, PointerPhase, SaveOutcome, TouchEvent,
    TouchPhase, WorkspaceDocument,
};

const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

fn empty_workspace() -> WorkspaceDocument {
    WorkspaceDocument::from_json(
        r##"{
            "id": "ws-42",
            "name": "Launch Page",
            "elements": [],
            "canvasColor": "#fdfdfd",
            "createdAt": "2024-05-01T10:00:00.000Z",
            "updatedAt": "2024-05-02T10:00:00.000Z",
            "user": "user-7"
        }"##,
    )
    .expect("workspace json")
}

fn open_session() -> EditorSession {
    EditorSession::from_workspace(empty_workspace(), CanvasSize::new(500.0, 500.0))
}

/// Drop a palette item and commit it with `fill` applied to the form.
fn place(
    session: &mut EditorSession,
    element_type: ElementType,
    x: f64,
    y: f64,
    fill: impl FnOnce(&mut builder_core::ConfigEditor),
) -> ElementId {
    session.drop_palette_item(element_type, x, y);
    fill(session.editor_mut().expect("editor open"));
    session.commit_editor().expect("commit")
}

fn click(session: &mut EditorSession, x: f64, y: f64) {
    session.handle_input(&InputEvent::pointer(PointerPhase::Down, x, y));
    session.handle_input(&InputEvent::pointer(PointerPhase::Up, x, y));
}

fn position(session: &EditorSession, id: &ElementId) -> (f64, f64) {
    let b = session.store().get(id).expect("element exists").bounds;
    (b.x, b.y)
}

// ============================================================================
// Drag Tests
// ============================================================================

#[test]
fn test_mouse_drag_is_clamped_to_canvas() {
    let mut session = open_session();
    let id = place(&mut session, ElementType::Button, 100.0, 100.0, |form| {
        form.set(Field::Content, "Sign up").expect("visible");
    });

    session.handle_input(&InputEvent::pointer(PointerPhase::Down, 110.0, 110.0));
    session.handle_input(&InputEvent::pointer(PointerPhase::Move, -40.0, -40.0));
    assert_eq!(position(&session, &id), (0.0, 0.0));

    session.handle_input(&InputEvent::pointer(PointerPhase::Move, 710.0, 710.0));
    assert_eq!(position(&session, &id), (400.0, 460.0));

    session.handle_input(&InputEvent::pointer(PointerPhase::Up, 710.0, 710.0));
    session.handle_input(&InputEvent::pointer(PointerPhase::Move, 200.0, 200.0));
    assert_eq!(position(&session, &id), (400.0, 460.0));
    assert!(!session.is_dragging());
}

#[test]
fn test_touch_drag_suppresses_scroll() {
    let mut session = open_session();
    let id = place(&mut session, ElementType::Shape, 10.0, 10.0, |_| {});

    let start = TouchEvent::single(TouchPhase::Start, 20.0, 20.0);
    let response = session.handle_input(&InputEvent::Touch(start));
    assert_eq!(response, EventResponse::CONSUMED);

    let moved = TouchEvent::single(TouchPhase::Move, 70.0, 45.0);
    let response = session.handle_input(&InputEvent::Touch(moved));
    assert!(response.prevent_default);
    assert_eq!(position(&session, &id), (60.0, 35.0));

    let cancel = TouchEvent::single(TouchPhase::Cancel, 70.0, 45.0);
    session.handle_input(&InputEvent::Touch(cancel));
    assert!(!session.is_dragging());
}

#[test]
fn test_resize_handle_keeps_origin() {
    let mut session = open_session();
    let id = place(&mut session, ElementType::Input, 350.0, 100.0, |form| {
        form.set(Field::Content, "Email").expect("visible");
    });
    click(&mut session, 360.0, 110.0);

    // Handle is centred on the bottom-right corner (450, 140).
    session.handle_input(&InputEvent::pointer(PointerPhase::Down, 450.0, 140.0));
    session.handle_input(&InputEvent::pointer(PointerPhase::Move, 650.0, 160.0));
    session.handle_input(&InputEvent::pointer(PointerPhase::Up, 650.0, 160.0));

    let b = session.store().get(&id).expect("element exists").bounds;
    assert_eq!((b.x, b.y), (350.0, 100.0));
    assert!((b.width - 150.0).abs() < f64::EPSILON);
    assert!((b.height - 60.0).abs() < f64::EPSILON);
}

// ============================================================================
// Store and Keyboard Tests
// ============================================================================

#[test]
fn test_duplicate_id_leaves_store_unchanged() {
    let mut store = ElementStore::new(CanvasSize::new(500.0, 500.0));
    let id = ElementId::from_raw(1_700_000_000_000);
    store
        .add(Element::draft(id.clone(), ElementType::Shape, 0.0, 0.0))
        .expect("first add");

    let result = store.add(Element::draft(id, ElementType::Label, 50.0, 50.0));
    assert!(result.is_err());
    assert_eq!(store.len(), 1);
    assert_eq!(store.list()[0].element_type(), ElementType::Shape);
}

#[test]
fn test_delete_selected_then_delete_again() {
    let mut session = open_session();
    let a = place(&mut session, ElementType::Shape, 0.0, 0.0, |_| {});
    let b = place(&mut session, ElementType::Shape, 200.0, 200.0, |_| {});

    click(&mut session, 10.0, 10.0);
    assert_eq!(session.store().selected_id(), Some(&a));

    session.handle_input(&InputEvent::key_press("Delete"));
    assert!(!session.store().contains(&a));
    assert_eq!(session.store().selected_id(), None);

    let revision = session.store().revision();
    session.handle_input(&InputEvent::key_press("Delete"));
    assert_eq!(session.store().revision(), revision);
    assert!(session.store().contains(&b));
}

#[test]
fn test_click_empty_canvas_clears_selection() {
    let mut session = open_session();
    place(&mut session, ElementType::Shape, 0.0, 0.0, |_| {});
    click(&mut session, 10.0, 10.0);
    assert!(session.store().selected_id().is_some());

    click(&mut session, 450.0, 450.0);
    assert_eq!(session.store().selected_id(), None);
}

#[test]
fn test_enter_edits_selected_element() {
    let mut session = open_session();
    let id = place(&mut session, ElementType::Label, 30.0, 30.0, |form| {
        form.set(Field::Content, "Hello").expect("visible");
    });
    click(&mut session, 31.0, 31.0);

    session.handle_input(&InputEvent::key_press("Enter"));
    let form = session.editor_mut().expect("editor open");
    assert_eq!(form.value(Field::Content), Some("Hello"));
    form.set(Field::Content, "Hello, world").expect("visible");
    session.commit_editor().expect("commit");

    let element = session.store().get(&id).expect("element exists");
    assert_eq!(element.kind.text(), Some("Hello, world"));
    assert_eq!(session.store().len(), 1);
}

// ============================================================================
// Config Editor Tests
// ============================================================================

#[test]
fn test_label_without_size_input_without_width() {
    let mut session = open_session();
    session.drop_palette_item(ElementType::Label, 0.0, 0.0);
    let form = session.editor_mut().expect("editor open");
    assert!(!form.fields().contains(&Field::Width));
    form.set(Field::Content, "Title").expect("visible");
    assert!(session.commit_editor().is_ok());

    session.drop_palette_item(ElementType::Input, 0.0, 0.0);
    let form = session.editor_mut().expect("editor open");
    form.set(Field::Content, "Name").expect("visible");
    form.set(Field::Width, "").expect("visible");
    assert!(session.commit_editor().is_err());
    assert!(session.editor().is_some());
    assert_eq!(session.store().len(), 1);
}

#[test]
fn test_image_embedding() {
    let mut session = open_session();
    let image = ImageData::from_bytes(PNG_HEADER).expect("png");
    let id = place(&mut session, ElementType::Image, 5.0, 5.0, |form| {
        form.set_image(image).expect("image field");
    });
    let json = serde_json::to_value(session.store().get(&id).expect("exists")).expect("json");
    assert!(json["content"]
        .as_str()
        .is_some_and(|s| s.starts_with("data:image/png;base64,")));
}

// ============================================================================
// Save and Export Tests
// ============================================================================

#[test]
fn test_save_clears_dirty_until_next_mutation() {
    let mut session = open_session();
    let id = place(&mut session, ElementType::Shape, 0.0, 0.0, |_| {});
    assert!(session.is_dirty());

    let ticket = session.begin_save().expect("dirty");
    assert_eq!(ticket.workspace_id(), "ws-42");
    assert_eq!(ticket.body().elements.len(), 1);
    let outcome = session.finish_save(ticket, Ok(()));
    assert_eq!(outcome, SaveOutcome::Saved { still_dirty: false });
    assert!(!session.is_dirty());

    let _ = session.export();
    assert!(!session.is_dirty());

    click(&mut session, 5.0, 5.0);
    session.handle_input(&InputEvent::key_press("Delete"));
    assert!(!session.store().contains(&id));
    assert!(session.is_dirty());

    let _ = session.export();
    assert!(session.is_dirty());
}

#[test]
fn test_export_round_trips_into_fresh_store() {
    let mut session = open_session();
    place(&mut session, ElementType::Label, 10.0, 10.0, |form| {
        form.set(Field::Content, "Welcome").expect("visible");
        form.set(Field::FontWeight, "bold").expect("visible");
    });
    place(&mut session, ElementType::Button, 40.0, 80.0, |form| {
        form.set(Field::Content, "Start").expect("visible");
        form.set(Field::Color, "#3366ff").expect("visible");
    });
    place(&mut session, ElementType::Shape, 300.0, 300.0, |form| {
        form.set(Field::ShapeKind, "circle").expect("visible");
    });

    let export = session.export();
    assert_eq!(export.file_name(), "Launch Page_export.json");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(export.file_name());
    std::fs::write(&path, export.to_json_pretty().expect("json")).expect("write");
    let text = std::fs::read_to_string(&path).expect("read");

    let parsed: ExportDocument = serde_json::from_str(&text).expect("parse export");
    assert_eq!(parsed.canvas_color, "#fdfdfd");
    assert_eq!(parsed.user_id, serde_json::json!("user-7"));

    let fresh = ElementStore::load(parsed.elements, CanvasSize::new(500.0, 500.0));
    assert_eq!(fresh.list(), session.store().list());
}
