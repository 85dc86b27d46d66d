//! View tests - session to framebuffer, and frame encoding

use blockfall::core::Session;
use blockfall::term::{
    encode_diff_into, encode_full_into, CellStyle, FieldView, FrameBuffer, RunStats, Viewport,
};
use blockfall::types::Command;

fn screen_text(fb: &FrameBuffer) -> String {
    (0..fb.height()).map(|y| fb.row_text(y) + "\n").collect()
}

#[test]
fn test_render_fills_the_viewport() {
    let mut session = Session::new(1, 1);
    // Two rows down every kind has cells in the visible rows
    session.update(2.0);
    let fb = FieldView::default().render(&session, Viewport::new(80, 24));
    assert_eq!((fb.width(), fb.height()), (80, 24));
    let text = screen_text(&fb);
    assert!(text.contains('┌'));
    assert!(text.contains('█'), "active piece drawn");
    assert!(text.contains('░'), "ghost drawn");
}

/// Text directly below the panel label `label`
fn panel_value(fb: &FrameBuffer, label: &str) -> Option<String> {
    (0..fb.height()).find_map(|y| {
        let text = fb.row_text(y);
        let byte_at = text.find(label)?;
        let col = text[..byte_at].chars().count();
        let below: Vec<char> = fb.row_text(y + 1).chars().collect();
        Some(below[col..].iter().take_while(|c| **c != ' ').collect())
    })
}

#[test]
fn test_panel_lists_hold_and_queue() {
    let mut session = Session::new(9, 1);
    let view = FieldView::default();
    let fb = view.render(&session, Viewport::new(80, 24));
    assert_eq!(panel_value(&fb, "HOLD").as_deref(), Some("-"));
    assert_eq!(
        panel_value(&fb, "NEXT").as_deref(),
        Some(session.queue()[0].kind().as_str())
    );

    let held = session.active().kind();
    session.handle(Command::Hold);
    let fb = view.render(&session, Viewport::new(80, 24));
    assert_eq!(panel_value(&fb, "HOLD").as_deref(), Some(held.as_str()));
}

#[test]
fn test_run_stats_add_rows_entry() {
    let session = Session::new(1, 1);
    let view = FieldView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let stats = RunStats { rows_cleared: 4321 };
    view.render_into_with_stats(&session, Some(&stats), Viewport::new(80, 24), &mut fb);
    let text = screen_text(&fb);
    assert!(text.contains("ROWS"));
    assert!(text.contains("4321"));

    view.render_into(&session, Viewport::new(80, 24), &mut fb);
    assert!(!screen_text(&fb).contains("ROWS"));
}

#[test]
fn test_game_over_overlay() {
    let mut session = Session::new(1, 1);
    for _ in 0..60 {
        if session.is_loss() {
            break;
        }
        session.handle(Command::HardDrop);
    }
    assert!(session.is_loss());
    let fb = FieldView::default().render(&session, Viewport::new(80, 24));
    assert!(screen_text(&fb).contains("GAME OVER"));
}

#[test]
fn test_locked_cells_appear_at_the_bottom() {
    let mut session = Session::new(4, 1);
    let view = FieldView::default();
    let before = view.render(&session, Viewport::new(80, 24));
    session.handle(Command::HardDrop);
    let after = view.render(&session, Viewport::new(80, 24));

    // Bottom well row sits just above the lower border
    let bottom = (0..after.height())
        .rev()
        .find(|&y| after.row_text(y).contains('└'))
        .expect("lower border")
        - 1;
    assert!(!before.row_text(bottom).contains('█'));
    assert!(after.row_text(bottom).contains('█'));
}

#[test]
fn test_diff_of_identical_frames_is_cheaper_than_full() {
    let session = Session::new(1, 1);
    let fb = FieldView::default().render(&session, Viewport::new(40, 24));
    let mut full = Vec::new();
    let mut diff = Vec::new();
    encode_full_into(&fb, &mut full).expect("encode full");
    encode_diff_into(&fb, &fb, &mut diff).expect("encode diff");
    assert!(!full.is_empty());
    assert!(diff.len() < full.len());
}

#[test]
fn test_diff_contains_changed_glyph() {
    let prev = FrameBuffer::new(10, 2);
    let mut next = prev.clone();
    next.put_char(4, 1, 'Q', CellStyle::default());
    let mut out = Vec::new();
    encode_diff_into(&prev, &next, &mut out).expect("encode diff");
    assert!(String::from_utf8_lossy(&out).contains('Q'));
}
