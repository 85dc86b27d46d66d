//! FieldView: maps a `core::Session` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{Grid, Piece, PieceSource, Session};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{CellTag, Coord, PieceKind, FIELD_WIDTH, VISIBLE_ROWS};

/// Playable columns (the field minus its side borders).
const COLUMNS: u16 = (FIELD_WIDTH - 2) as u16;
const ROWS: u16 = VISIBLE_ROWS as u16;

const WELL_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Extra numbers the runner tracks outside the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    pub rows_cleared: u32,
}

/// Draws the visible rows, ghost, active piece and a side panel.
pub struct FieldView {
    /// Field cell width in terminal columns.
    cell_w: u16,
    /// Field cell height in terminal rows.
    cell_h: u16,
}

impl Default for FieldView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

/// Top-left of the framed well on screen.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl FieldView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into<S: PieceSource>(
        &self,
        session: &Session<S>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        self.render_into_with_stats(session, None, viewport, fb);
    }

    pub fn render_into_with_stats<S: PieceSource>(
        &self,
        session: &Session<S>,
        stats: Option<&RunStats>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().glyph(' '));

        let w = COLUMNS * self.cell_w + 2;
        let h = ROWS * self.cell_h + 2;
        let frame = Frame {
            x: viewport.width.saturating_sub(w) / 2,
            y: viewport.height.saturating_sub(h) / 2,
            w,
            h,
        };

        let well = CellStyle::new(Rgb::new(80, 80, 90), WELL_BG);
        fb.fill_rect(
            frame.x + 1,
            frame.y + 1,
            COLUMNS * self.cell_w,
            ROWS * self.cell_h,
            ' ',
            well,
        );
        self.draw_border(fb, frame);

        self.draw_field(fb, frame, session.field());

        let ghost = CellStyle::new(Rgb::new(140, 140, 140), WELL_BG).dim();
        self.draw_piece(fb, frame, session.ghost(), session.ghost_position(), |_| {
            ('░', ghost)
        });
        self.draw_piece(fb, frame, session.active(), session.position(), |kind| {
            ('█', piece_style(kind))
        });

        self.draw_side_panel(fb, session, stats, viewport, frame);

        if session.is_paused() {
            self.draw_overlay_text(fb, frame, "PAUSED");
        } else if session.is_loss() {
            self.draw_overlay_text(fb, frame, "GAME OVER");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render<S: PieceSource>(&self, session: &Session<S>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(session, viewport, &mut fb);
        fb
    }

    /// Screen position of field cell (x, y), or None outside the visible rows.
    fn screen_pos(&self, frame: Frame, x: i32, y: i32) -> Option<(u16, u16)> {
        if x < 1 || x > COLUMNS as i32 || y < 1 || y > ROWS as i32 {
            return None;
        }
        let col = (x - 1) as u16;
        let row = ROWS - y as u16;
        Some((
            frame.x + 1 + col * self.cell_w,
            frame.y + 1 + row * self.cell_h,
        ))
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: i32, y: i32, ch: char, style: CellStyle) {
        if let Some((px, py)) = self.screen_pos(frame, x, y) {
            fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
        }
    }

    fn draw_field(&self, fb: &mut FrameBuffer, frame: Frame, field: &Grid) {
        let empty = CellStyle::new(Rgb::new(90, 90, 100), WELL_BG).dim();
        for y in 1..=ROWS as i32 {
            for x in 1..=COLUMNS as i32 {
                let cell = field.cell(x, y);
                match (cell.occupied, cell.tag) {
                    (true, CellTag::Piece(kind)) => {
                        self.fill_cell(fb, frame, x, y, '█', piece_style(kind))
                    }
                    (true, _) => self.fill_cell(
                        fb,
                        frame,
                        x,
                        y,
                        '▓',
                        CellStyle::new(Rgb::new(120, 120, 120), WELL_BG),
                    ),
                    (false, _) => self.fill_cell(fb, frame, x, y, '·', empty),
                }
            }
        }
    }

    fn draw_piece(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        piece: &Piece,
        at: Coord,
        look: impl Fn(PieceKind) -> (char, CellStyle),
    ) {
        let (ch, style) = look(piece.kind());
        for (x, y, _) in piece.grid().occupied_cells() {
            self.fill_cell(fb, frame, at.x + x, at.y + y, ch, style);
        }
    }

    fn draw_border(&self, fb: &mut FrameBuffer, frame: Frame) {
        let Frame { x, y, w, h } = frame;
        let style = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_side_panel<S: PieceSource>(
        &self,
        fb: &mut FrameBuffer,
        session: &Session<S>,
        stats: Option<&RunStats>,
        viewport: Viewport,
        frame: Frame,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 8 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = frame.y;
        let mut entry = |fb: &mut FrameBuffer, name: &str, n: u32| {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), n, value);
            y = y.saturating_add(3);
        };
        entry(fb, "SCORE", session.score());
        entry(fb, "LEVEL", session.level());
        entry(fb, "GOAL", session.goal().max(0) as u32);
        if let Some(stats) = stats {
            entry(fb, "ROWS", stats.rows_cleared);
        }

        fb.put_str(panel_x, y, "HOLD", label);
        let held = session.held().map(|p| p.kind().as_str()).unwrap_or("-");
        let held_style = if session.can_hold() {
            value
        } else {
            value.dim()
        };
        fb.put_str(panel_x, y.saturating_add(1), held, held_style);
        y = y.saturating_add(3);

        fb.put_str(panel_x, y, "NEXT", label);
        for piece in session.queue() {
            y = y.saturating_add(1);
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, piece.kind().as_str(), piece_style(piece.kind()));
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, frame: Frame, text: &str) {
        let mid_y = frame.y.saturating_add(frame.h / 2);
        let text_w = text.chars().count() as u16;
        let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

fn piece_style(kind: PieceKind) -> CellStyle {
    let fg = match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::Z => Rgb::new(220, 80, 80),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
    };
    CellStyle::new(fg, WELL_BG).bold()
}
