//! GameView: maps a `core::SessionSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::placement::fits;
use crate::core::{Shape, SessionSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Glyph, Rgb};
use crate::types::{Color, Point, PopupKind, GRID_SIZE, OFFER_SLOTS};

/// Largest shape extent, in cells, a tray slot has to hold.
const TRAY_BOX: u16 = 5;
/// Blank columns between tray slots.
const TRAY_GAP: u16 = 2;
const PANEL_MIN_W: u16 = 12;

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

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

/// What the keyboard cursor looks like this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorView {
    /// Selected tray slot.
    pub slot: usize,
    /// Anchor of the selected shape while it is being steered over the board.
    pub anchor: Option<Point>,
    pub shaking: bool,
}

/// Screen positions of the parts of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub board_x: u16,
    pub board_y: u16,
    pub frame_w: u16,
    pub frame_h: u16,
    pub tray_x: u16,
    pub tray_y: u16,
    pub panel_x: u16,
    cell_w: u16,
}

impl Layout {
    /// Top-left terminal position of board cell (row, col).
    pub fn cell_origin(&self, row: u16, col: u16) -> (u16, u16) {
        (
            self.board_x + 1 + col * self.cell_w,
            self.board_y + 1 + row,
        )
    }

    /// Top-left terminal position of tray slot `slot`.
    pub fn slot_origin(&self, slot: u16) -> (u16, u16) {
        (
            self.tray_x + slot * (TRAY_BOX * self.cell_w + TRAY_GAP),
            self.tray_y,
        )
    }
}

/// Renders the board, the tray, and the score panel.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    pub fn layout(&self, viewport: Viewport) -> Layout {
        let frame_w = GRID_SIZE as u16 * self.cell_w + 2;
        let frame_h = GRID_SIZE as u16 + 2;
        let tray_w = OFFER_SLOTS as u16 * TRAY_BOX * self.cell_w + (OFFER_SLOTS as u16 - 1) * TRAY_GAP;
        // board, a blank row, the shapes, the selection marker
        let total_h = frame_h + 1 + TRAY_BOX + 1;

        let board_x = viewport.width.saturating_sub(frame_w) / 2;
        let board_y = viewport.height.saturating_sub(total_h) / 2;
        let center_x = board_x + frame_w / 2;

        Layout {
            board_x,
            board_y,
            frame_w,
            frame_h,
            tray_x: center_x.saturating_sub(tray_w / 2),
            tray_y: board_y + frame_h + 1,
            panel_x: board_x.saturating_add(frame_w).saturating_add(3),
            cell_w: self.cell_w,
        }
    }

    /// Render a snapshot into an existing framebuffer.
    ///
    /// Callers can reuse one framebuffer across frames and only resize when
    /// the terminal size changes.
    pub fn render_into(
        &self,
        snap: &SessionSnapshot,
        cursor: Option<&CursorView>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::new(' ', CellStyle::new(SCREEN_BG, SCREEN_BG)));

        let layout = self.layout(viewport);
        let border = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);

        self.draw_border(fb, layout.board_x, layout.board_y, layout.frame_w, layout.frame_h, border);
        self.draw_board(fb, snap, &layout);

        if let Some(cursor) = cursor {
            if let (Some(anchor), Some(shape)) = (cursor.anchor, snap.offer.get(cursor.slot)) {
                let valid = !cursor.shaking && snap.playable() && fits(&snap.board, shape, anchor);
                self.draw_footprint(fb, &layout, shape, anchor, valid);
            }
        }

        self.draw_tray(fb, snap, cursor.map(|c| c.slot), &layout);
        self.draw_popups(fb, snap, &layout);
        self.draw_side_panel(fb, snap, viewport, &layout);

        if snap.game_over {
            self.draw_game_over(fb, snap, &layout);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &SessionSnapshot,
        cursor: Option<&CursorView>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, cursor, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

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

    fn draw_board(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, layout: &Layout) {
        let empty = CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim();
        let flash = CellStyle::new(Rgb::new(255, 255, 255), BOARD_BG).bold();

        for (r, row) in snap.board.rows().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (x, y) = layout.cell_origin(r as u16, c as u16);
                if snap.clearing.contains(r, c) {
                    fb.fill_rect(x, y, self.cell_w, 1, '█', flash);
                } else if let Some(color) = cell {
                    let style = CellStyle::new(color_rgb(*color), BOARD_BG).bold();
                    fb.fill_rect(x, y, self.cell_w, 1, '█', style);
                } else {
                    fb.fill_rect(x, y, self.cell_w, 1, ' ', empty);
                    fb.put_char(x, y, '·', empty);
                }
            }
        }
    }

    fn draw_footprint(
        &self,
        fb: &mut FrameBuffer,
        layout: &Layout,
        shape: &Shape,
        anchor: Point,
        valid: bool,
    ) {
        let fg = if valid {
            color_rgb(shape.color()).scale(70)
        } else {
            Rgb::new(220, 60, 60)
        };
        let style = CellStyle::new(fg, BOARD_BG);
        for (dr, dc) in shape.cells() {
            let p = anchor.offset(dr, dc);
            if p.in_bounds() {
                let (x, y) = layout.cell_origin(p.row as u16, p.col as u16);
                fb.fill_rect(x, y, self.cell_w, 1, '▒', style);
            }
        }
    }

    fn draw_tray(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        selected: Option<usize>,
        layout: &Layout,
    ) {
        let marker = CellStyle::new(Rgb::new(240, 220, 80), SCREEN_BG).bold();
        let used = CellStyle::new(Rgb::new(90, 90, 100), SCREEN_BG).dim();
        let box_w = TRAY_BOX * self.cell_w;

        for (slot, entry) in snap.offer.slots().iter().enumerate() {
            let (x, y) = layout.slot_origin(slot as u16);
            let mid_x = x + box_w / 2;
            let Some(shape) = entry else {
                fb.put_char(mid_x, y + TRAY_BOX / 2, '·', used);
                continue;
            };

            let off_x = (TRAY_BOX.saturating_sub(shape.cols() as u16) * self.cell_w) / 2;
            let off_y = TRAY_BOX.saturating_sub(shape.rows() as u16) / 2;
            let mut style = CellStyle::new(color_rgb(shape.color()), SCREEN_BG);
            if snap.busy {
                style = style.dim();
            }
            for (dr, dc) in shape.cells() {
                let px = x + off_x + dc as u16 * self.cell_w;
                let py = y + off_y + dr as u16;
                fb.fill_rect(px, py, self.cell_w, 1, '█', style);
            }

            if selected == Some(slot) {
                fb.put_char(mid_x, y + TRAY_BOX, '▲', marker);
            }
        }
    }

    fn draw_popups(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, layout: &Layout) {
        for popup in &snap.popups {
            let row = popup.at.row.clamp(0, GRID_SIZE as i32 - 1) as u16;
            let col = popup.at.col.clamp(0, GRID_SIZE as i32 - 1) as u16;
            let (x, y) = layout.cell_origin(row, col);
            let text_w = popup.text.chars().count() as u16;

            // Centre on the cell but stay inside the frame.
            let inner_left = layout.board_x + 1;
            let inner_right = layout.board_x + layout.frame_w - 1;
            let x = (x + self.cell_w / 2)
                .saturating_sub(text_w / 2)
                .min(inner_right.saturating_sub(text_w))
                .max(inner_left);

            let fg = match popup.kind {
                PopupKind::Score => Rgb::new(255, 255, 255),
                PopupKind::Combo => Rgb::new(249, 115, 22),
                PopupKind::Clear => Rgb::new(6, 182, 212),
            };
            fb.put_str(x, y, &popup.text, CellStyle::new(fg, BOARD_BG).bold());
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        viewport: Viewport,
        layout: &Layout,
    ) {
        let panel_x = layout.panel_x;
        if panel_x >= viewport.width || viewport.width - panel_x < PANEL_MIN_W {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), SCREEN_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);
        let hint = value.dim();

        let mut y = layout.board_y;
        fb.put_str(panel_x, y, "SCORE", label);
        y += 1;
        fb.put_u32(panel_x, y, snap.score, value);
        y += 2;

        fb.put_str(panel_x, y, "BEST", label);
        y += 1;
        fb.put_u32(panel_x, y, snap.high_score, value);
        y += 2;

        fb.put_str(panel_x, y, "COMBO", label);
        y += 1;
        if snap.combo > 0 {
            fb.put_char(panel_x, y, 'x', value);
            fb.put_u32(panel_x + 1, y, snap.combo, value);
        } else {
            fb.put_char(panel_x, y, '-', value);
        }
        y += 2;

        for line in ["←→ select", "⏎  pick/place", "esc back", "r  restart", "q  quit"] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, hint);
            y += 1;
        }
    }

    fn draw_game_over(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, layout: &Layout) {
        let mid_y = layout.board_y + layout.frame_h / 2;
        let title = CellStyle::new(Rgb::new(255, 255, 255), SCREEN_BG).bold();
        let body = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);

        self.put_centered(fb, layout, mid_y - 1, "GAME OVER", title);

        // "SCORE " plus the number, centred as a unit
        let digits = count_digits(snap.score);
        let w = 6 + digits;
        let x = layout.board_x + layout.frame_w.saturating_sub(w) / 2;
        fb.put_str(x, mid_y, "SCORE ", body);
        fb.put_u32(x + 6, mid_y, snap.score, body);

        self.put_centered(fb, layout, mid_y + 1, "r: restart", body.dim());
    }

    fn put_centered(&self, fb: &mut FrameBuffer, layout: &Layout, y: u16, text: &str, style: CellStyle) {
        let w = text.chars().count() as u16;
        let x = layout.board_x + layout.frame_w.saturating_sub(w) / 2;
        fb.put_str(x, y, text, style);
    }
}

fn count_digits(mut n: u32) -> u16 {
    let mut d = 1;
    while n >= 10 {
        n /= 10;
        d += 1;
    }
    d
}

/// Terminal color of a shape / board color.
pub fn color_rgb(color: Color) -> Rgb {
    match color {
        Color::Red => Rgb::new(239, 68, 68),
        Color::Orange => Rgb::new(249, 115, 22),
        Color::Yellow => Rgb::new(234, 179, 8),
        Color::Green => Rgb::new(34, 197, 94),
        Color::Cyan => Rgb::new(6, 182, 212),
        Color::Blue => Rgb::new(59, 130, 246),
        Color::Purple => Rgb::new(168, 85, 247),
        Color::Pink => Rgb::new(236, 72, 153),
        Color::Indigo => Rgb::new(99, 102, 241),
        Color::Teal => Rgb::new(20, 184, 166),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Board, Offer, Session};
    use crate::core::shapes::find;

    #[test]
    fn layout_fits_a_standard_terminal() {
        let layout = GameView::default().layout(Viewport::new(80, 24));
        assert_eq!(layout.frame_w, 18);
        assert_eq!(layout.frame_h, 10);
        assert!(layout.tray_y + TRAY_BOX < 24);
        assert_eq!(layout.cell_origin(0, 0), (layout.board_x + 1, layout.board_y + 1));
        assert_eq!(layout.cell_origin(2, 3), (layout.board_x + 7, layout.board_y + 3));
    }

    #[test]
    fn count_digits_matches_put_u32() {
        assert_eq!(count_digits(0), 1);
        assert_eq!(count_digits(9), 1);
        assert_eq!(count_digits(10), 2);
        assert_eq!(count_digits(u32::MAX), 10);
    }

    #[test]
    fn filled_cell_uses_its_color() {
        let mut session = Session::new(1);
        let mut board = Board::new();
        board.set(1, 2, Some(Color::Teal));
        session.set_position(board, Offer::new([find("1x1"), None, None]));

        let view = GameView::default();
        let fb = view.render(&session.snapshot(), None, Viewport::new(80, 24));
        let (x, y) = view.layout(Viewport::new(80, 24)).cell_origin(1, 2);
        let glyph = fb.get(x, y).unwrap();
        assert_eq!(glyph.ch, '█');
        assert_eq!(glyph.style.fg, color_rgb(Color::Teal));
    }

    #[test]
    fn blocked_footprint_is_red() {
        let mut session = Session::new(1);
        let mut board = Board::new();
        board.set(0, 1, Some(Color::Red));
        session.set_position(board, Offer::new([find("2x2"), None, None]));

        let view = GameView::default();
        let viewport = Viewport::new(80, 24);
        let cursor = CursorView {
            slot: 0,
            anchor: Some(Point::new(0, 0)),
            shaking: false,
        };
        let fb = view.render(&session.snapshot(), Some(&cursor), viewport);
        let (x, y) = view.layout(viewport).cell_origin(1, 1);
        let glyph = fb.get(x, y).unwrap();
        assert_eq!(glyph.ch, '▒');
        assert_eq!(glyph.style.fg, Rgb::new(220, 60, 60));
    }
}
