use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

use crate::consts::screen;
use crate::geom::{Rect, Vec2};
use crate::text::Monospace;

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    fn term(self) -> CColor {
        CColor::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const LIGHT_GRAY: Rgb = Rgb(211, 211, 211);
pub const BUTTON: Rgb = Rgb(200, 200, 200);
pub const RED: Rgb = Rgb(255, 0, 0);
pub const BLUE: Rgb = Rgb(0, 0, 255);
pub const LETTERBOX: Rgb = Rgb(40, 40, 48);
pub const PLAYER_HI: Rgb = Rgb(90, 120, 255);
pub const OBSTACLE_DARK: Rgb = Rgb(170, 0, 0);
pub const TELEGRAPH: Rgb = Rgb(255, 140, 140);
pub const FLOATING: Rgb = Rgb(232, 232, 240);

// ── Logical to pixel mapping ────────────────────────────────────────────────

/// Largest centred area of the pixel grid with the logical aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub off_x: f32,
    pub off_y: f32,
}

impl Viewport {
    pub fn fit(pw: usize, ph: usize) -> Self {
        let scale = (pw as f32 / screen::WIDTH).min(ph as f32 / screen::HEIGHT);
        Self {
            scale,
            off_x: (pw as f32 - screen::WIDTH * scale) / 2.0,
            off_y: (ph as f32 - screen::HEIGHT * scale) / 2.0,
        }
    }

    pub fn to_px(&self, p: Vec2) -> (f32, f32) {
        (self.off_x + p.x * self.scale, self.off_y + p.y * self.scale)
    }

    pub fn rect_to_px(&self, r: &Rect) -> (i32, i32, i32, i32) {
        let (x0, y0) = self.to_px(Vec2::new(r.left(), r.top()));
        let (x1, y1) = self.to_px(Vec2::new(r.right(), r.bottom()));
        let (x0, y0) = (x0.round() as i32, y0.round() as i32);
        let (x1, y1) = (x1.round() as i32, y1.round() as i32);
        (x0, y0, (x1 - x0).max(1), (y1 - y0).max(1))
    }

    /// Centre of a terminal cell in logical units. A cell is one pixel wide
    /// and two pixels tall.
    pub fn cell_to_logical(&self, column: u16, row: u16) -> Vec2 {
        let px = column as f32 + 0.5;
        let py = row as f32 * 2.0 + 1.0;
        let scale = self.scale.max(f32::EPSILON);
        Vec2::new((px - self.off_x) / scale, (py - self.off_y) / scale)
    }

    /// Metrics of overlay text in logical units.
    pub fn cell_metrics(&self) -> Monospace {
        let scale = self.scale.max(f32::EPSILON);
        Monospace {
            advance: 1.0 / scale,
            line_height: 2.0 / scale,
        }
    }
}

// ── Pixel buffer with half-block rendering ──────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Glyph {
    ch: char,
    fg: Rgb,
}

#[derive(Debug, Clone)]
pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
    /// One slot per terminal cell.
    text: Vec<Option<Glyph>>,
    pub viewport: Viewport,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![LETTERBOX; w * h],
            text: vec![None; w * h.div_ceil(2)],
            viewport: Viewport::fit(w, h),
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        *self = Self::new(w, h);
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    fn rows(&self) -> usize {
        self.h.div_ceil(2)
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// Letterbox everything, then paint the logical screen `bg`.
    pub fn clear(&mut self, bg: Rgb) {
        self.px.fill(LETTERBOX);
        self.text.fill(None);
        self.fill_logical(&Rect::screen(), bg);
    }

    pub fn fill_logical(&mut self, r: &Rect, c: Rgb) {
        let (x, y, w, h) = self.viewport.rect_to_px(r);
        self.fill_rect(x, y, w, h, c);
    }

    /// Straight line between two logical points.
    pub fn line_logical(&mut self, a: Vec2, b: Vec2, c: Rgb) {
        let (x0, y0) = self.viewport.to_px(a);
        let (x1, y1) = self.viewport.to_px(b);
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as i32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = x0 + (x1 - x0) * t;
            let y = y0 + (y1 - y0) * t;
            self.set(x as i32, y as i32, c);
        }
    }

    /// Overlay text starting at a logical point. Characters outside the
    /// buffer are dropped.
    pub fn text(&mut self, at: Vec2, s: &str, fg: Rgb) {
        let (px, py) = self.viewport.to_px(at);
        let row = (py / 2.0).floor() as i32;
        let col0 = px.round() as i32;
        if row < 0 || row as usize >= self.rows() {
            return;
        }
        for (i, ch) in s.chars().enumerate() {
            let col = col0 + i as i32;
            if col < 0 || col as usize >= self.w {
                continue;
            }
            let ch = if ch.is_ascii_graphic() || ch == ' ' { ch } else { '?' };
            self.text[row as usize * self.w + col as usize] = Some(Glyph { ch, fg });
        }
    }

    pub fn text_centered(&mut self, center: Vec2, s: &str, fg: Rgb) {
        let m = self.viewport.cell_metrics();
        let w = s.chars().count() as f32 * m.advance;
        self.text(Vec2::new(center.x - w / 2.0, center.y - m.line_height / 2.0), s, fg);
    }

    /// Replaces this buffer with `src` moved by whole pixels, `fill`
    /// showing through where nothing was copied.
    pub fn blit_shifted(&mut self, src: &PixelBuf, dx: i32, dy: i32, fill: Rgb) {
        self.px.fill(fill);
        self.text.fill(None);
        for y in 0..src.h.min(self.h) {
            for x in 0..src.w.min(self.w) {
                self.set(x as i32 + dx, y as i32 + dy, src.get(x, y));
            }
        }
        let drow = dy.div_euclid(2);
        for row in 0..src.rows().min(self.rows()) {
            for col in 0..src.w.min(self.w) {
                let Some(glyph) = src.text[row * src.w + col] else {
                    continue;
                };
                let (r, c) = (row as i32 + drow, col as i32 + dx);
                if r >= 0 && c >= 0 && (r as usize) < self.rows() && (c as usize) < self.w {
                    self.text[r as usize * self.w + c as usize] = Some(glyph);
                }
            }
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                let (ch, fg, bg) = match self.text[row * self.w + col] {
                    Some(glyph) => (glyph.ch, glyph.fg, Rgb::lerp(top, bot, 128)),
                    None if top == bot => (' ', prev_fg, top),
                    None => ('\u{2580}', top, bot), // ▀
                };

                if ch != ' ' && (need_fg || prev_fg != fg) {
                    queue!(out, style::SetForegroundColor(fg.term()))?;
                    prev_fg = fg;
                    need_fg = false;
                }
                if need_bg || prev_bg != bg {
                    queue!(out, style::SetBackgroundColor(bg.term()))?;
                    prev_bg = bg;
                    need_bg = false;
                }
                queue!(out, style::Print(ch))?;
            }
            if row < rows - 1 {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

// ── 3x5 bitmap digits ──────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

/// Draws `n` centred on a logical point, each glyph pixel `cell` logical
/// units square.
pub fn draw_number(buf: &mut PixelBuf, center: Vec2, n: u32, cell: f32, fg: Rgb) {
    let s = n.to_string();
    // 3 cells per digit + 1 cell spacing
    let total_w = (s.len() as f32 * 4.0 - 1.0) * cell;
    let x0 = center.x - total_w / 2.0;
    let y0 = center.y - 2.5 * cell;
    for (i, ch) in s.bytes().enumerate() {
        let glyph = &DIGITS[(ch - b'0') as usize];
        for row in 0..5 {
            for col in 0..3 {
                if glyph[row * 3 + col] == 1 {
                    let x = x0 + (i as f32 * 4.0 + col as f32) * cell;
                    let y = y0 + row as f32 * cell;
                    buf.fill_logical(&Rect::new(x, y, cell, cell), fg);
                }
            }
        }
    }
}
