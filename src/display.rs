/// Rendering layer.  All terminal I/O lives here.
///
/// The simulation draws in logical playfield units through [`Surface`];
/// [`TerminalSurface`] rasterises that into a character grid sized to the
/// terminal, and [`render`] queues the grid plus border, HUD and overlays
/// as crossterm commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::collision::Rect;
use crate::compute::{self, Game};
use crate::constants::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::entities::StatusEffect;
use crate::surface::Surface;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::Green;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_EFFECT: Color = Color::Cyan;
const C_BANNER: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

const HINT: &str = "←↑↓→ / WASD : Move   SPACE : Shoot   P : Pause   M/N : Mute   Q : Quit";

// ── Terminal surface ──────────────────────────────────────────────────────────

/// Character grid covering the inside of the border.
///
/// Layout of a `cols × rows` terminal: row 0 is the HUD, rows 1 and
/// `rows - 2` the border, the last row the controls hint.
pub struct TerminalSurface {
    cols: u16,
    rows: u16,
    cells: Vec<Option<(char, Color)>>,
}

impl TerminalSurface {
    pub fn new(cols: u16, rows: u16) -> Self {
        let (field_cols, field_rows) = field_size(cols, rows);
        Self {
            cols,
            rows,
            cells: vec![None; field_cols as usize * field_rows as usize],
        }
    }

    fn field_size(&self) -> (u16, u16) {
        field_size(self.cols, self.rows)
    }

    /// Playfield point to grid cell, unclamped.
    fn to_cell(&self, x: f32, y: f32) -> (i32, i32) {
        let (field_cols, field_rows) = self.field_size();
        let col = (x / FIELD_WIDTH * field_cols as f32).floor() as i32;
        let row = (y / FIELD_HEIGHT * field_rows as f32).floor() as i32;
        (col, row)
    }

    fn put(&mut self, col: i32, row: i32, ch: char, color: Color) {
        let (field_cols, field_rows) = self.field_size();
        if col < 0 || row < 0 || col >= field_cols as i32 || row >= field_rows as i32 {
            return;
        }
        self.cells[row as usize * field_cols as usize + col as usize] = Some((ch, color));
    }

    /// Grid contents at `(col, row)` of the playfield.
    pub fn cell(&self, col: u16, row: u16) -> Option<(char, Color)> {
        let (field_cols, field_rows) = self.field_size();
        if col >= field_cols || row >= field_rows {
            return None;
        }
        self.cells[row as usize * field_cols as usize + col as usize]
    }

    fn present<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let (field_cols, _) = self.field_size();
        for (i, cell) in self.cells.iter().enumerate() {
            let Some((ch, color)) = cell else { continue };
            let col = (i % field_cols as usize) as u16 + 1;
            let row = (i / field_cols as usize) as u16 + 2;
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(style::SetForegroundColor(*color))?;
            out.queue(Print(ch))?;
        }
        Ok(())
    }
}

fn field_size(cols: u16, rows: u16) -> (u16, u16) {
    (cols.saturating_sub(2), rows.saturating_sub(4))
}

impl Surface for TerminalSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let (left, top) = self.to_cell(rect.x, rect.y);
        let (right, bottom) = self.to_cell(rect.right(), rect.bottom());
        for row in top..=bottom.max(top) {
            for col in left..=right.max(left) {
                self.put(col, row, '█', color);
            }
        }
    }

    fn text(&mut self, x: f32, y: f32, text: &str, color: Color) {
        let (col, row) = self.to_cell(x, y);
        let start = col - text.chars().count() as i32 / 2;
        for (i, ch) in text.chars().enumerate() {
            self.put(start + i as i32, row, ch, color);
        }
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame for a `cols × rows` terminal.
pub fn render<W: Write>(
    out: &mut W,
    game: &Game,
    session_best: u32,
    (cols, rows): (u16, u16),
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, cols, rows)?;
    draw_hud(out, game, cols)?;

    let mut surface = TerminalSurface::new(cols, rows);
    compute::draw(game, &mut surface);
    surface.present(out)?;

    if let Some(notification) = &game.notification {
        draw_centered(out, cols, rows / 3, &notification.text, C_BANNER)?;
    }
    if game.state.is_paused() {
        draw_centered(out, cols, rows / 2, "║  PAUSED  ║", Color::White)?;
        draw_centered(out, cols, rows / 2 + 1, "P - Resume", C_HINT)?;
    }
    if game.state.is_game_over() {
        draw_game_over(out, game.state.score, session_best, cols, rows)?;
    }

    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(HINT))?;

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Title screen.  A new game always starts at level 1.
pub fn render_menu<W: Write>(
    out: &mut W,
    session_best: u32,
    (cols, rows): (u16, u16),
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let cy = rows / 2;

    draw_centered(out, cols, cy.saturating_sub(6), "★  SPACE  SHOOTER  ★", Color::Cyan)?;
    if session_best > 0 {
        let best = format!("Best Score: {session_best}");
        draw_centered(out, cols, cy.saturating_sub(5), &best, Color::Yellow)?;
    }
    draw_centered(out, cols, cy.saturating_sub(3), "ENTER : Start   Q : Quit", Color::White)?;

    let legend: &[(&str, Color, &str)] = &[
        ("◊", Color::Blue, " Shield      blocks all damage"),
        ("★", Color::Yellow, " Spread      3-way fire"),
        ("»", Color::Cyan, " Speed       faster ship"),
        ("♥", Color::Magenta, " Health      +1 health"),
    ];
    let left = (cols / 2).saturating_sub(16);
    out.queue(cursor::MoveTo(left, cy.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Power-ups (catch falling items):"))?;
    for (i, (glyph, color, desc)) in legend.iter().enumerate() {
        out.queue(cursor::MoveTo(left, cy + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(glyph))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(*desc))?;
    }

    draw_centered(out, cols, cy + 6, HINT, C_HINT)?;
    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let w = cols as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, rows.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, game: &Game, cols: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>7}", game.state.score)))?;

    let level = format!(
        "[ LEVEL {}  WAVE {}/{} ]",
        game.state.level,
        game.wave(),
        game.max_waves()
    );
    let lx = (cols / 2).saturating_sub(level.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&level))?;

    let effects: String = [
        (StatusEffect::Shield, "SHIELD"),
        (StatusEffect::SpreadShot, "SPREAD"),
        (StatusEffect::SpeedBoost, "SPEED"),
    ]
    .into_iter()
    .filter_map(|(effect, label)| {
        game.player
            .effects
            .remaining_ms(effect, game.now)
            .map(|ms| format!("[{label} {:>2}s] ", ms / 1000 + 1))
    })
    .collect();
    let hearts = "♥".repeat(game.state.health as usize);
    let health = format!("HP:{hearts}");

    let right_len = effects.chars().count() + health.chars().count();
    let rx = cols.saturating_sub(right_len as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    if !effects.is_empty() {
        out.queue(style::SetForegroundColor(C_HUD_EFFECT))?;
        out.queue(Print(&effects))?;
    }
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(&health))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    cols: u16,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_game_over<W: Write>(
    out: &mut W,
    score: u32,
    session_best: u32,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let new_best = score > 0 && score >= session_best;
    let score_line = format!("Final Score: {score:>6}");
    let best_line = if new_best {
        format!("★ NEW BEST: {score:>6} ★")
    } else {
        format!("Best Score:  {session_best:>6}")
    };

    let lines: [(&str, Color); 6] = [
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
        (best_line.as_str(), if new_best { Color::Yellow } else { Color::DarkGrey }),
        ("R - Play Again  Q - Quit", Color::White),
    ];
    let start_row = (rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (text, color)) in lines.iter().enumerate() {
        draw_centered(out, cols, start_row + i as u16, text, *color)?;
    }
    Ok(())
}
