use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{bail, Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

use crate::TermInt;
use crate::game::{Panel, Presenter};
use crate::render::{Rgb, Surface};

/// Terminal columns per grid cell; characters are roughly twice as tall as wide.
const COLS_PER_CELL: usize = 2;
const DETAIL_CHAR: char = '•';
const GRID_CHAR: char = '·';

#[derive(Copy, Clone, Debug, PartialEq)]
struct Glyph {
    ch: char,
    fg: Rgb,
    bg: Rgb,
}

const BLANK: Glyph = Glyph { ch: ' ', fg: Rgb(0, 0, 0), bg: Rgb(0, 0, 0) };

/// A [`Presenter`] that rasterises draw commands onto terminal character
/// cells. The board sits inside a border at the top left of the terminal,
/// with a status line underneath and message boxes centred over it.
pub struct TermSurface {
    stdout: Stdout,
    grid_size: usize,
    cell_px: f64,
    board: Vec<Glyph>,
    panel: Panel,
    paused: bool,
    score: u32,
    high_score: u32,
    final_score: (u32, bool),
}

struct Message {
    top_left: (TermInt, TermInt),
    width: TermInt,
}

impl TermSurface {
    pub fn new(grid_size: usize, cell_px: f64) -> Self {
        TermSurface {
            stdout: stdout(),
            grid_size,
            cell_px,
            board: vec![BLANK; grid_size * COLS_PER_CELL * grid_size],
            panel: Panel::Menu,
            paused: false,
            score: 0,
            high_score: 0,
            final_score: (0, false),
        }
    }

    pub fn setup(&mut self) -> Result<()> {
        let (width, height) = terminal::size().context("reading terminal size")?;
        let (need_w, need_h) = self.required_size();
        if width < need_w || height < need_h {
            bail!("terminal is {}x{}, the board needs at least {}x{}", width, height, need_w, need_h);
        }

        execute!(self.stdout, EnterAlternateScreen).context("entering alternate screen")?;
        terminal::enable_raw_mode().context("enabling raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("disabling raw mode")?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("leaving alternate screen")?;
        Ok(())
    }

    fn board_width(&self) -> usize {
        self.grid_size * COLS_PER_CELL
    }

    /// Border plus board plus one status line.
    fn required_size(&self) -> (TermInt, TermInt) {
        ((self.board_width() + 2) as TermInt, (self.grid_size + 3) as TermInt)
    }

    fn glyph_mut(&mut self, col: isize, row: isize) -> Option<&mut Glyph> {
        let width = self.board_width() as isize;
        if col < 0 || row < 0 || col >= width || row >= self.grid_size as isize {
            return None;
        }
        self.board.get_mut((row * width + col) as usize)
    }

    fn sub_width(&self) -> f64 {
        self.cell_px / COLS_PER_CELL as f64
    }

    fn draw_borders(&mut self) -> Result<()> {
        let (width, height) = (self.board_width() as TermInt + 2, self.grid_size as TermInt + 2);
        let end_x = width - 1;
        let end_y = height - 1;

        queue!(self.stdout, style::ResetColor)?;
        for x in 0..width {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            queue!(self.stdout, cursor::MoveTo(x, 0), style::Print(ch), cursor::MoveTo(x, end_y), style::Print(ch))?;
        }

        for y in 1..end_y {
            queue!(self.stdout, cursor::MoveTo(0, y), style::Print('|'), cursor::MoveTo(end_x, y), style::Print('|'))?;
        }
        Ok(())
    }

    fn draw_board(&mut self) -> Result<()> {
        let width = self.board_width();
        for row in 0..self.grid_size {
            queue!(self.stdout, cursor::MoveTo(1, row as TermInt + 1))?;
            for col in 0..width {
                let g = self.board[row * width + col];
                queue!(
                    self.stdout,
                    style::SetForegroundColor(to_color(g.fg)),
                    style::SetBackgroundColor(to_color(g.bg)),
                    style::Print(g.ch)
                )?;
            }
        }
        queue!(self.stdout, style::ResetColor)?;
        Ok(())
    }

    fn draw_status(&mut self) -> Result<()> {
        let line = format!("Score: {:<6} High score: {:<6} Esc pause  M menu  Q quit", self.score, self.high_score);
        let y = self.grid_size as TermInt + 2;
        queue!(
            self.stdout,
            cursor::MoveTo(0, y),
            terminal::Clear(ClearType::CurrentLine),
            style::Print(line)
        )?;
        Ok(())
    }

    fn message_lines(&self) -> Option<Vec<String>> {
        let lines = match self.panel {
            Panel::Menu => vec![
                "S N A K E".to_string(),
                String::new(),
                format!("High score: {}", self.high_score),
                String::new(),
                "Arrow keys or WASD to move".to_string(),
                "Esc or P to pause".to_string(),
                String::new(),
                "Enter to start, Q to quit".to_string(),
            ],
            Panel::GameOver => {
                let (score, won) = self.final_score;
                vec![
                    if won { "You won!" } else { "Game over!" }.to_string(),
                    format!("Score: {}", score),
                    String::new(),
                    "R to play again".to_string(),
                    "M for the menu, Q to quit".to_string(),
                ]
            }
            Panel::Playing if self.paused => vec![
                "Paused".to_string(),
                "Press Esc to resume".to_string(),
            ],
            Panel::Playing => return None,
        };
        Some(lines)
    }

    fn show_message(&mut self, lines: &[String]) -> Result<()> {
        let msg = self.layout_message(lines);
        let height = lines.len() as TermInt + 2;

        // Blank rows above and below the text
        for y in [msg.top_left.1, msg.top_left.1 + height - 1].iter() {
            queue!(self.stdout, cursor::MoveTo(msg.top_left.0, *y), style::Print(" ".repeat(msg.width as usize)))?;
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg.width as usize);
            let y = msg.top_left.1 + i as TermInt + 1;
            queue!(self.stdout, cursor::MoveTo(msg.top_left.0, y), style::Print(padded_line))?;
        }
        Ok(())
    }

    fn layout_message(&self, lines: &[String]) -> Message {
        let height = (lines.len() + 2) as TermInt;
        let width = (lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = ((self.board_width() / 2 + 1) as TermInt, (self.grid_size / 2 + 1) as TermInt);
        let top_left = (center.0.saturating_sub(width / 2), center.1.saturating_sub(height / 2));
        Message { top_left, width }
    }
}

impl Surface for TermSurface {
    fn clear(&mut self, color: Rgb) {
        for g in self.board.iter_mut() {
            *g = Glyph { ch: ' ', fg: color, bg: color };
        }
    }

    /// Paints every sub-cell whose centre lies in the rectangle. Rectangles
    /// too small to cover any centre leave a dot where they sit.
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb) {
        let (sub_w, cell) = (self.sub_width(), self.cell_px);
        let mut covered = false;

        let cols = (x / sub_w).floor() as isize..=((x + w) / sub_w).floor() as isize;
        for col in cols {
            let cx = (col as f64 + 0.5) * sub_w;
            if cx < x || cx >= x + w {
                continue;
            }
            for row in (y / cell).floor() as isize..=((y + h) / cell).floor() as isize {
                let cy = (row as f64 + 0.5) * cell;
                if cy < y || cy >= y + h {
                    continue;
                }
                if let Some(g) = self.glyph_mut(col, row) {
                    *g = Glyph { ch: ' ', fg: color, bg: color };
                    covered = true;
                }
            }
        }

        if !covered {
            let col = ((x + w / 2.0) / sub_w).floor() as isize;
            let row = ((y + h / 2.0) / cell).floor() as isize;
            if let Some(g) = self.glyph_mut(col, row) {
                g.ch = DETAIL_CHAR;
                g.fg = color;
            }
        }
    }

    /// Lines have no width at this resolution; blank cells they pass over
    /// get a faint dot. Endpoints are snapped to cells first and the walk
    /// between them is done in whole cells.
    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb) {
        let (sub_w, cell) = (self.sub_width(), self.cell_px);
        let (c0, r0) = (snap(from.0 / sub_w), snap(from.1 / cell));
        let (c1, r1) = (snap(to.0 / sub_w), snap(to.1 / cell));
        let steps = (c1 - c0).abs().max((r1 - r0).abs());

        for i in 0..=steps {
            let (col, row) = if steps == 0 {
                (c0, r0)
            } else {
                let t = i as f64 / steps as f64;
                (c0 + ((c1 - c0) as f64 * t).round() as isize, r0 + ((r1 - r0) as f64 * t).round() as isize)
            };
            if let Some(g) = self.glyph_mut(col, row) {
                if g.ch == ' ' {
                    g.ch = GRID_CHAR;
                    g.fg = color;
                }
            }
        }
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Rgb) {
        let (sub_w, cell) = (self.sub_width(), self.cell_px);
        let cols = ((cx - radius) / sub_w).floor() as isize..=((cx + radius) / sub_w).floor() as isize;

        for col in cols {
            for row in ((cy - radius) / cell).floor() as isize..=((cy + radius) / cell).floor() as isize {
                let (px, py) = ((col as f64 + 0.5) * sub_w, (row as f64 + 0.5) * cell);
                if (px - cx).powi(2) + (py - cy).powi(2) <= radius * radius {
                    if let Some(g) = self.glyph_mut(col, row) {
                        *g = Glyph { ch: ' ', fg: color, bg: color };
                    }
                }
            }
        }
    }
}

impl Presenter for TermSurface {
    fn show_panel(&mut self, panel: Panel) {
        self.panel = panel;
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    fn set_high_score(&mut self, score: u32) {
        self.high_score = score;
    }

    fn set_final_score(&mut self, score: u32, won: bool) {
        self.final_score = (score, won);
    }

    fn present(&mut self) -> Result<()> {
        self.draw_borders()?;
        self.draw_board()?;
        self.draw_status()?;

        if let Some(lines) = self.message_lines() {
            self.show_message(&lines)?;
        }

        self.stdout.flush().context("flushing terminal")?;
        Ok(())
    }
}

/// Index of the cell a scaled coordinate falls in, tolerating values a hair
/// under a cell edge.
fn snap(v: f64) -> isize {
    (v + 1e-9).floor() as isize
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

/// Drains pending key presses, waiting at most `timeout` for the first one.
pub fn read_key_events(timeout: Duration) -> Result<Vec<KeyEvent>> {
    let mut events = vec![];
    let mut wait = timeout;

    while poll(wait)? {
        if let Event::Key(ev) = read()? {
            events.push(ev);
        }
        wait = Duration::from_millis(0);
    }

    Ok(events)
}
