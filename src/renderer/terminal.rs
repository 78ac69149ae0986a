//! Terminal presenter
//!
//! Each character cell shows two buffer pixels stacked vertically using the
//! upper half block: the top pixel is the foreground color, the bottom pixel
//! the background. Only rows that changed since the last frame are written.

use std::io::{self, Write};

use crossterm::style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, queue, terminal};
use glam::IVec2;

use super::{Canvas, Color, FrameBuffer, Surface};
use crate::error::PresentError;

/// Smallest terminal the table is drawn in
const MIN_COLUMNS: u16 = 20;
const MIN_ROWS: u16 = 6;

const HALF_BLOCK: char = '▀';

/// One character cell of output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

/// Where the terminal dimensions come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSource {
    /// Ask the terminal every frame
    Terminal,
    Fixed { columns: u16, rows: u16 },
}

impl SizeSource {
    fn query(&self) -> io::Result<(u16, u16)> {
        match *self {
            SizeSource::Terminal => terminal::size(),
            SizeSource::Fixed { columns, rows } => Ok((columns, rows)),
        }
    }
}

pub struct TerminalSurface<W: Write> {
    out: W,
    panel: IVec2,
    size_source: SizeSource,
    size: (u16, u16),
    buffer: Option<FrameBuffer>,
    /// Rows as last written, for diffing
    presented: Vec<Vec<Cell>>,
    needs_clear: bool,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, panel: IVec2) -> Self {
        Self::with_size_source(out, panel, SizeSource::Terminal)
    }

    pub fn with_size_source(out: W, panel: IVec2, size_source: SizeSource) -> Self {
        Self {
            out,
            panel,
            size_source,
            size: (0, 0),
            buffer: None,
            presented: Vec::new(),
            needs_clear: true,
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Create or resize the offscreen buffer to match the terminal
    fn ensure_buffer(&mut self) -> bool {
        let size = match self.size_source.query() {
            Ok(size) => size,
            Err(e) => {
                log::debug!("Terminal size unavailable: {}", e);
                return false;
            }
        };

        if size.0 < MIN_COLUMNS || size.1 < MIN_ROWS {
            if self.buffer.take().is_some() {
                log::debug!("Terminal too small ({}x{}), not drawing", size.0, size.1);
            }
            return false;
        }

        if self.buffer.is_none() || size != self.size {
            let buffer = FrameBuffer::fit(self.panel, size.0 as usize, size.1 as usize * 2);
            log::debug!(
                "Offscreen buffer {}x{} for {}x{} terminal",
                buffer.width(),
                buffer.height(),
                size.0,
                size.1
            );
            self.size = size;
            self.buffer = Some(buffer);
            self.presented.clear();
            self.needs_clear = true;
        }
        true
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn canvas(&mut self) -> Option<&mut dyn Canvas> {
        if !self.ensure_buffer() {
            return None;
        }
        let buffer = self.buffer.as_mut()?;
        buffer.begin_frame();
        Some(buffer)
    }

    fn present(&mut self) -> Result<(), PresentError> {
        let Some(buffer) = self.buffer.as_ref() else {
            return Err(PresentError::Unavailable);
        };
        let rows = compose(buffer);

        if self.needs_clear {
            queue!(self.out, terminal::Clear(terminal::ClearType::All))?;
            self.needs_clear = false;
        }
        for (y, row) in rows.iter().enumerate() {
            if self.presented.get(y) == Some(row) {
                continue;
            }
            queue!(self.out, cursor::MoveTo(0, y as u16))?;
            write_row(&mut self.out, row)?;
        }
        self.out.flush()?;

        self.presented = rows;
        Ok(())
    }
}

/// Turn the buffer and its labels into character cells
pub fn compose(buffer: &FrameBuffer) -> Vec<Vec<Cell>> {
    let columns = buffer.width();
    let rows = buffer.height().div_ceil(2);

    let mut cells: Vec<Vec<Cell>> = (0..rows)
        .map(|row| {
            (0..columns)
                .map(|x| Cell {
                    ch: HALF_BLOCK,
                    fg: buffer.pixel(x, row * 2).unwrap_or(Color::BLACK),
                    bg: buffer.pixel(x, row * 2 + 1).unwrap_or(Color::BLACK),
                })
                .collect()
        })
        .collect();

    let cell_height = buffer.scale() * 2.0;
    for label in buffer.labels() {
        // The origin is the baseline; place the row holding the text's top
        let top = label.origin.y as f32 - label.font.size as f32;
        let row = ((top / cell_height).floor().max(0.0) as usize).min(rows.saturating_sub(1));
        let column = (label.origin.x as f32 / buffer.scale()).floor().max(0.0) as usize;
        let Some(line) = cells.get_mut(row) else {
            continue;
        };

        let fg = label.color.over(Color::BLACK);
        for (cell, ch) in line.iter_mut().skip(column).zip(label.text.chars()) {
            *cell = Cell {
                ch,
                fg,
                bg: Color::BLACK,
            };
        }
    }

    cells
}

fn write_row(out: &mut impl Write, row: &[Cell]) -> io::Result<()> {
    let mut current: Option<(Color, Color)> = None;
    for cell in row {
        if current != Some((cell.fg, cell.bg)) {
            queue!(
                out,
                SetForegroundColor(term_color(cell.fg)),
                SetBackgroundColor(term_color(cell.bg))
            )?;
            current = Some((cell.fg, cell.bg));
        }
        queue!(out, Print(cell.ch))?;
    }
    queue!(out, ResetColor)
}

fn term_color(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}
