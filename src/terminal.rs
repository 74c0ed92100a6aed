// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::frame::{Cell, Frame};

/// Never equal to a real cell, so a reset `last` repaints everything.
const UNKNOWN: Cell = Cell {
    ch: '\0',
    fg: None,
    bg: None,
    bold: false,
};

/// Writes frames as minimal runs of changed cells.
pub struct Painter<W: Write> {
    out: W,
    last: Vec<Cell>,
    last_size: (u16, u16),
    run: String,
}

impl<W: Write> Painter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: Vec::new(),
            last_size: (0, 0),
            run: String::with_capacity(64),
        }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Returns the number of cells written.
    pub fn draw(&mut self, frame: &mut Frame) -> Result<usize> {
        let resized = self.last_size != (frame.width, frame.height);
        if frame.take_full_redraw() || resized {
            self.out.queue(terminal::Clear(terminal::ClearType::All))?;
            self.last.clear();
            self.last
                .resize(frame.width as usize * frame.height as usize, UNKNOWN);
            self.last_size = (frame.width, frame.height);
        }

        let width = frame.width as usize;
        let cells = frame.cells();
        let mut written = 0usize;
        let mut style: Option<Cell> = None;
        let mut cursor_at: Option<usize> = None;

        for y in 0..frame.height as usize {
            let row = y * width;
            let mut x = 0usize;
            while x < width {
                let first = cells[row + x];
                if self.last[row + x] == first {
                    x += 1;
                    continue;
                }

                self.run.clear();
                let start = x;
                while x < width {
                    let c = cells[row + x];
                    if self.last[row + x] == c || !c.same_style(&first) {
                        break;
                    }
                    self.run.push(c.ch);
                    self.last[row + x] = c;
                    x += 1;
                }

                if cursor_at != Some(row + start) {
                    self.out.queue(cursor::MoveTo(start as u16, y as u16))?;
                }
                if style.map_or(true, |s| s.fg != first.fg) {
                    self.out
                        .queue(SetForegroundColor(first.fg.unwrap_or(Color::Reset)))?;
                }
                if style.map_or(true, |s| s.bg != first.bg) {
                    self.out
                        .queue(SetBackgroundColor(first.bg.unwrap_or(Color::Reset)))?;
                }
                if style.map_or(true, |s| s.bold != first.bold) {
                    self.out.queue(SetAttribute(if first.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    }))?;
                }
                style = Some(first);

                self.out.queue(Print(self.run.as_str()))?;
                written += x - start;
                cursor_at = if x < width { Some(row + x) } else { None };
            }
        }

        if written > 0 {
            self.out.queue(SetAttribute(Attribute::Reset))?;
            self.out.queue(ResetColor)?;
        }
        self.out.flush()?;
        Ok(written)
    }
}

pub struct Terminal {
    painter: Painter<Stdout>,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(event::EnableMouseCapture)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self {
            painter: Painter::new(out),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    /// Pixel size of one cell, when the terminal reports its window size.
    pub fn cell_pixels(&self) -> Option<(f32, f32)> {
        let ws = terminal::window_size().ok()?;
        if ws.width == 0 || ws.height == 0 || ws.columns == 0 || ws.rows == 0 {
            return None;
        }
        Some((
            ws.width as f32 / ws.columns as f32,
            ws.height as f32 / ws.rows as f32,
        ))
    }

    pub fn poll_event(timeout: Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    pub fn draw(&mut self, frame: &mut Frame) -> Result<usize> {
        self.painter.draw(frame)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore_terminal_best_effort();
    }
}

pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(event::DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
