// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: None,
        bg: None,
        bold: false,
    };

    pub fn same_style(&self, other: &Cell) -> bool {
        self.fg == other.fg && self.bg == other.bg && self.bold == other.bold
    }
}

/// One screenful of cells. The scene rebuilds it every frame; the terminal
/// writer works out what actually changed. A new frame is always painted in full.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    full_redraw: bool,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width as usize * height as usize],
            full_redraw: true,
        }
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[cfg(test)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn take_full_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.full_redraw, false)
    }
}
