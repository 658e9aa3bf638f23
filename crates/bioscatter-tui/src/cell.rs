#![forbid(unsafe_code)]

//! A single terminal cell: glyph plus style.

use bioscatter_core::palette::Rgb;

/// One cell of the grid. `None` colors mean the terminal default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub symbol: char,
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
    pub bold: bool,
}

impl Cell {
    /// An empty (space, default-styled) cell.
    pub const EMPTY: Cell = Cell {
        symbol: ' ',
        fg: None,
        bg: None,
        bold: false,
    };

    /// A default-styled cell showing `symbol`.
    #[inline]
    pub const fn from_char(symbol: char) -> Self {
        Self {
            symbol,
            ..Self::EMPTY
        }
    }

    /// Replace the foreground color.
    #[inline]
    pub const fn with_fg(mut self, fg: Rgb) -> Self {
        self.fg = Some(fg);
        self
    }

    /// Replace the background color.
    #[inline]
    pub const fn with_bg(mut self, bg: Rgb) -> Self {
        self.bg = Some(bg);
        self
    }

    /// Mark the cell bold.
    #[inline]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}
