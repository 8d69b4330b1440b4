use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Width of the VGA text mode screen in character cells
pub const SCREEN_COLUMNS: u16 = 80;
/// Height of the VGA text mode screen in character cells
pub const SCREEN_ROWS: u16 = 25;
/// Every cell is a character byte followed by an attribute byte
pub const BYTES_PER_CELL: u16 = 2;

/// Byte offset into the text mode framebuffer of the bottom right cell.
pub const CURSOR_OFFSET: u16 = cell_offset(SCREEN_ROWS - 1, SCREEN_COLUMNS - 1);

pub const fn cell_offset(row: u16, col: u16) -> u16 {
    row * SCREEN_COLUMNS * BYTES_PER_CELL + col * BYTES_PER_CELL
}

/// The 16 colours of the VGA text mode palette.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Colour {
    Black,
    Blue,
    Green,
    Cyan,
    Red,
    Magenta,
    Brown,
    LightGrey,
    DarkGrey,
    LightBlue,
    LightGreen,
    LightCyan,
    LightRed,
    LightMagenta,
    Yellow,
    White,
}

impl Colour {
    pub const ALL: [Colour; 16] = [
        Colour::Black,
        Colour::Blue,
        Colour::Green,
        Colour::Cyan,
        Colour::Red,
        Colour::Magenta,
        Colour::Brown,
        Colour::LightGrey,
        Colour::DarkGrey,
        Colour::LightBlue,
        Colour::LightGreen,
        Colour::LightCyan,
        Colour::LightRed,
        Colour::LightMagenta,
        Colour::Yellow,
        Colour::White,
    ];

    /// Returns the colour with the given palette code, if the code is in `[0,15]`
    pub fn from_code(code: i64) -> Option<Colour> {
        if (0..16).contains(&code) {
            Some(Self::ALL[code as usize])
        } else {
            None
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

impl Display for Colour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Colour::*;
        let name = match self {
            Black => "Black",
            Blue => "Blue",
            Green => "Green",
            Cyan => "Cyan",
            Red => "Red",
            Magenta => "Magenta",
            Brown => "Brown",
            LightGrey => "Light Grey",
            DarkGrey => "Dark Grey",
            LightBlue => "Light Blue",
            LightGreen => "Light Green",
            LightCyan => "Light Cyan",
            LightRed => "Light Red",
            LightMagenta => "Light Magenta",
            Yellow => "Yellow",
            White => "White",
        };
        f.write_str(name)
    }
}

/// Which half of a cell's attribute byte a colour directive sets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Layer {
    Background,
    Foreground,
}

impl Layer {
    /// The directive keyword which sets this layer
    pub fn keyword(self) -> &'static str {
        match self {
            Layer::Background => "colour_bg",
            Layer::Foreground => "colour_fg",
        }
    }
}

impl Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layer::Background => f.write_str("background"),
            Layer::Foreground => f.write_str("foreground"),
        }
    }
}

/// The screen colours of the boot sector.  Colour directives update this
/// while the source is loaded; once loading is done it is frozen and used
/// to compute the attribute byte of the screen clear.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColourState {
    background: Colour,
    foreground: Colour,
}

impl Default for ColourState {
    fn default() -> Self {
        ColourState {
            background: Colour::Black,
            foreground: Colour::LightGrey,
        }
    }
}

impl ColourState {
    pub fn new(background: Colour, foreground: Colour) -> ColourState {
        ColourState {
            background,
            foreground,
        }
    }

    pub fn background(&self) -> Colour {
        self.background
    }

    pub fn foreground(&self) -> Colour {
        self.foreground
    }

    pub fn get(&self, layer: Layer) -> Colour {
        match layer {
            Layer::Background => self.background,
            Layer::Foreground => self.foreground,
        }
    }

    /// Sets the colour of `layer` to the palette code `code`.  If the code is
    /// outside of `[0,15]` then the state is left unchanged and the rejected
    /// code is returned.
    pub fn set(&mut self, layer: Layer, code: i64) -> Result<Colour, i64> {
        let colour = Colour::from_code(code).ok_or(code)?;
        match layer {
            Layer::Background => self.background = colour,
            Layer::Foreground => self.foreground = colour,
        }
        Ok(colour)
    }

    /// The VGA attribute byte: background in the high nibble and foreground
    /// in the low nibble.
    pub fn attribute(&self) -> u8 {
        (self.background.code() << 4) | (self.foreground.code() & 0x0F)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let cs = ColourState::default();
        assert_eq!(cs.background(), Colour::Black);
        assert_eq!(cs.foreground(), Colour::LightGrey);
        assert_eq!(cs.attribute(), 0x07);
    }

    #[test]
    fn test_attribute_for_every_pair() {
        for bg in 0..16 {
            for fg in 0..16 {
                let mut cs = ColourState::default();
                cs.set(Layer::Background, bg).unwrap();
                cs.set(Layer::Foreground, fg).unwrap();
                assert_eq!(cs.attribute() as i64, (bg << 4) | fg);
            }
        }
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut cs = ColourState::default();
        cs.set(Layer::Background, 1).unwrap();

        assert_eq!(cs.set(Layer::Background, 16), Err(16));
        assert_eq!(cs.set(Layer::Background, -1), Err(-1));
        assert_eq!(cs.background(), Colour::Blue);
        assert_eq!(cs.foreground(), Colour::LightGrey);
    }

    #[test]
    fn test_colour_codes() {
        for (code, colour) in Colour::ALL.iter().enumerate() {
            assert_eq!(colour.code() as usize, code);
            assert_eq!(Colour::from_code(code as i64), Some(*colour));
        }
        assert_eq!(Colour::from_code(14), Some(Colour::Yellow));
        assert_eq!(format!("{}", Colour::LightMagenta), "Light Magenta");
    }

    #[test]
    fn test_cursor_offset() {
        assert_eq!(CURSOR_OFFSET, 3998);
        assert_eq!(cell_offset(0, 0), 0);
        assert_eq!(cell_offset(1, 0), 160);
    }
}
