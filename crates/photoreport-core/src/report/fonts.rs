//! Standard Helvetica faces: widths and WinAnsi encoding.
//!
//! Only the base-14 fonts are used, so nothing is embedded. Widths come
//! from the Adobe core font metrics, in thousandths of an em.

/// Width used for any glyph without a metric entry.
const FALLBACK_WIDTH: u16 = 556;

/// Helvetica, U+0020..=U+007E.
#[rustfmt::skip]
const REGULAR_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold, U+0020..=U+007E.
#[rustfmt::skip]
const BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    pub const ALL: [FontFace; 2] = [FontFace::Regular, FontFace::Bold];

    pub fn base_font(self) -> &'static [u8] {
        match self {
            FontFace::Regular => b"Helvetica",
            FontFace::Bold => b"Helvetica-Bold",
        }
    }

    /// Resource name used inside page content streams.
    pub fn resource_name(self) -> &'static [u8] {
        match self {
            FontFace::Regular => b"F1",
            FontFace::Bold => b"F2",
        }
    }

    fn ascii_widths(self) -> &'static [u16; 95] {
        match self {
            FontFace::Regular => &REGULAR_ASCII,
            FontFace::Bold => &BOLD_ASCII,
        }
    }

    /// Advance width of one character, in thousandths of an em.
    pub fn glyph_width(self, ch: char) -> u16 {
        if (' '..='~').contains(&ch) {
            return self.ascii_widths()[ch as usize - 0x20];
        }
        match (self, ch) {
            // Accented i is wider than the dotted i in the regular face.
            (FontFace::Regular, 'ì' | 'í' | 'î' | 'ï') => 278,
            (_, '\u{A0}') => 278,
            (_, '–') => 556,
            (_, '—') => 1000,
            (_, '…') => 1000,
            (_, '•') => 350,
            (FontFace::Regular, '‘' | '’') => 222,
            (FontFace::Bold, '‘' | '’') => 278,
            (FontFace::Regular, '“' | '”') => 333,
            (FontFace::Bold, '“' | '”') => 500,
            (_, 'ª') => 370,
            (_, 'º') => 365,
            (_, '°') => 400,
            _ => match base_letter(ch) {
                Some(base) => self.ascii_widths()[base as usize - 0x20],
                None => FALLBACK_WIDTH,
            },
        }
    }
}

/// The unaccented letter a Latin-1 letter is drawn on.
fn base_letter(ch: char) -> Option<char> {
    let base = match ch {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => return None,
    };
    Some(base)
}

/// Width of `text` set at `size` points.
pub fn text_width(text: &str, face: FontFace, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(face.glyph_width(c))).sum();
    units as f32 * size / 1000.0
}

/// Encode text for a WinAnsi simple font. Unmappable characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' | '\u{A0}'..='\u{FF}' => ch as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}
