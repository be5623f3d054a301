//! Glyph widths for the two standard PDF fonts used by offer letters.
//!
//! Widths come from the Adobe core font metrics, in thousandths of an em.
//! Tables cover ASCII 0x20..=0x7E; index = (byte - 32).

/// Standard Type 1 fonts every PDF reader ships with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    /// Resource name used in page content streams
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    pub fn base_font(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    fn table(self) -> &'static [u16; 95] {
        match self {
            Font::Helvetica => &HELVETICA_WIDTHS,
            Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Width of one WinAnsi-encoded byte, in thousandths of an em
    pub fn glyph_width(self, byte: u8) -> u16 {
        match byte {
            32..=126 => self.table()[(byte - 32) as usize],
            BULLET => 350,
            _ => FALLBACK_WIDTH,
        }
    }

    /// Rendered width of WinAnsi-encoded text, in points
    pub fn measure(self, encoded: &[u8], size_pt: f32) -> f32 {
        let units: u32 = encoded.iter().map(|&b| u32::from(self.glyph_width(b))).sum();
        units as f32 * size_pt / 1000.0
    }
}

/// WinAnsi code for U+2022
pub const BULLET: u8 = 0x95;

const FALLBACK_WIDTH: u16 = 556;

/// Encode text for a standard font's WinAnsi encoding.
/// Latin-1 maps directly; characters outside it become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2022}' => BULLET,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            c if (c as u32) < 0x80 => c as u8,
            c if (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

/// Greedy word wrap of encoded text to `max_width_pt`
///
/// Words longer than a full line are broken between characters.
pub fn wrap(encoded: &[u8], font: Font, size_pt: f32, max_width_pt: f32) -> Vec<Vec<u8>> {
    let space = font.measure(b" ", size_pt);
    let mut lines: Vec<Vec<u8>> = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    let mut current_width = 0.0_f32;

    for word in encoded.split(|b| b.is_ascii_whitespace()).filter(|w| !w.is_empty()) {
        let word_width = font.measure(word, size_pt);

        if word_width > max_width_pt {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            for &byte in word {
                let w = font.measure(&[byte], size_pt);
                if !current.is_empty() && current_width + w > max_width_pt {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(byte);
                current_width += w;
            }
            continue;
        }

        if current.is_empty() {
            current.extend_from_slice(word);
            current_width = word_width;
        } else if current_width + space + word_width > max_width_pt {
            lines.push(std::mem::replace(&mut current, word.to_vec()));
            current_width = word_width;
        } else {
            current.push(b' ');
            current.extend_from_slice(word);
            current_width += space + word_width;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    278, 278, 584, 584, 584, 556, 1015,
    // A-M
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    // N-Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    278, 278, 278, 469, 556, 333,
    // a-m
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    // n-z
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // {    |    }    ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    333, 333, 584, 584, 584, 611, 975,
    // A-M
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    // N-Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    333, 278, 333, 584, 556, 333,
    // a-m
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    // n-z
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    // {    |    }    ~
    389, 280, 389, 584,
];
