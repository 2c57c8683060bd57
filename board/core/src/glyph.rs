//! Glyph Index
//!
//! Maps characters onto their position within the glyph strip of a sprite
//! sheet. The first glyph of the strip is the blank glyph: any character
//! the strip does not contain resolves to it, so lookups never fail.

use std::collections::HashMap;

use crate::config::ConfigError;

/// Ordered strip of glyphs addressed by sprite offset
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    glyphs: Vec<char>,
    positions: HashMap<char, usize>,
}

impl Alphabet {
    /// Build an alphabet from a letters sequence (blank glyph first)
    ///
    /// Every glyph must appear exactly once.
    pub fn new(sequence: &str) -> Result<Self, ConfigError> {
        let glyphs: Vec<char> = sequence.chars().collect();
        if glyphs.is_empty() {
            return Err(ConfigError::Validation(
                "letters sequence must contain at least the blank glyph".to_string(),
            ));
        }

        let mut positions = HashMap::with_capacity(glyphs.len());
        for (index, &glyph) in glyphs.iter().enumerate() {
            if positions.insert(glyph, index).is_some() {
                return Err(ConfigError::Validation(format!(
                    "glyph {glyph:?} appears more than once in the letters sequence"
                )));
            }
        }

        Ok(Self { glyphs, positions })
    }

    /// Position of a glyph, falling back to the blank glyph
    #[must_use]
    pub fn index_of(&self, glyph: char) -> usize {
        self.positions.get(&glyph).copied().unwrap_or(0)
    }

    /// Horizontal sprite offset of a glyph for the given tile width
    #[must_use]
    pub fn offset_for(&self, glyph: char, tile_width: u32) -> u32 {
        u32::try_from(self.index_of(glyph))
            .unwrap_or(u32::MAX)
            .saturating_mul(tile_width)
    }

    /// Glyph at a position (wraps around the strip)
    #[must_use]
    pub fn glyph_at(&self, index: usize) -> char {
        self.glyphs[index % self.glyphs.len()]
    }

    /// The blank glyph
    #[must_use]
    pub fn blank(&self) -> char {
        self.glyphs[0]
    }

    /// Number of glyphs in the strip
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false: construction rejects empty strips
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// The glyph strip as a string
    #[must_use]
    pub fn as_string(&self) -> String {
        self.glyphs.iter().collect()
    }

    /// Fit a message to the board width: truncate, then pad with blanks
    #[must_use]
    pub fn fit(&self, message: &str, max_length: usize) -> Vec<char> {
        let mut chars: Vec<char> = message.chars().take(max_length).collect();
        chars.resize(max_length, self.blank());
        chars
    }

    /// Sprite offsets for a whole message
    #[must_use]
    pub fn offsets_for(&self, message: &str, max_length: usize, tile_width: u32) -> Vec<u32> {
        self.fit(message, max_length)
            .into_iter()
            .map(|glyph| self.offset_for(glyph, tile_width))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alphabet() -> Alphabet {
        Alphabet::new(" ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789").unwrap()
    }

    #[test]
    fn test_index_of_known_glyphs() {
        let alphabet = alphabet();
        assert_eq!(alphabet.index_of(' '), 0);
        assert_eq!(alphabet.index_of('A'), 1);
        assert_eq!(alphabet.index_of('9'), 36);
    }

    #[test]
    fn test_unknown_glyph_falls_back_to_blank() {
        let alphabet = alphabet();
        assert_eq!(alphabet.index_of('a'), 0);
        assert_eq!(alphabet.index_of('#'), 0);
        assert_eq!(alphabet.offset_for('#', 25), 0);
    }

    #[test]
    fn test_offset_scales_with_tile_width() {
        let alphabet = alphabet();
        assert_eq!(alphabet.offset_for('C', 25), 75);
        assert_eq!(alphabet.offset_for('C', 10), 30);
    }

    #[test]
    fn test_offset_saturates_instead_of_overflowing() {
        let alphabet = alphabet();
        assert_eq!(alphabet.offset_for('C', u32::MAX), u32::MAX);
    }

    #[test]
    fn test_duplicate_glyph_rejected() {
        assert!(Alphabet::new(" ABA").is_err());
        assert!(Alphabet::new("").is_err());
    }

    #[test]
    fn test_fit_pads_and_truncates() {
        let alphabet = alphabet();
        assert_eq!(alphabet.fit("AB", 4), vec!['A', 'B', ' ', ' ']);
        assert_eq!(alphabet.fit("ABCDEF", 3), vec!['A', 'B', 'C']);
    }

    #[test]
    fn test_offsets_for_message() {
        let alphabet = alphabet();
        assert_eq!(alphabet.offsets_for("AB", 3, 10), vec![10, 20, 0]);
    }
}
