//! Glyph Sequences and Flip Plans
//!
//! For every tile of a flip the scheduler decides which glyphs the tile
//! passes through on its way from the current glyph to the target glyph,
//! and how fast it flips. Each tile samples its own flip count and its own
//! speed so the board never moves in lockstep.

use std::time::Duration;

use rand::Rng;

use crate::config::BoardConfig;
use crate::glyph::Alphabet;

/// Ordered glyphs one tile traverses during a flip
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphSequence(Vec<char>);

impl GlyphSequence {
    /// Wrap an explicit list of glyphs
    #[must_use]
    pub fn new(glyphs: Vec<char>) -> Self {
        Self(glyphs)
    }

    /// Glyphs in traversal order
    #[must_use]
    pub fn glyphs(&self) -> &[char] {
        &self.0
    }

    /// Number of glyphs remaining
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no glyph remains
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Glyph currently shown
    #[must_use]
    pub fn first(&self) -> Option<char> {
        self.0.first().copied()
    }

    /// Glyph the tile lands on
    #[must_use]
    pub fn last(&self) -> Option<char> {
        self.0.last().copied()
    }

    /// The next adjacent pair to flip through, if any
    #[must_use]
    pub fn current_pair(&self) -> Option<(char, char)> {
        match self.0.as_slice() {
            [from, to, ..] => Some((*from, *to)),
            _ => None,
        }
    }

    /// Drop the leading glyph once its transition has finished
    pub fn advance(&mut self) {
        if !self.0.is_empty() {
            self.0.remove(0);
        }
    }
}

/// How intermediate glyphs are chosen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencePolicy {
    /// Step through the alphabet from current to target, wrapping at the end
    Sequential,
    /// A sampled number of random glyphs between current and target
    Random {
        /// Fewest flips per tile
        min_flips: u32,
        /// Most flips per tile
        max_flips: u32,
    },
}

impl SequencePolicy {
    /// Policy described by a board configuration
    #[must_use]
    pub fn from_config(config: &BoardConfig) -> Self {
        if config.sequential {
            Self::Sequential
        } else {
            let (min_flips, max_flips) = config.flips.range();
            Self::Random {
                min_flips,
                max_flips,
            }
        }
    }
}

/// Build the glyph sequence for one tile
pub fn build_sequence<R: Rng + ?Sized>(
    alphabet: &Alphabet,
    current: char,
    next: char,
    policy: SequencePolicy,
    rng: &mut R,
) -> GlyphSequence {
    match policy {
        SequencePolicy::Sequential => {
            let start = alphabet.index_of(current);
            let end = alphabet.index_of(next);
            // An unchanged glyph goes all the way round the strip
            let steps = if end > start {
                end - start
            } else {
                alphabet.len() - start + end
            };
            GlyphSequence(
                (start..=start + steps)
                    .map(|index| alphabet.glyph_at(index))
                    .collect(),
            )
        }
        SequencePolicy::Random {
            min_flips,
            max_flips,
        } => {
            let count = rng.gen_range(min_flips..=max_flips.max(min_flips));
            let mut glyphs = Vec::with_capacity(count as usize + 1);
            glyphs.push(current);
            for _ in 1..count {
                glyphs.push(alphabet.glyph_at(rng.gen_range(0..alphabet.len())));
            }
            glyphs.push(next);
            GlyphSequence(glyphs)
        }
    }
}

/// Per-tile transition speed: ±10% jitter around the base speed
pub fn jittered_speed<R: Rng + ?Sized>(base_ms: u64, rng: &mut R) -> Duration {
    let base = base_ms as f64;
    let jitter = (rng.gen::<f64>() * base * 0.2).floor();
    Duration::from_micros(((base * 0.9 + jitter) * 1000.0).round() as u64)
}

/// What one tile does during a flip
#[derive(Clone, Debug, PartialEq)]
pub struct TilePlan {
    /// Tile position on the board
    pub position: usize,
    /// Glyphs to traverse
    pub sequence: GlyphSequence,
    /// Duration of each glyph transition
    pub speed: Duration,
}

/// Glyph sequences and speeds for every tile of one flip
#[derive(Clone, Debug, PartialEq)]
pub struct FlipPlan {
    /// One entry per tile, in position order
    pub tiles: Vec<TilePlan>,
}

impl FlipPlan {
    /// Plan a flip between two fitted messages
    pub fn build<R: Rng + ?Sized>(
        alphabet: &Alphabet,
        current: &[char],
        next: &[char],
        policy: SequencePolicy,
        base_speed_ms: u64,
        rng: &mut R,
    ) -> Self {
        let blank = alphabet.blank();
        let length = current.len().max(next.len());
        let tiles = (0..length)
            .map(|position| {
                let from = current.get(position).copied().unwrap_or(blank);
                let to = next.get(position).copied().unwrap_or(blank);
                TilePlan {
                    position,
                    sequence: build_sequence(alphabet, from, to, policy, rng),
                    speed: jittered_speed(base_speed_ms, rng),
                }
            })
            .collect();
        Self { tiles }
    }

    /// Number of tiles
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the plan has no tiles
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
