//! Flap Geometry
//!
//! The two-phase "flap" transition of one tile. An overlay tile is built
//! from four halves stacked over the static tile:
//!
//! ```text
//!  ┌──────────┐  new top    (target glyph, revealed as the old top folds)
//!  │ old top  │  folds down and shrinks during phase A
//!  ├──────────┤  hinge at h/2
//!  │ new bot  │  grows over the old bottom during phase B
//!  └──────────┘  old bottom (source glyph, covered as the new bottom grows)
//! ```
//!
//! Every animated property follows `max(p * delta + start, floor)`: values
//! are clamped from below only. Phase A parts update until the first tick
//! at `p >= 0.5`, phase B parts from the following tick on.
//!
//! With shading enabled a shadow fades in over the folding old top during
//! phase A and a highlight fades out over the unfolding new bottom during
//! phase B.

/// Floor for position properties, far enough away to never saturate
pub const POSITION_FLOOR: f32 = -999_999.0;

/// Half of the transition a part is animated in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlapPhase {
    /// Phase A: the old top folds down
    First,
    /// Phase B: the new bottom unfolds
    Second,
}

/// One eased property: `max(p * delta + start, floor)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepProp {
    /// Value at `p = 0`
    pub start: f32,
    /// Change between `p = 0` and `p = 1`
    pub delta: f32,
    /// Lower bound
    pub floor: f32,
}

impl StepProp {
    /// A property clamped at zero (heights, opacity)
    #[must_use]
    pub const fn extent(start: f32, delta: f32) -> Self {
        Self {
            start,
            delta,
            floor: 0.0,
        }
    }

    /// A position property (effectively unclamped)
    #[must_use]
    pub const fn position(start: f32, delta: f32) -> Self {
        Self {
            start,
            delta,
            floor: POSITION_FLOOR,
        }
    }

    /// Value at progress `p`
    #[must_use]
    pub fn at(&self, p: f32) -> f32 {
        (p * self.delta + self.start).max(self.floor)
    }
}

/// The parts making up an overlay tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlapPart {
    /// Upper half of the target glyph
    NewTop,
    /// Lower half of the source glyph
    OldBottom,
    /// Upper half of the source glyph
    OldTop,
    /// Lower half of the target glyph
    NewBottom,
    /// Dark overlay on the folding old top
    Shadow,
    /// Light overlay on the unfolding new bottom
    Highlight,
}

/// Properties a step can animate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Property {
    Top,
    Height,
    ImageTop,
    ImageHeight,
    Opacity,
}

/// Geometry of one part, in board units relative to the tile
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartGeometry {
    /// Offset of the part from the tile top
    pub top: f32,
    /// Visible height of the part
    pub height: f32,
    /// Offset of the glyph image within the part
    pub image_top: f32,
    /// Rendered height of the glyph image (squashed while folding)
    pub image_height: f32,
    /// Opacity (shading parts only; 1.0 otherwise)
    pub opacity: f32,
}

impl PartGeometry {
    const fn new(top: f32, height: f32, image_top: f32, image_height: f32, opacity: f32) -> Self {
        Self {
            top,
            height,
            image_top,
            image_height,
            opacity,
        }
    }

    fn set(&mut self, property: Property, value: f32) {
        match property {
            Property::Top => self.top = value,
            Property::Height => self.height = value,
            Property::ImageTop => self.image_top = value,
            Property::ImageHeight => self.image_height = value,
            Property::Opacity => self.opacity = value,
        }
    }
}

/// Snapshot of an overlay tile handed to the rendering surface
#[derive(Clone, Debug, PartialEq)]
pub struct FlapFrame {
    /// Sprite offset of the glyph being replaced
    pub from_offset: u32,
    /// Sprite offset of the glyph being revealed
    pub to_offset: u32,
    /// Tile width in board units
    pub tile_width: u32,
    /// Tile height in board units
    pub tile_height: u32,
    /// Upper half of the target glyph
    pub new_top: PartGeometry,
    /// Lower half of the source glyph
    pub old_bottom: PartGeometry,
    /// Upper half of the source glyph
    pub old_top: PartGeometry,
    /// Lower half of the target glyph
    pub new_bottom: PartGeometry,
    /// Shadow overlay, present when shading is enabled
    pub shadow: Option<PartGeometry>,
    /// Highlight overlay, present when shading is enabled
    pub highlight: Option<PartGeometry>,
    /// Phase the transition is in
    pub phase: FlapPhase,
}

impl FlapFrame {
    /// Overlay layout before any progress has been applied
    #[must_use]
    pub fn new(
        from_offset: u32,
        to_offset: u32,
        tile_width: u32,
        tile_height: u32,
        shading: Option<f32>,
    ) -> Self {
        let h = tile_height as f32;
        let half = h / 2.0;
        Self {
            from_offset,
            to_offset,
            tile_width,
            tile_height,
            new_top: PartGeometry::new(0.0, half, 0.0, h, 1.0),
            old_bottom: PartGeometry::new(half, half, -half, h, 1.0),
            old_top: PartGeometry::new(0.0, half, 0.0, h, 1.0),
            new_bottom: PartGeometry::new(half, 0.0, 0.0, 0.0, 1.0),
            shadow: shading.map(|opacity| PartGeometry::new(0.0, half, 0.0, 0.0, opacity)),
            highlight: shading.map(|opacity| PartGeometry::new(half, 0.0, 0.0, 0.0, opacity)),
            phase: FlapPhase::First,
        }
    }

    /// Fraction of the old top still visible (1.0 = untouched)
    #[must_use]
    pub fn old_top_fraction(&self) -> f32 {
        let half = self.tile_height as f32 / 2.0;
        (self.old_top.height / half).clamp(0.0, 1.0)
    }

    /// Fraction of the new bottom already visible (1.0 = fully unfolded)
    #[must_use]
    pub fn new_bottom_fraction(&self) -> f32 {
        let half = self.tile_height as f32 / 2.0;
        (self.new_bottom.height / half).clamp(0.0, 1.0)
    }

    fn part_mut(&mut self, part: FlapPart) -> Option<&mut PartGeometry> {
        match part {
            FlapPart::NewTop => Some(&mut self.new_top),
            FlapPart::OldBottom => Some(&mut self.old_bottom),
            FlapPart::OldTop => Some(&mut self.old_top),
            FlapPart::NewBottom => Some(&mut self.new_bottom),
            FlapPart::Shadow => self.shadow.as_mut(),
            FlapPart::Highlight => self.highlight.as_mut(),
        }
    }
}

/// Animated properties of one part
#[derive(Clone, Debug)]
struct StepComponent {
    part: FlapPart,
    phase: FlapPhase,
    props: Vec<(Property, StepProp)>,
}

/// Drives a [`FlapFrame`] through the two-phase transition
#[derive(Clone, Debug)]
pub struct FlapGeometry {
    components: Vec<StepComponent>,
    phase: FlapPhase,
}

impl FlapGeometry {
    /// Build the step table for a tile of the given height
    ///
    /// `shading` carries the peak shading opacity when shading is enabled.
    #[must_use]
    pub fn new(tile_height: u32, shading: Option<f32>) -> Self {
        let h = tile_height as f32;
        let half = h / 2.0;

        let mut components = vec![
            StepComponent {
                part: FlapPart::OldTop,
                phase: FlapPhase::First,
                props: vec![
                    (Property::Top, StepProp::position(0.0, h)),
                    (Property::Height, StepProp::extent(half + 1.0, -h)),
                    (Property::ImageHeight, StepProp::extent(h, -2.0 * h)),
                ],
            },
            StepComponent {
                part: FlapPart::NewBottom,
                phase: FlapPhase::Second,
                props: vec![
                    (Property::Height, StepProp::extent(-half, h)),
                    (Property::ImageTop, StepProp::position(half, -h)),
                    (Property::ImageHeight, StepProp::extent(-h, 2.0 * h)),
                ],
            },
        ];

        if let Some(opacity) = shading {
            components.push(StepComponent {
                part: FlapPart::Shadow,
                phase: FlapPhase::First,
                props: vec![
                    (Property::Top, StepProp::position(0.0, h)),
                    (Property::Height, StepProp::extent(half + 1.0, -h)),
                    (Property::Opacity, StepProp::extent(0.0, 2.0 * opacity)),
                ],
            });
            components.push(StepComponent {
                part: FlapPart::Highlight,
                phase: FlapPhase::Second,
                props: vec![
                    (Property::Height, StepProp::extent(-half, h)),
                    (
                        Property::Opacity,
                        StepProp::extent(2.0 * opacity, -2.0 * opacity),
                    ),
                ],
            });
        }

        Self {
            components,
            phase: FlapPhase::First,
        }
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> FlapPhase {
        self.phase
    }

    /// Apply eased progress `p` to the parts of the current phase
    pub fn apply(&mut self, p: f32, frame: &mut FlapFrame) {
        for component in &self.components {
            if component.phase != self.phase {
                continue;
            }
            if let Some(part) = frame.part_mut(component.part) {
                for (property, prop) in &component.props {
                    part.set(*property, prop.at(p));
                }
            }
        }

        if self.phase == FlapPhase::First && p >= 0.5 {
            self.phase = FlapPhase::Second;
        }
        frame.phase = self.phase;
    }
}
