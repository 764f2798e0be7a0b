//! Per-card stacking transforms.
//!
//! The front card follows the drag and tilts with the ratio.  Cards behind
//! it shrink and drop by one step per layer, and the layer directly behind
//! the front card rises toward the front slot as the ratio grows.

/// Scale decrement applied per stack layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor {
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self {
            scale_x: 0.1,
            scale_y: 0.1,
        }
    }
}

/// Stacking geometry shared by every card in the deck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackGeometry {
    /// Cards shown behind the front card.
    pub visible_item_count: usize,
    pub scale_factor: ScaleFactor,
    /// Vertical drop per layer, in layout units.
    pub translate_unit: f32,
    /// Front-card tilt at `|ratio| == 1`.
    pub rotate_degree: f32,
}

impl Default for StackGeometry {
    fn default() -> Self {
        Self {
            visible_item_count: 3,
            scale_factor: ScaleFactor::default(),
            translate_unit: 1.0,
            rotate_degree: 14.0,
        }
    }
}

/// Visual transform for one card.  Scaling is about the card centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    pub translation_x: f32,
    pub translation_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Clockwise, in degrees.
    pub rotation: f32,
}

impl CardTransform {
    pub const IDENTITY: Self = Self {
        translation_x: 0.0,
        translation_y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        rotation: 0.0,
    };
}

impl Default for CardTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Effective depth of a card behind the front one.
///
/// The last visible layer stays pinned at `visible_item_count - 1` so it
/// waits hidden behind its neighbour instead of popping in.
pub fn stack_depth(position: usize, visible_item_count: usize, ratio: f32) -> f32 {
    if position == visible_item_count {
        visible_item_count as f32 - 1.0
    } else {
        position as f32 - ratio.abs()
    }
}

/// Transform for the card at stack `position` (0 = front).
///
/// `measured_height` is the card's laid-out height; it re-centres a scaled
/// card so its drop stays `depth * translate_unit` below the front card.
pub fn card_transform(
    position: usize,
    offset: f32,
    ratio: f32,
    geometry: &StackGeometry,
    measured_height: f32,
) -> CardTransform {
    if position == 0 {
        return CardTransform {
            translation_x: offset,
            rotation: geometry.rotate_degree * ratio,
            ..CardTransform::IDENTITY
        };
    }

    let depth = stack_depth(position, geometry.visible_item_count, ratio);
    let scale_x = 1.0 - depth * geometry.scale_factor.scale_x;
    let scale_y = 1.0 - depth * geometry.scale_factor.scale_y;
    CardTransform {
        translation_x: 0.0,
        translation_y: depth * geometry.translate_unit + measured_height * (1.0 - scale_y) / 2.0,
        scale_x,
        scale_y,
        rotation: 0.0,
    }
}

/// Extra horizontal travel a tilted card needs to clear the viewport.
///
/// Rotates the card's top-left corner by `rotate_degree` about the card
/// centre and takes the distance it lands from the left edge, plus one
/// `translate_unit`.
pub fn rotation_padding(width: f32, height: f32, rotate_degree: f32, translate_unit: f32) -> f32 {
    let (sin, cos) = rotate_degree.to_radians().sin_cos();
    let (cx, cy) = (width / 2.0, height / 2.0);
    // (0, 0) rotated about (cx, cy)
    let x = cx - cx * cos + cy * sin;
    x.abs() + translate_unit
}
