//! Widget placement on the character grid.
//!
//! Every widget describes where it wants to live with a [`Placement`]
//! (an alignment anchor plus optional per-axis offsets) and how much room it
//! needs. [`compute`] turns that into an absolute grid position that always
//! fits inside the surface; clipping anything that still does not fit is the
//! surface's job.

/// Absolute grid position in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Anchor used before offsets are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Center,
    Right,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetOp {
    /// Replace the anchored coordinate
    Set,
    /// Move right/down from the anchor
    Add,
    /// Move left/up from the anchor
    Subtract,
}

/// Per-axis adjustment of the anchored coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub value: i32,
    pub op: OffsetOp,
}

impl Offset {
    pub fn set(value: i32) -> Self {
        Self { value, op: OffsetOp::Set }
    }

    pub fn add(value: i32) -> Self {
        Self { value, op: OffsetOp::Add }
    }

    pub fn subtract(value: i32) -> Self {
        Self {
            value,
            op: OffsetOp::Subtract,
        }
    }

    fn apply(&self, anchor: i32) -> i32 {
        match self.op {
            OffsetOp::Set => self.value,
            OffsetOp::Add => anchor.saturating_add(self.value),
            OffsetOp::Subtract => anchor.saturating_sub(self.value),
        }
    }
}

/// Alignment plus optional offsets; what the domain layer passes as "position".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    pub alignment: Alignment,
    pub x: Option<Offset>,
    pub y: Option<Offset>,
}

impl Placement {
    pub fn center() -> Self {
        Self::aligned(Alignment::Center)
    }

    pub fn left() -> Self {
        Self::aligned(Alignment::Left)
    }

    pub fn right() -> Self {
        Self::aligned(Alignment::Right)
    }

    pub fn aligned(alignment: Alignment) -> Self {
        Self {
            alignment,
            x: None,
            y: None,
        }
    }

    pub fn with_x(mut self, offset: Offset) -> Self {
        self.x = Some(offset);
        self
    }

    pub fn with_y(mut self, offset: Offset) -> Self {
        self.y = Some(offset);
        self
    }
}

/// Size of a widget plus where it should be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetBounds {
    pub width: u16,
    pub height: u16,
    pub placement: Placement,
}

impl WidgetBounds {
    pub fn new(width: u16, height: u16, placement: Placement) -> Self {
        Self {
            width,
            height,
            placement,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Map bounds onto the surface, clamping so the widget fits when it can.
pub fn compute(bounds: &WidgetBounds, surface_size: (u16, u16)) -> Position {
    let (surface_w, surface_h) = (surface_size.0 as i32, surface_size.1 as i32);
    let (w, h) = (bounds.width as i32, bounds.height as i32);

    let (anchor_x, anchor_y) = match bounds.placement.alignment {
        Alignment::Center => ((surface_w - w).div_euclid(2), (surface_h - h).div_euclid(2)),
        Alignment::Right => (surface_w - w - 1, (surface_h - h).div_euclid(2)),
        Alignment::Left => (1, 1),
    };

    let x = bounds
        .placement
        .x
        .map_or(anchor_x, |offset| offset.apply(anchor_x));
    let y = bounds
        .placement
        .y
        .map_or(anchor_y, |offset| offset.apply(anchor_y));

    Position {
        x: clamp_axis(x, surface_w - w),
        y: clamp_axis(y, surface_h - h),
    }
}

fn clamp_axis(value: i32, max: i32) -> u16 {
    value.clamp(0, max.max(0)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(width: u16, height: u16, placement: Placement) -> WidgetBounds {
        WidgetBounds::new(width, height, placement)
    }

    #[test]
    fn test_center_anchor_uses_integer_division() {
        let pos = compute(&bounds(10, 3, Placement::center()), (81, 24));
        assert_eq!(pos, Position::new(35, 10));
    }

    #[test]
    fn test_right_and_left_anchors() {
        let right = compute(&bounds(10, 4, Placement::right()), (80, 24));
        assert_eq!(right, Position::new(69, 10));

        let left = compute(&bounds(10, 4, Placement::left()), (80, 24));
        assert_eq!(left, Position::new(1, 1));
    }

    #[test]
    fn test_offsets_are_relative_to_anchor() {
        let placement = Placement::center()
            .with_x(Offset::add(5))
            .with_y(Offset::subtract(3));
        let pos = compute(&bounds(10, 4, placement), (80, 24));
        assert_eq!(pos, Position::new(40, 7));

        let placement = Placement::right().with_x(Offset::set(2)).with_y(Offset::set(0));
        let pos = compute(&bounds(10, 4, placement), (80, 24));
        assert_eq!(pos, Position::new(2, 0));
    }

    #[test]
    fn test_clamps_into_surface() {
        // Pushed past the right/bottom edge
        let placement = Placement::center()
            .with_x(Offset::add(500))
            .with_y(Offset::add(500));
        let pos = compute(&bounds(10, 4, placement), (80, 24));
        assert_eq!(pos, Position::new(70, 20));

        // Pulled past the left/top edge
        let placement = Placement::left()
            .with_x(Offset::subtract(9))
            .with_y(Offset::set(-4));
        let pos = compute(&bounds(10, 4, placement), (80, 24));
        assert_eq!(pos, Position::new(0, 0));
    }

    #[test]
    fn test_extreme_offsets_saturate_then_clamp() {
        let placement = Placement::center()
            .with_x(Offset::add(i32::MAX))
            .with_y(Offset::subtract(i32::MAX));
        let pos = compute(&bounds(10, 4, placement), (80, 24));
        assert_eq!(pos, Position::new(70, 0));

        let placement = Placement::right()
            .with_x(Offset::subtract(i32::MIN))
            .with_y(Offset::add(i32::MIN));
        let pos = compute(&bounds(10, 4, placement), (80, 24));
        assert_eq!(pos, Position::new(70, 0));
    }

    #[test]
    fn test_oversized_widget_clamps_to_origin() {
        for alignment in [Alignment::Center, Alignment::Right, Alignment::Left] {
            let pos = compute(&bounds(200, 90, Placement::aligned(alignment)), (80, 24));
            assert_eq!(pos, Position::new(0, 0));
            assert!(pos.x <= 80 && pos.y <= 24);
        }
    }

    #[test]
    fn test_empty_bounds() {
        assert!(bounds(0, 3, Placement::center()).is_empty());
        assert!(!bounds(1, 1, Placement::center()).is_empty());
    }
}
