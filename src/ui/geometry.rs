//! Window placement helpers.
//!
//! Dialogs call [`center_on_parent`] from their own constructors to place
//! themselves over the window that opened them.

/// Size of a window in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// A window rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Geometry string in `WIDTHxHEIGHT+X+Y` form.
    pub fn to_geometry(&self) -> String {
        format!("{}x{}{:+}{:+}", self.width, self.height, self.x, self.y)
    }
}

/// Place a window of `window` size centered over `parent`.
///
/// A window larger than its parent extends past it equally on both sides
/// (rounding toward the top-left).
pub fn center_on_parent(window: Size, parent: Rect) -> Rect {
    let x = parent.x + (parent.width - window.width).div_euclid(2);
    let y = parent.y + (parent.height - window.height).div_euclid(2);
    Rect::new(x, y, window.width, window.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_smaller_window() {
        let parent = Rect::new(100, 50, 800, 600);
        let placed = center_on_parent(Size::new(400, 300), parent);
        assert_eq!(placed, Rect::new(300, 200, 400, 300));
    }

    #[test]
    fn test_center_odd_difference_rounds_down() {
        let placed = center_on_parent(Size::new(10, 10), Rect::new(0, 0, 15, 15));
        assert_eq!((placed.x, placed.y), (2, 2));
    }

    #[test]
    fn test_center_larger_window() {
        let placed = center_on_parent(Size::new(300, 300), Rect::new(0, 0, 100, 101));
        assert_eq!((placed.x, placed.y), (-100, -100));
        assert_eq!(placed.size(), Size::new(300, 300));
    }

    #[test]
    fn test_geometry_string() {
        assert_eq!(Rect::new(300, 200, 400, 300).to_geometry(), "400x300+300+200");
        assert_eq!(Rect::new(-5, 0, 10, 10).to_geometry(), "10x10-5+0");
    }
}
