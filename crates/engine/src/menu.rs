//! Row action menu: the actions it offers and where it is drawn.
//!
//! Placement works in viewport coordinates so the menu is never clipped by a
//! scrolling list container. Units are whatever the front-end uses (terminal
//! cells, pixels).

/// Actions offered by every row's menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    ViewDetail,
    Edit,
    Delete,
}

impl RowAction {
    pub const ALL: [RowAction; 3] = [RowAction::ViewDetail, RowAction::Edit, RowAction::Delete];

    pub fn label(self) -> &'static str {
        match self {
            Self::ViewDetail => "View details",
            Self::Edit => "Edit",
            Self::Delete => "Delete",
        }
    }

    /// Stable identifier used in markup attributes and CLI arguments.
    pub fn key(self) -> &'static str {
        match self {
            Self::ViewDetail => "view",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }

    pub fn is_destructive(self) -> bool {
        matches!(self, Self::Delete)
    }
}

/// An axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Where to draw the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuPlacement {
    pub bounds: Bounds,
    /// The menu opens above its trigger.
    pub flipped: bool,
}

/// Position a menu of `menu_width` x `menu_height` next to `trigger`.
///
/// The menu opens `gap` below the trigger with its right edge aligned to the
/// trigger's right edge. When that would cross the bottom of `viewport`, it
/// opens above the trigger instead. The result is clamped to the viewport's
/// top-left corner.
pub fn place_menu(trigger: Bounds, menu_width: i32, menu_height: i32, viewport: Bounds, gap: i32) -> MenuPlacement {
    let below = trigger.bottom() + gap;
    let flipped = below + menu_height > viewport.bottom();
    let y = if flipped { trigger.y - gap - menu_height } else { below };
    let x = trigger.right() - menu_width;

    MenuPlacement {
        bounds: Bounds {
            x: x.max(viewport.x),
            y: y.max(viewport.y),
            width: menu_width,
            height: menu_height,
        },
        flipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Bounds = Bounds::new(0, 0, 100, 40);

    #[test]
    fn opens_below_and_right_aligned() {
        let trigger = Bounds::new(80, 5, 3, 1);
        let placement = place_menu(trigger, 16, 5, VIEWPORT, 0);
        assert!(!placement.flipped);
        assert_eq!(placement.bounds, Bounds::new(67, 6, 16, 5));
    }

    #[test]
    fn flips_above_near_the_bottom() {
        let trigger = Bounds::new(80, 37, 3, 1);
        let placement = place_menu(trigger, 16, 5, VIEWPORT, 0);
        assert!(placement.flipped);
        assert_eq!(placement.bounds.y, 32);
        assert_eq!(placement.bounds.bottom(), trigger.y);
    }

    #[test]
    fn gap_applies_in_both_directions() {
        let low = place_menu(Bounds::new(50, 10, 20, 24), 120, 80, Bounds::new(0, 0, 800, 600), 4);
        assert_eq!(low.bounds.y, 38);
        let high = place_menu(Bounds::new(50, 560, 20, 24), 120, 80, Bounds::new(0, 0, 800, 600), 4);
        assert!(high.flipped);
        assert_eq!(high.bounds.y, 476);
    }

    #[test]
    fn clamps_to_viewport_origin() {
        let placement = place_menu(Bounds::new(2, 1, 3, 1), 16, 50, VIEWPORT, 0);
        assert!(placement.flipped);
        assert_eq!(placement.bounds.x, 0);
        assert_eq!(placement.bounds.y, 0);
    }

    #[test]
    fn actions_are_listed_in_menu_order() {
        let labels: Vec<_> = RowAction::ALL.iter().map(|action| action.label()).collect();
        assert_eq!(labels, ["View details", "Edit", "Delete"]);
        assert!(RowAction::Delete.is_destructive());
    }
}
