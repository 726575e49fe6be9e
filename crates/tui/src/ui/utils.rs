//! Layout helpers shared by the components.

use formwork_engine::Bounds;
use ratatui::prelude::*;

/// A rectangle `percent_x` wide and `percent_y` tall, centered in `r`.
/// Used for modal dialogs.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);
    area[1]
}

/// Terminal cells to engine geometry.
pub fn rect_to_bounds(rect: Rect) -> Bounds {
    Bounds::new(
        i32::from(rect.x),
        i32::from(rect.y),
        i32::from(rect.width),
        i32::from(rect.height),
    )
}

/// Engine geometry back to terminal cells, clipped to `within`.
pub fn bounds_to_rect(bounds: Bounds, within: Rect) -> Rect {
    let clamp = |value: i32| u16::try_from(value.max(0)).unwrap_or(u16::MAX);
    let left = bounds.x.max(0);
    let top = bounds.y.max(0);
    let right = bounds.right().max(left);
    let bottom = bounds.bottom().max(top);
    Rect::new(clamp(left), clamp(top), clamp(right - left), clamp(bottom - top)).intersection(within)
}

pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    rect.contains(Position::new(column, row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_is_inside_parent() {
        let parent = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(60, 40, parent);
        assert_eq!(centered.width, 60);
        assert_eq!(centered.height, 20);
        assert_eq!(centered.x, 20);
    }

    #[test]
    fn bounds_round_trip_and_clip() {
        let viewport = Rect::new(0, 0, 80, 24);
        let rect = Rect::new(5, 6, 10, 3);
        assert_eq!(bounds_to_rect(rect_to_bounds(rect), viewport), rect);
        let overflow = Bounds::new(75, -2, 10, 4);
        assert_eq!(bounds_to_rect(overflow, viewport), Rect::new(75, 0, 5, 2));
    }
}
