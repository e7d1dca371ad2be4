//! Exhaustive integer-grid placement search shared by the bottom-left and
//! alternate-directions heuristics.

use crate::error::PackError;
use crate::options::Interrupt;
use crate::types::{Bin, Item, Placement, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Rows bottom-up, each row left to right.
    Bottom,
    /// Columns left to right, each column bottom-up.
    LeftToRight,
    /// Columns right to left, each column bottom-up.
    RightToLeft,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Bottom => Direction::Bottom,
            Direction::LeftToRight => Direction::RightToLeft,
            Direction::RightToLeft => Direction::LeftToRight,
        }
    }
}

/// Whether `rect` at `(x, y)` overlaps `placed`. Touching edges is not overlap.
pub fn overlaps(x: u32, y: u32, rect: Rect, placed: &Placement) -> bool {
    !(x + rect.w <= placed.x
        || placed.right() <= x
        || y + rect.h <= placed.y
        || placed.top() <= y)
}

/// Returns the first coordinate, in `direction` scan order, where `rect` lies inside
/// `bin` without overlapping anything in `placed`. Nothing is mutated.
pub fn find_position(
    bin: Rect,
    placed: &[Placement],
    rect: Rect,
    direction: Direction,
    interrupt: &Interrupt,
) -> Result<Option<(u32, u32)>, PackError> {
    if !rect.fits_in(&bin) {
        return Ok(None);
    }
    let max_x = bin.w - rect.w;
    let max_y = bin.h - rect.h;

    match direction {
        Direction::Bottom => {
            for y in 0..=max_y {
                interrupt.check()?;
                if let Some(x) = scan_row(placed, rect, y, max_x) {
                    return Ok(Some((x, y)));
                }
            }
        }
        Direction::LeftToRight => {
            for x in 0..=max_x {
                interrupt.check()?;
                if let Some(y) = scan_column(placed, rect, x, max_y) {
                    return Ok(Some((x, y)));
                }
            }
        }
        Direction::RightToLeft => {
            for x in (0..=max_x).rev() {
                interrupt.check()?;
                if let Some(y) = scan_column(placed, rect, x, max_y) {
                    return Ok(Some((x, y)));
                }
            }
        }
    }
    Ok(None)
}

// Every x between a candidate and the right edge of the box blocking it overlaps that
// same box, so the scan can resume at the blocker's right edge.
fn scan_row(placed: &[Placement], rect: Rect, y: u32, max_x: u32) -> Option<u32> {
    let mut x = 0;
    while x <= max_x {
        match placed.iter().find(|p| overlaps(x, y, rect, p)) {
            None => return Some(x),
            Some(blocker) => x = blocker.right(),
        }
    }
    None
}

fn scan_column(placed: &[Placement], rect: Rect, x: u32, max_y: u32) -> Option<u32> {
    let mut y = 0;
    while y <= max_y {
        match placed.iter().find(|p| overlaps(x, y, rect, p)) {
            None => return Some(y),
            Some(blocker) => y = blocker.top(),
        }
    }
    None
}

/// Searches `bin` for a spot and records the placement only if one is found.
pub fn place(
    bin: &mut Bin,
    size: Rect,
    item: Item,
    direction: Direction,
    interrupt: &Interrupt,
) -> Result<bool, PackError> {
    match find_position(size, &bin.placements, item.rect, direction, interrupt)? {
        Some((x, y)) => {
            bin.placements.push(Placement {
                id: item.id,
                rect: item.rect,
                x,
                y,
            });
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn at(x: u32, y: u32, w: u32, h: u32) -> Placement {
        Placement {
            id: 0,
            rect: Rect::new(w, h),
            x,
            y,
        }
    }

    #[test]
    fn test_touching_is_not_overlap() {
        let placed = at(0, 0, 5, 5);
        assert!(!overlaps(5, 0, Rect::new(3, 3), &placed));
        assert!(!overlaps(0, 5, Rect::new(3, 3), &placed));
        assert!(overlaps(4, 4, Rect::new(3, 3), &placed));
        assert!(overlaps(1, 1, Rect::new(1, 1), &placed));
    }

    #[test]
    fn test_empty_bin_gives_origin() {
        let bin = Rect::new(10, 10);
        for dir in [Direction::Bottom, Direction::LeftToRight] {
            let pos = find_position(bin, &[], Rect::new(3, 4), dir, &Interrupt::never());
            assert_eq!(pos, Ok(Some((0, 0))));
        }
    }

    #[test]
    fn test_right_to_left_starts_at_max_x() {
        let pos = find_position(
            Rect::new(10, 10),
            &[],
            Rect::new(3, 4),
            Direction::RightToLeft,
            &Interrupt::never(),
        );
        assert_eq!(pos, Ok(Some((7, 0))));
    }

    // A 6x6 block in the bottom-left corner of a 10x10 bin; a 4x4 box probes around it.
    #[test_case(Direction::Bottom, (6, 0); "bottom prefers the lowest row")]
    #[test_case(Direction::LeftToRight, (0, 6); "left to right prefers the leftmost column")]
    #[test_case(Direction::RightToLeft, (6, 0); "right to left prefers the rightmost column")]
    fn test_scan_order(direction: Direction, expected: (u32, u32)) {
        let placed = [at(0, 0, 6, 6)];
        let pos = find_position(
            Rect::new(10, 10),
            &placed,
            Rect::new(4, 4),
            direction,
            &Interrupt::never(),
        );
        assert_eq!(pos, Ok(Some(expected)));
    }

    #[test]
    fn test_bottom_finds_gap_between_boxes() {
        let placed = [at(0, 0, 3, 10), at(5, 0, 5, 10)];
        let pos = find_position(
            Rect::new(10, 10),
            &placed,
            Rect::new(2, 10),
            Direction::Bottom,
            &Interrupt::never(),
        );
        assert_eq!(pos, Ok(Some((3, 0))));
    }

    #[test]
    fn test_no_room() {
        let placed = [at(0, 0, 10, 6)];
        let pos = find_position(
            Rect::new(10, 10),
            &placed,
            Rect::new(5, 5),
            Direction::Bottom,
            &Interrupt::never(),
        );
        assert_eq!(pos, Ok(None));
    }

    #[test]
    fn test_oversized_never_fits() {
        let pos = find_position(
            Rect::new(10, 10),
            &[],
            Rect::new(11, 5),
            Direction::Bottom,
            &Interrupt::never(),
        );
        assert_eq!(pos, Ok(None));
    }

    #[test]
    fn test_failed_place_leaves_bin_untouched() {
        let mut bin = Bin {
            placements: vec![at(0, 0, 10, 6)],
        };
        let before = bin.clone();
        let item = Item {
            id: 7,
            rect: Rect::new(5, 5),
        };
        let placed = place(
            &mut bin,
            Rect::new(10, 10),
            item,
            Direction::Bottom,
            &Interrupt::never(),
        );
        assert_eq!(placed, Ok(false));
        assert_eq!(bin, before);
    }

    #[test]
    fn test_interrupt_aborts_scan() {
        let options = crate::options::PackOptions::default()
            .with_time_limit(std::time::Duration::ZERO);
        let pos = find_position(
            Rect::new(10, 10),
            &[],
            Rect::new(1, 1),
            Direction::Bottom,
            &options.interrupt(),
        );
        assert_eq!(pos, Err(PackError::DeadlineExceeded));
    }
}
