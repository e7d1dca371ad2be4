//! Finite Bottom-Left and Next Bottom-Left: boxes sorted by width, each placed at the
//! lowest-then-leftmost free grid coordinate.

use tracing::warn;

use crate::error::PackError;
use crate::grid::{self, Direction};
use crate::options::Interrupt;
use crate::types::{Bin, Item, Layout, Rect, sort_by_width};

/// FBL: every open bin is tried in order before a new one is opened.
pub fn finite(bin: Rect, mut items: Vec<Item>, interrupt: &Interrupt) -> Result<Layout, PackError> {
    sort_by_width(&mut items);
    let mut layout = Layout::default();

    'items: for item in items {
        for open in layout.bins.iter_mut() {
            if grid::place(open, bin, item, Direction::Bottom, interrupt)? {
                continue 'items;
            }
        }

        let mut fresh = Bin::default();
        if grid::place(&mut fresh, bin, item, Direction::Bottom, interrupt)? {
            layout.bins.push(fresh);
        } else {
            warn!(id = item.id, rect = %item.rect, "box does not fit an empty bin");
            layout.unplaced.push(item);
        }
    }
    Ok(layout)
}

/// NBL: only the current bin is tried; on failure it is closed for good.
pub fn next(bin: Rect, mut items: Vec<Item>, interrupt: &Interrupt) -> Result<Layout, PackError> {
    sort_by_width(&mut items);
    let mut layout = Layout::default();
    let mut current = Bin::default();

    for item in items {
        if grid::place(&mut current, bin, item, Direction::Bottom, interrupt)? {
            continue;
        }
        if !current.is_empty() {
            layout.bins.push(std::mem::take(&mut current));
            if grid::place(&mut current, bin, item, Direction::Bottom, interrupt)? {
                continue;
            }
        }
        // Failing in an empty bin means the box is larger than the bin; it is reported,
        // never recorded in a bin.
        warn!(id = item.id, rect = %item.rect, "box does not fit an empty bin");
        layout.unplaced.push(item);
    }

    if !current.is_empty() {
        layout.bins.push(current);
    }
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(dims: &[(u32, u32)]) -> Vec<Item> {
        let rects: Vec<Rect> = dims.iter().map(|&(w, h)| Rect::new(w, h)).collect();
        Item::from_boxes(&rects)
    }

    fn coords(bin: &Bin) -> Vec<(usize, u32, u32)> {
        bin.placements.iter().map(|p| (p.id, p.x, p.y)).collect()
    }

    #[test]
    fn test_fbl_bottom_left_positions() {
        // widest first: (6,4) id0, (5,3) id2, (5,7) id3, (4,4) id1
        let layout = finite(
            Rect::new(10, 10),
            items(&[(6, 4), (4, 4), (5, 3), (5, 7)]),
            &Interrupt::never(),
        )
        .unwrap();
        assert!(layout.unplaced.is_empty());
        assert_eq!(layout.bins.len(), 2);
        // (5,7) cannot sit beside (6,4) (6+5>10) nor on top of it (4+7>10)
        assert_eq!(coords(&layout.bins[0]), vec![(0, 0, 0), (2, 0, 4), (1, 6, 0)]);
        assert_eq!(coords(&layout.bins[1]), vec![(3, 0, 0)]);
    }

    #[test]
    fn test_fbl_returns_to_earlier_bins() {
        // (6,6) fills most of bin 1, (5,5) needs bin 2, (4,4) still fits beside (6,6)
        let layout = finite(
            Rect::new(10, 10),
            items(&[(6, 6), (5, 5), (4, 4)]),
            &Interrupt::never(),
        )
        .unwrap();
        assert_eq!(layout.bins.len(), 2);
        assert_eq!(coords(&layout.bins[0]), vec![(0, 0, 0), (2, 6, 0)]);
        assert_eq!(coords(&layout.bins[1]), vec![(1, 0, 0)]);
    }

    #[test]
    fn test_nbl_never_returns_to_closed_bins() {
        let layout = next(
            Rect::new(10, 10),
            items(&[(6, 6), (5, 5), (4, 4)]),
            &Interrupt::never(),
        )
        .unwrap();
        assert_eq!(layout.bins.len(), 2);
        assert_eq!(coords(&layout.bins[0]), vec![(0, 0, 0)]);
        assert_eq!(coords(&layout.bins[1]), vec![(1, 0, 0), (2, 5, 0)]);
    }

    #[test]
    fn test_oversized_box_is_never_recorded() {
        let input = items(&[(11, 5), (3, 3)]);
        for layout in [
            finite(Rect::new(10, 10), input.clone(), &Interrupt::never()).unwrap(),
            next(Rect::new(10, 10), input.clone(), &Interrupt::never()).unwrap(),
        ] {
            assert_eq!(layout.unplaced.len(), 1);
            assert_eq!(layout.unplaced[0].id, 0);
            assert_eq!(layout.bins.len(), 1);
            assert_eq!(coords(&layout.bins[0]), vec![(1, 0, 0)]);
        }
    }

    #[test]
    fn test_nbl_oversized_box_still_closes_current_bin() {
        let layout = next(
            Rect::new(10, 10),
            items(&[(4, 4), (3, 12), (2, 2)]),
            &Interrupt::never(),
        )
        .unwrap();
        assert_eq!(layout.unplaced.len(), 1);
        assert_eq!(layout.unplaced[0].id, 1);
        assert_eq!(layout.bins.len(), 2);
        assert_eq!(coords(&layout.bins[0]), vec![(0, 0, 0)]);
        assert_eq!(coords(&layout.bins[1]), vec![(2, 0, 0)]);
    }
}
