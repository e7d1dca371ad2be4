//! Alternate Directions: seed `L` bins from the area lower bound, fill them bottom-left,
//! then place the overflow scanning columns alternately left-to-right and right-to-left.

use std::collections::VecDeque;

use tracing::{debug, trace, warn};

use crate::error::PackError;
use crate::grid::{self, Direction};
use crate::options::Interrupt;
use crate::types::{Bin, Item, Layout, Rect, sort_by_height};

/// `ceil(total box area / bin area)`.
pub fn lower_bound(bin: Rect, items: &[Item]) -> usize {
    let total: u64 = items.iter().map(|i| i.rect.area()).sum();
    if total == 0 {
        return 0;
    }
    total.div_ceil(bin.area()) as usize
}

#[derive(Debug, Clone)]
pub struct Run {
    pub layout: Layout,
    pub lower_bound: usize,
    /// Boxes handled by the alternating phase.
    pub overflow: usize,
}

pub fn run(bin: Rect, mut items: Vec<Item>, interrupt: &Interrupt) -> Result<Run, PackError> {
    let bound = lower_bound(bin, &items);
    sort_by_height(&mut items);

    let mut bins = vec![Bin::default(); bound];
    let mut queue: VecDeque<Item> = VecDeque::new();
    let mut remaining = items.into_iter();

    for item in remaining.by_ref() {
        let mut placed = false;
        for seeded in bins.iter_mut() {
            if grid::place(seeded, bin, item, Direction::Bottom, interrupt)? {
                placed = true;
                break;
            }
        }
        if !placed {
            queue.push_back(item);
            break;
        }
    }
    queue.extend(remaining);
    debug!(lower_bound = bound, overflow = queue.len(), "seeded bins filled");

    let mut layout = Layout::default();
    let mut overflow = 0;
    let mut current = 0;
    let mut direction = Direction::LeftToRight;

    while let Some(item) = queue.pop_front() {
        overflow += 1;
        let mut placed = false;
        for open in bins.iter_mut().skip(current) {
            if grid::place(open, bin, item, direction, interrupt)? {
                placed = true;
                break;
            }
        }
        if !placed {
            let mut fresh = Bin::default();
            if grid::place(&mut fresh, bin, item, direction, interrupt)? {
                bins.push(fresh);
                current = bins.len() - 1;
            } else {
                warn!(id = item.id, rect = %item.rect, "box does not fit an empty bin");
                layout.unplaced.push(item);
            }
        }
        trace!(id = item.id, ?direction, current, "overflow box handled");
        direction = direction.flipped();
    }

    bins.retain(|b| !b.is_empty());
    layout.bins = bins;
    Ok(Run {
        layout,
        lower_bound: bound,
        overflow,
    })
}
