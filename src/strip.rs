//! Level-oriented heuristics: boxes are grouped into horizontal strips whose height is
//! set by their first (tallest) box, and strips are stacked inside bins.

use tracing::{trace, warn};

use crate::error::PackError;
use crate::options::Interrupt;
use crate::types::{Arena, Bin, Handle, Item, Layout, Rect, sort_by_height};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    First,
    Next,
    Best,
}

impl Fit {
    /// Picks a container for an item of size `need`, given each open container's
    /// remaining capacity in creation order.
    pub fn select(self, remaining: &[u32], need: u32) -> Option<usize> {
        match self {
            Fit::First => remaining.iter().position(|&r| r >= need),
            Fit::Next => match remaining.last() {
                Some(&r) if r >= need => Some(remaining.len() - 1),
                _ => None,
            },
            Fit::Best => remaining
                .iter()
                .enumerate()
                .filter(|&(_, &r)| r >= need)
                // min_by_key keeps the first of equal keys
                .min_by_key(|&(_, &r)| r)
                .map(|(idx, _)| idx),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Strip {
    pub handles: Vec<Handle>,
    pub height: u32,
    pub width: u32,
}

impl Strip {
    fn open(handle: Handle, rect: Rect) -> Self {
        Self {
            handles: vec![handle],
            height: rect.h,
            width: rect.w,
        }
    }

    fn push(&mut self, handle: Handle, rect: Rect) {
        debug_assert!(rect.h <= self.height);
        self.handles.push(handle);
        self.width += rect.w;
    }
}

/// A bin in the two-phase pipeline: strips stacked bottom-up.
#[derive(Debug, Clone, Default)]
pub struct StripBin {
    pub strips: Vec<Strip>,
    pub height: u32,
}

impl StripBin {
    fn push(&mut self, strip: Strip) {
        self.height += strip.height;
        self.strips.push(strip);
    }
}

/// Phase one: FFDH / NFDH / BFDH. The arena must already be sorted by height,
/// tallest first, and hold no box wider than `width`.
pub(crate) fn pack_strips(
    fit: Fit,
    arena: &Arena,
    width: u32,
    interrupt: &Interrupt,
) -> Result<Vec<Strip>, PackError> {
    let mut strips: Vec<Strip> = Vec::new();
    let mut remaining: Vec<u32> = Vec::new();

    for handle in arena.handles() {
        interrupt.check()?;
        let rect = arena.rect(handle);
        match fit.select(&remaining, rect.w) {
            Some(idx) => {
                strips[idx].push(handle, rect);
                remaining[idx] -= rect.w;
            }
            None => {
                strips.push(Strip::open(handle, rect));
                remaining.push(width - rect.w);
            }
        }
    }
    Ok(strips)
}

/// Phase two: FFD / NFD / BFD over strips, with strip height as the item size. No strip
/// may be taller than `height`.
pub(crate) fn assign_bins(fit: Fit, strips: Vec<Strip>, height: u32) -> Vec<StripBin> {
    let mut bins: Vec<StripBin> = Vec::new();
    let mut remaining: Vec<u32> = Vec::new();

    for strip in strips {
        let need = strip.height;
        match fit.select(&remaining, need) {
            Some(idx) => {
                bins[idx].push(strip);
                remaining[idx] -= need;
            }
            None => {
                let mut bin = StripBin::default();
                bin.push(strip);
                bins.push(bin);
                remaining.push(height - need);
            }
        }
    }
    bins
}

/// Commits coordinates for every box referenced by `bins` and flattens them into
/// placements, bin by bin, strip by strip.
pub(crate) fn unstrip(arena: &mut Arena, bins: &[StripBin]) -> Vec<Bin> {
    let mut out = Vec::with_capacity(bins.len());
    for strip_bin in bins {
        let mut bin = Bin::default();
        let mut y = 0;
        for strip in &strip_bin.strips {
            let mut x = 0;
            for &handle in &strip.handles {
                arena.commit(handle, x, y);
                bin.placements.extend(arena.placement(handle));
                x += arena.rect(handle).w;
            }
            y += strip.height;
        }
        out.push(bin);
    }
    out
}

/// Sets aside boxes that exceed the bin in either dimension and sorts the rest by
/// height, tallest first.
fn prepare(bin: Rect, items: Vec<Item>) -> (Arena, Vec<Item>) {
    let (mut fitting, unplaced): (Vec<Item>, Vec<Item>) =
        items.into_iter().partition(|item| item.rect.fits_in(&bin));
    for item in &unplaced {
        warn!(id = item.id, rect = %item.rect, "box does not fit an empty bin");
    }
    sort_by_height(&mut fitting);
    (Arena::new(fitting), unplaced)
}

/// HFF / HNF / HBF: strip packing, then bin assignment, with the same policy in both.
pub fn hybrid(
    fit: Fit,
    bin: Rect,
    items: Vec<Item>,
    interrupt: &Interrupt,
) -> Result<Layout, PackError> {
    let (mut arena, unplaced) = prepare(bin, items);
    let strips = pack_strips(fit, &arena, bin.w, interrupt)?;
    trace!(strips = strips.len(), "strip phase done");
    let strip_bins = assign_bins(fit, strips, bin.h);
    Ok(Layout {
        bins: unstrip(&mut arena, &strip_bins),
        unplaced,
    })
}

/// FFF: any strip of any bin with room, else a new strip in the first bin with room,
/// else a new bin.
pub fn finite_first_fit(
    bin: Rect,
    items: Vec<Item>,
    interrupt: &Interrupt,
) -> Result<Layout, PackError> {
    let (mut arena, unplaced) = prepare(bin, items);
    let mut bins: Vec<StripBin> = Vec::new();

    for handle in arena.handles() {
        interrupt.check()?;
        let rect = arena.rect(handle);

        let strip_slot = bins.iter().enumerate().find_map(|(b, sb)| {
            sb.strips
                .iter()
                .position(|s| bin.w - s.width >= rect.w)
                .map(|s| (b, s))
        });
        if let Some((b, s)) = strip_slot {
            bins[b].strips[s].push(handle, rect);
            continue;
        }

        let strip = Strip::open(handle, rect);
        match bins.iter().position(|sb| bin.h - sb.height >= rect.h) {
            Some(b) => bins[b].push(strip),
            None => {
                let mut fresh = StripBin::default();
                fresh.push(strip);
                bins.push(fresh);
            }
        }
    }
    Ok(Layout {
        bins: unstrip(&mut arena, &bins),
        unplaced,
    })
}

/// FNF: only the current strip of the current bin is ever extended.
pub fn finite_next_fit(
    bin: Rect,
    items: Vec<Item>,
    interrupt: &Interrupt,
) -> Result<Layout, PackError> {
    let (mut arena, unplaced) = prepare(bin, items);
    let mut bins: Vec<StripBin> = Vec::new();

    for handle in arena.handles() {
        interrupt.check()?;
        let rect = arena.rect(handle);

        if let Some(current) = bins.last_mut() {
            if let Some(strip) = current.strips.last_mut()
                && bin.w - strip.width >= rect.w
            {
                strip.push(handle, rect);
                continue;
            }
            if bin.h - current.height >= rect.h {
                current.push(Strip::open(handle, rect));
                continue;
            }
        }
        let mut fresh = StripBin::default();
        fresh.push(Strip::open(handle, rect));
        bins.push(fresh);
    }
    Ok(Layout {
        bins: unstrip(&mut arena, &bins),
        unplaced,
    })
}
