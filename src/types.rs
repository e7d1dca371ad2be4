use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub w: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub h: u32,
}

impl Rect {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn fits_in(&self, other: &Rect) -> bool {
        self.w <= other.w && self.h <= other.h
    }

    pub fn is_degenerate(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// Accepts both `12` and `12.0` for integer fields in JSON bodies.
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(u64),
        Float(f64),
    }

    match Number::deserialize(deserializer)? {
        Number::Int(n) => u32::try_from(n)
            .map_err(|_| serde::de::Error::custom(format!("{n} is out of range"))),
        Number::Float(f) if f.fract() == 0.0 && f >= 0.0 && f <= u32::MAX as f64 => Ok(f as u32),
        Number::Float(f) => Err(serde::de::Error::custom(format!(
            "expected a non-negative integer, got {f}"
        ))),
    }
}

/// A box in the engine's working copy. `id` is the box's index in the caller's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub id: usize,
    pub rect: Rect,
}

impl Item {
    pub fn from_boxes(boxes: &[Rect]) -> Vec<Item> {
        boxes
            .iter()
            .enumerate()
            .map(|(id, &rect)| Item { id, rect })
            .collect()
    }
}

/// Stable sort, tallest first.
pub fn sort_by_height(items: &mut [Item]) {
    items.sort_by(|a, b| b.rect.h.cmp(&a.rect.h));
}

/// Stable sort, widest first.
pub fn sort_by_width(items: &mut [Item]) {
    items.sort_by(|a, b| b.rect.w.cmp(&a.rect.w));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub id: usize,
    pub rect: Rect,
    pub x: u32,
    pub y: u32,
}

impl Placement {
    pub fn right(&self) -> u32 {
        self.x + self.rect.w
    }

    pub fn top(&self) -> u32 {
        self.y + self.rect.h
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bin {
    pub placements: Vec<Placement>,
}

impl Bin {
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn used_area(&self) -> u64 {
        self.placements.iter().map(|p| p.rect.area()).sum()
    }
}

/// Bins produced by a grid-search heuristic, plus boxes no bin could take.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub bins: Vec<Bin>,
    pub unplaced: Vec<Item>,
}

/// A box that was left out of the packing because it can never fit the bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DroppedBox {
    pub id: usize,
    pub rect: Rect,
}

#[derive(Debug, Clone, Serialize)]
pub struct Packing {
    pub bin: Rect,
    pub bins: Vec<Bin>,
    pub dropped: Vec<DroppedBox>,
}

impl Packing {
    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    pub fn placed_count(&self) -> usize {
        self.bins.iter().map(Bin::len).sum()
    }

    /// Free area left in `bin` when it has this packing's bin size.
    pub fn waste_area(&self, bin: &Bin) -> u64 {
        self.bin.area().saturating_sub(bin.used_area())
    }

    pub fn total_waste_percent(&self) -> f64 {
        let total_bin_area = self.bin.area() * self.bins.len() as u64;
        let total_used: u64 = self.bins.iter().map(Bin::used_area).sum();
        if total_bin_area == 0 {
            return 0.0;
        }
        (total_bin_area - total_used) as f64 / total_bin_area as f64 * 100.0
    }
}

/// Owned working set for the strip pipeline. Strips and bins refer to boxes by handle
/// (index into `items`); each handle's position is committed exactly once.
#[derive(Debug)]
pub struct Arena {
    items: Vec<Item>,
    positions: Vec<Option<(u32, u32)>>,
}

pub type Handle = usize;

impl Arena {
    pub fn new(items: Vec<Item>) -> Self {
        let positions = vec![None; items.len()];
        Self { items, positions }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn handles(&self) -> std::ops::Range<Handle> {
        0..self.items.len()
    }

    pub fn rect(&self, handle: Handle) -> Rect {
        self.items[handle].rect
    }

    pub fn commit(&mut self, handle: Handle, x: u32, y: u32) {
        debug_assert!(
            self.positions[handle].is_none(),
            "box #{} positioned twice",
            self.items[handle].id
        );
        self.positions[handle] = Some((x, y));
    }

    pub fn placement(&self, handle: Handle) -> Option<Placement> {
        let item = self.items[handle];
        self.positions[handle].map(|(x, y)| Placement {
            id: item.id,
            rect: item.rect,
            x,
            y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorts_are_stable() {
        let mut items = Item::from_boxes(&[
            Rect::new(3, 2),
            Rect::new(1, 5),
            Rect::new(4, 2),
            Rect::new(3, 5),
        ]);
        sort_by_height(&mut items);
        let ids: Vec<usize> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3, 0, 2]);

        sort_by_width(&mut items);
        let ids: Vec<usize> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 3, 0, 1]);
    }

    #[test]
    fn test_arena_commit() {
        let mut arena = Arena::new(Item::from_boxes(&[Rect::new(2, 3)]));
        assert!(arena.placement(0).is_none());
        arena.commit(0, 4, 5);
        let p = arena.placement(0).unwrap();
        assert_eq!((p.id, p.x, p.y, p.rect), (0, 4, 5, Rect::new(2, 3)));
    }

    #[test]
    fn test_waste_percent() {
        let packing = Packing {
            bin: Rect::new(10, 10),
            bins: vec![Bin {
                placements: vec![Placement {
                    id: 0,
                    rect: Rect::new(5, 10),
                    x: 0,
                    y: 0,
                }],
            }],
            dropped: vec![],
        };
        assert_eq!(packing.waste_area(&packing.bins[0]), 50);
        assert_eq!(packing.waste_area(&Bin::default()), 100);
        assert!((packing.total_waste_percent() - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_rect_deserializes_integral_floats() {
        let r: Rect = serde_json::from_str(r#"{"w": 12.0, "h": 7}"#).unwrap();
        assert_eq!(r, Rect::new(12, 7));
        assert!(serde_json::from_str::<Rect>(r#"{"w": 1.5, "h": 7}"#).is_err());
        assert!(serde_json::from_str::<Rect>(r#"{"w": -3, "h": 7}"#).is_err());
    }
}
