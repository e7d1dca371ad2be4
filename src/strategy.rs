use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::alternate;
use crate::bottom_left;
use crate::error::{ConfigError, PackError};
use crate::options::{OversizePolicy, PackOptions};
use crate::strip::{self, Fit};
use crate::types::{DroppedBox, Item, Packing, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Strategy {
    Hff,
    Hnf,
    Hbf,
    Fff,
    Fnf,
    Fbl,
    Nbl,
    Ad,
}

impl Strategy {
    pub const ALL: [Strategy; 8] = [
        Strategy::Hff,
        Strategy::Hnf,
        Strategy::Hbf,
        Strategy::Fff,
        Strategy::Fnf,
        Strategy::Fbl,
        Strategy::Nbl,
        Strategy::Ad,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Strategy::Hff => "HFF",
            Strategy::Hnf => "HNF",
            Strategy::Hbf => "HBF",
            Strategy::Fff => "FFF",
            Strategy::Fnf => "FNF",
            Strategy::Fbl => "FBL",
            Strategy::Nbl => "NBL",
            Strategy::Ad => "AD",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Hff => "Hybrid First-Fit",
            Strategy::Hnf => "Hybrid Next-Fit",
            Strategy::Hbf => "Hybrid Best-Fit",
            Strategy::Fff => "Finite First-Fit",
            Strategy::Fnf => "Finite Next-Fit",
            Strategy::Fbl => "Finite Bottom-Left",
            Strategy::Nbl => "Next Bottom-Left",
            Strategy::Ad => "Alternate Directions",
        }
    }

    pub fn id_list() -> String {
        Self::ALL.map(Strategy::id).join(", ")
    }

    /// Packs `boxes` into bins of size `bin`. The caller's slice is only read.
    pub fn pack(
        self,
        bin: Rect,
        boxes: &[Rect],
        options: &PackOptions,
    ) -> Result<Packing, PackError> {
        let interrupt = options.interrupt();
        let (items, dropped) = screen(bin, boxes, options.oversize)?;

        let layout = match self {
            Strategy::Hff => strip::hybrid(Fit::First, bin, items, &interrupt)?,
            Strategy::Hnf => strip::hybrid(Fit::Next, bin, items, &interrupt)?,
            Strategy::Hbf => strip::hybrid(Fit::Best, bin, items, &interrupt)?,
            Strategy::Fff => strip::finite_first_fit(bin, items, &interrupt)?,
            Strategy::Fnf => strip::finite_next_fit(bin, items, &interrupt)?,
            Strategy::Fbl => bottom_left::finite(bin, items, &interrupt)?,
            Strategy::Nbl => bottom_left::next(bin, items, &interrupt)?,
            Strategy::Ad => alternate::run(bin, items, &interrupt)?.layout,
        };

        let mut packing = Packing {
            bin,
            bins: layout.bins,
            dropped,
        };
        packing.dropped.extend(layout.unplaced.into_iter().map(|item| DroppedBox {
            id: item.id,
            rect: item.rect,
        }));

        debug!(
            strategy = self.id(),
            bins = packing.bin_count(),
            placed = packing.placed_count(),
            dropped = packing.dropped.len(),
            "packing finished"
        );
        Ok(packing)
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownStrategy(s.to_string()))
    }
}

/// Splits off boxes that exceed the bin in either dimension.
fn screen(
    bin: Rect,
    boxes: &[Rect],
    policy: OversizePolicy,
) -> Result<(Vec<Item>, Vec<DroppedBox>), PackError> {
    let mut items = Vec::with_capacity(boxes.len());
    let mut dropped = Vec::new();

    for item in Item::from_boxes(boxes) {
        if item.rect.fits_in(&bin) {
            items.push(item);
            continue;
        }
        match policy {
            OversizePolicy::Reject => {
                return Err(PackError::Oversized {
                    id: item.id,
                    rect: item.rect,
                    bin,
                });
            }
            OversizePolicy::Drop => {
                warn!(id = item.id, rect = %item.rect, %bin, "dropping box larger than the bin");
                dropped.push(DroppedBox {
                    id: item.id,
                    rect: item.rect,
                });
            }
        }
    }
    Ok((items, dropped))
}
