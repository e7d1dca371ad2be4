//! Input holder that validates configuration before handing work to a strategy.

use rand::Rng;
use rayon::prelude::*;
use tracing::info;

use crate::error::{ConfigError, PackError, Result};
use crate::options::PackOptions;
use crate::strategy::Strategy;
use crate::types::{Packing, Rect};

#[derive(Debug, Clone, Default)]
pub struct Problem {
    pub bin_size: Option<Rect>,
    pub boxes: Vec<Rect>,
}

impl Problem {
    pub fn new(bin_size: Rect, boxes: Vec<Rect>) -> Self {
        Self {
            bin_size: Some(bin_size),
            boxes,
        }
    }

    /// Replaces the box list with `count` boxes whose sides are drawn uniformly from
    /// `min_dim..=max_dim`.
    pub fn generate_boxes<R: Rng>(
        &mut self,
        rng: &mut R,
        min_dim: u32,
        max_dim: u32,
        count: usize,
    ) -> std::result::Result<(), ConfigError> {
        if min_dim == 0 || min_dim > max_dim {
            return Err(ConfigError::InvalidDimRange {
                min: min_dim,
                max: max_dim,
            });
        }
        self.boxes = (0..count)
            .map(|_| {
                Rect::new(
                    rng.random_range(min_dim..=max_dim),
                    rng.random_range(min_dim..=max_dim),
                )
            })
            .collect();
        Ok(())
    }

    /// Checks the bin size and box list; returns the bin size on success.
    pub fn validate(&self) -> std::result::Result<Rect, ConfigError> {
        let bin = self.bin_size.ok_or(ConfigError::MissingBinSize)?;
        if bin.is_degenerate() {
            return Err(ConfigError::ZeroBinSize(bin));
        }
        if self.boxes.is_empty() {
            return Err(ConfigError::NoBoxes);
        }
        if let Some((id, &rect)) = self
            .boxes
            .iter()
            .enumerate()
            .find(|(_, r)| r.is_degenerate())
        {
            return Err(ConfigError::ZeroBoxSize { id, rect });
        }
        Ok(bin)
    }

    pub fn solve(&self, strategy: Strategy, options: &PackOptions) -> Result<Packing> {
        let bin = self.validate()?;
        info!(%strategy, %bin, boxes = self.boxes.len(), "solving");
        Ok(strategy.pack(bin, &self.boxes, options)?)
    }

    /// Looks the strategy up by its registry id, after the bin size and boxes are
    /// known to be valid.
    pub fn solve_by_id(&self, id: &str, options: &PackOptions) -> Result<Packing> {
        self.validate()?;
        let strategy: Strategy = id.parse()?;
        self.solve(strategy, options)
    }

    /// Runs every registered strategy on the same input, in parallel. Each run packs its
    /// own working copy.
    pub fn compare(
        &self,
        options: &PackOptions,
    ) -> std::result::Result<Vec<(Strategy, std::result::Result<Packing, PackError>)>, ConfigError>
    {
        let bin = self.validate()?;
        Ok(Strategy::ALL
            .par_iter()
            .map(|&strategy| (strategy, strategy.pack(bin, &self.boxes, options)))
            .collect())
    }
}
