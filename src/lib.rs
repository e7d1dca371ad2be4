//! Offline two-dimensional bin packing of axis-aligned boxes (no rotation).
//!
//! Strategies are selected from a fixed registry ([`Strategy`]) by their short ids:
//! `HFF`, `HNF`, `HBF` (strip packing then bin assignment), `FFF`, `FNF` (strips built
//! directly inside bins), `FBL`, `NBL` (bottom-left grid search) and `AD` (alternate
//! directions).
//!
//! ```
//! use box_packer::{PackOptions, Rect, Strategy};
//!
//! let boxes = [Rect::new(6, 4), Rect::new(4, 4), Rect::new(5, 3), Rect::new(5, 7)];
//! let packing = Strategy::Hff
//!     .pack(Rect::new(10, 10), &boxes, &PackOptions::default())
//!     .unwrap();
//! assert_eq!(packing.bin_count(), 2);
//! ```

pub mod alternate;
pub mod bottom_left;
pub mod error;
pub mod grid;
pub mod options;
pub mod problem;
pub mod render;
pub mod strategy;
pub mod strip;
pub mod types;

pub use error::{ConfigError, Error, PackError, Result};
pub use options::{OversizePolicy, PackOptions};
pub use problem::Problem;
pub use strategy::Strategy;
pub use types::{Bin, DroppedBox, Packing, Placement, Rect};
