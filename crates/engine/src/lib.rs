//! autodrop-engine - piece generation, collision, and board mutation.
//!
//! Provides the deterministic piece sources, the collision predicate with hard
//! drop, stamping pieces into boards, and run configuration.

pub mod apply;
pub mod bag;
pub mod collision;
pub mod config;
pub mod generator;

pub use apply::{apply_placement, stamp, stamp_rows};
pub use bag::SevenBag;
pub use collision::{collides, hard_drop_y};
pub use config::{ConfigError, GeneratorKind, SimConfig};
pub use generator::{Lcg, PieceProvider};
