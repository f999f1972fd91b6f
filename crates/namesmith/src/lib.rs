//! Stochastic name generation engine.
//!
//! The crate is organized leaf-to-root:
//!
//! - Feature encoding: total `(name, gender)` -> [`FeatureVector`] mapping
//!   shared by inference and historical lookups.
//! - [`Scorer`]: scoring that combines an injected [`PredictiveModel`]
//!   with a read-only [`HistoricalTable`].
//! - [`generate_name`]: seeded, deterministic candidate generation.
//! - [`Criteria`]: style and score-window acceptance plus final ranking.
//! - [`SessionStore`]: concurrent, cancellable generation jobs with
//!   progress polling, abort, and TTL eviction.
//! - [`RankTable`] / [`LinearModel`]: artifact-backed implementations of
//!   the two scoring collaborators.

mod encode;
mod error;
mod filter;
mod generate;
mod model;
mod score;
mod session;
mod table;

pub use crate::encode::*;
pub use crate::error::*;
pub use crate::filter::*;
pub use crate::generate::*;
pub use crate::model::*;
pub use crate::score::*;
pub use crate::session::*;
pub use crate::table::*;
