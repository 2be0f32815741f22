//! `complink-linkage`: company record linkage engine.
//!
//! Pure engine crate: receives CSV text, returns linked company pairs with
//! their overlapping addresses, plus match metrics. No CLI or file IO.

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod group;
pub mod link;
pub mod matcher;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod similarity;

pub use config::LinkageConfig;
pub use engine::{extract, run};
pub use error::{LinkageError, Stage};
pub use model::{ExtractReport, ExtractStats, LinkageInput, LinkageResult, LinkedPair};
