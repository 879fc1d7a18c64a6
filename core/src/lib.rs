//! RFM customer segmentation: normalize a customer table, score
//! Recency / Frequency / Monetary by cohort quantiles, classify each
//! customer into a lifecycle segment, and hand the result to
//! aggregation, export and outreach templates.

pub mod aggregate;
pub mod binning;
pub mod classifier;
pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod ids;
pub mod ingest;
pub mod ipc;
pub mod metrics;
pub mod name_generator;
pub mod normalizer;
pub mod rng;
pub mod sample;
pub mod scoring;
pub mod templates;
pub mod types;

pub use classifier::{classify, Segment};
pub use config::RfmConfig;
pub use engine::{compute_scored_population, SegmentationSession};
pub use error::{RfmError, RfmResult};
pub use scoring::{Scores, SegRecord};
