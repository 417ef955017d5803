//! Table stages of the benchmark pipeline.
//!
//! A raw table moves through [`normalize`], a task's [`FeatureDeriver`],
//! the row filters in [`filter`] and, for eQTLs, [`assign_labels`]. Each
//! stage takes a `DataFrame` and returns a new one.

pub mod derive;
pub mod error;
pub mod filter;
pub mod frame;
pub mod label;
pub mod normalize;
pub mod select;
mod table;

pub use derive::{
    DeriveStats, Derived, EnhancerDeriver, EqtlDeriver, FeatureDeriver, ReferenceMatchReport,
    compute_distance, join_annotation, parse_variants, verify_reference_alleles,
};
pub use error::{Result, TransformError};
pub use filter::{filter_by_distance, filter_protein_coding, filter_snp_only};
pub use frame::{DatasetFrame, DatasetFrameMeta, StageRecord};
pub use label::assign_labels;
pub use normalize::normalize;
pub use select::select_present;
