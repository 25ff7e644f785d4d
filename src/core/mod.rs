//! Core planning logic.
//!
//! This module contains:
//! - Decoder: Raw curriculum records to typed nodes
//! - Selector: Video/audio selection policy
//! - Naming: Directory and file naming
//! - Planner: Per-lecture download tasks
//! - Aggregator: Course-level manifest

pub mod aggregator;
pub mod decoder;
pub mod naming;
pub mod options;
pub mod planner;
pub mod selector;

// Re-export commonly used types
pub use aggregator::ManifestAggregator;
pub use decoder::{decode, decode_json, decode_pages, DecodeError};
pub use naming::{sanitize_filename, NameRegistry};
pub use options::{AudioSelection, PlanOptions, TitleCollisionPolicy};
pub use planner::{links_file_contents, plan_lecture, LecturePlan};
pub use selector::{pick_audio, pick_video};
