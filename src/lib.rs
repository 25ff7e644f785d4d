//! course-backup - Deterministic download manifests for course backups
//!
//! Turns a course's curriculum, as returned by the course API, into a flat,
//! ordered manifest of directories to create and files to download.
//!
//! # Architecture
//!
//! Planning is a pure computation:
//! - The curriculum payload is decoded into typed chapter/lecture nodes
//! - Each lecture is planned independently (video, captions, audio, files, links)
//! - Lecture plans are folded into one manifest per course
//!
//! Fetching the curriculum, creating directories and downloading files are
//! left to the caller.
//!
//! # Modules
//!
//! - `core`: Planning logic (decoder, selector, naming, planner, aggregator)
//! - `domain`: Data structures (Course, Lecture, Asset, Manifest)
//! - `config`: Layered configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Print the manifest for a saved curriculum
//! course-backup plan --curriculum curriculum.json --course-title "Rust 101"
//!
//! # Human-readable listing, 720p preferred
//! course-backup plan -c curriculum.json -t "Rust 101" --resolution 720 --format table
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use crate::core::{DecodeError, ManifestAggregator, PlanOptions};
pub use crate::domain::{CurriculumNode, DirectoryRequirement, DownloadTask, Manifest, TaskSource};
