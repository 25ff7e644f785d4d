//! Domain types for course backups.
//!
//! This module contains the core data structures:
//! - Course: Course, chapters, lectures and raw curriculum records
//! - Asset: Asset descriptors, media and caption sources
//! - Manifest: Directories and download tasks produced by planning

pub mod asset;
pub mod course;
pub mod manifest;

// Re-export commonly used types
pub use asset::{
    Asset, AssetKind, Caption, DownloadUrls, ExternalLink, FileSource, Locale, MediaSource,
    StreamUrls,
};
pub use course::{Chapter, Course, CurriculumNode, CurriculumPage, CurriculumRecord, Lecture};
pub use manifest::{DirectoryRequirement, DownloadTask, Manifest, TaskSource};
