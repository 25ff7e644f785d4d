//! Course-level manifest aggregation.
//!
//! Walks the decoded curriculum in order and folds every chapter directory
//! and lecture plan into a single `Manifest`.

use std::path::PathBuf;

use tracing::{debug, info, instrument, warn};

use crate::domain::{Course, CurriculumNode, CurriculumRecord, Manifest};

use super::decoder::{decode, decode_json, DecodeError};
use super::naming::{chapter_dir, course_dir};
use super::options::PlanOptions;
use super::planner::plan_lecture;

/// Builds manifests for courses backed up under a common root
#[derive(Debug, Clone)]
pub struct ManifestAggregator {
    /// Directory that holds one subdirectory per course
    root: PathBuf,

    options: PlanOptions,
}

impl ManifestAggregator {
    pub fn new(root: impl Into<PathBuf>, options: PlanOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    /// Build the manifest for already-decoded curriculum nodes.
    ///
    /// Directories come out as: course dir, then chapter dirs interleaved
    /// with lecture ancillary dirs in traversal order.
    #[instrument(skip(self, course, nodes), fields(course = %course.title, course_id = course.id))]
    pub fn aggregate(&self, course: &Course, nodes: &[CurriculumNode]) -> Manifest {
        let course_dir = course_dir(&self.root, course);

        let mut manifest = Manifest::new();
        manifest.require_dir(course_dir.clone());

        let mut lectures = 0usize;
        for node in nodes {
            match node {
                CurriculumNode::Chapter(chapter) => {
                    manifest.require_dir(chapter_dir(&course_dir, chapter));
                }
                CurriculumNode::Lecture(lecture) => {
                    let plan = plan_lecture(lecture, &course_dir, &self.options);
                    debug!(
                        lecture_id = lecture.id,
                        tasks = plan.tasks.len(),
                        "Planned lecture"
                    );
                    manifest.extend(plan.directories, plan.tasks);
                    lectures += 1;
                }
            }
        }

        let duplicates = manifest.duplicate_paths();
        if !duplicates.is_empty() {
            warn!(
                count = duplicates.len(),
                first = %duplicates[0].display(),
                "Manifest contains colliding local paths"
            );
        }

        info!(
            lectures,
            directories = manifest.directories.len(),
            tasks = manifest.tasks.len(),
            "Manifest built"
        );

        manifest
    }

    /// Decode raw records and build the manifest; decode errors abort the
    /// whole course
    pub fn aggregate_records(
        &self,
        course: &Course,
        records: &[CurriculumRecord],
    ) -> Result<Manifest, DecodeError> {
        let nodes = decode(records)?;
        Ok(self.aggregate(course, &nodes))
    }

    /// Parse a JSON curriculum payload and build the manifest
    pub fn aggregate_json(&self, course: &Course, json: &str) -> Result<Manifest, DecodeError> {
        let nodes = decode_json(json)?;
        Ok(self.aggregate(course, &nodes))
    }
}
