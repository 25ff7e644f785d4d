//! Course, chapter and lecture types.
//!
//! `CurriculumRecord` is the raw, loosely-typed API record; the decoder
//! turns a sequence of them into `CurriculumNode`s.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::asset::{null_as_default, Asset};

/// The course being backed up
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Course {
    #[serde(default)]
    pub id: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Relative course URL on the provider site
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    /// URL slug, used as a fallback directory name
    #[serde(default, deserialize_with = "null_as_default")]
    pub published_title: String,
}

impl Course {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Default::default()
        }
    }
}

/// A chapter (section) of a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: u64,
    pub title: String,

    /// Position of the chapter within the course
    pub object_index: u32,
}

impl Chapter {
    pub fn new(id: u64, title: impl Into<String>, object_index: u32) -> Self {
        Self {
            id,
            title: title.into(),
            object_index,
        }
    }
}

/// A lecture with its assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
    pub id: u64,
    pub title: String,

    /// Title stripped of numbering/punctuation by the provider
    pub title_cleaned: String,

    /// Position of the lecture within its chapter
    pub object_index: u32,

    /// Primary asset (video, file, article...)
    pub asset: Option<Asset>,

    pub supplementary_assets: Vec<Asset>,

    /// Most recent chapter preceding this lecture; only used for naming.
    /// Shared with the chapter node, never mutated, and never consulted to
    /// reach the lecture back.
    #[serde(skip)]
    pub chapter: Option<Arc<Chapter>>,
}

impl Lecture {
    pub fn new(id: u64, title: impl Into<String>, object_index: u32) -> Self {
        let title = title.into();
        Self {
            id,
            title_cleaned: title.clone(),
            title,
            object_index,
            asset: None,
            supplementary_assets: Vec::new(),
            chapter: None,
        }
    }

    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.asset = Some(asset);
        self
    }

    pub fn with_supplementary(mut self, asset: Asset) -> Self {
        self.supplementary_assets.push(asset);
        self
    }

    pub fn with_chapter(mut self, chapter: Arc<Chapter>) -> Self {
        self.chapter = Some(chapter);
        self
    }

    /// Title used for naming: the cleaned title, or the raw one when empty
    pub fn display_title(&self) -> &str {
        if self.title_cleaned.trim().is_empty() {
            &self.title
        } else {
            &self.title_cleaned
        }
    }
}

/// A decoded curriculum entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurriculumNode {
    Chapter(Arc<Chapter>),
    Lecture(Lecture),
}

impl CurriculumNode {
    pub fn as_lecture(&self) -> Option<&Lecture> {
        match self {
            CurriculumNode::Lecture(l) => Some(l),
            CurriculumNode::Chapter(_) => None,
        }
    }

    pub fn as_chapter(&self) -> Option<&Chapter> {
        match self {
            CurriculumNode::Chapter(c) => Some(c),
            CurriculumNode::Lecture(_) => None,
        }
    }
}

/// Raw curriculum record as returned by the API.
///
/// Carries the union of chapter and lecture fields; `class` says which apply.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CurriculumRecord {
    /// Discriminator: "chapter", "lecture", "quiz", "practice"
    #[serde(rename = "_class", default, deserialize_with = "null_as_default")]
    pub class: String,

    #[serde(default)]
    pub id: u64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title_cleaned: String,

    #[serde(default)]
    pub object_index: u32,

    #[serde(default)]
    pub asset: Option<Asset>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub supplementary_assets: Vec<Asset>,
}

impl CurriculumRecord {
    pub fn chapter(id: u64, title: impl Into<String>, object_index: u32) -> Self {
        Self {
            class: "chapter".to_string(),
            id,
            title: title.into(),
            object_index,
            ..Default::default()
        }
    }

    pub fn lecture(id: u64, title: impl Into<String>, object_index: u32) -> Self {
        let title = title.into();
        Self {
            class: "lecture".to_string(),
            id,
            title_cleaned: title.clone(),
            title,
            object_index,
            ..Default::default()
        }
    }

    /// A record with an arbitrary discriminator (quiz, practice, ...)
    pub fn other(class: impl Into<String>, id: u64) -> Self {
        Self {
            class: class.into(),
            id,
            ..Default::default()
        }
    }

    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.asset = Some(asset);
        self
    }

    pub fn with_supplementary(mut self, asset: Asset) -> Self {
        self.supplementary_assets.push(asset);
        self
    }
}

/// One page of the paginated curriculum endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurriculumPage {
    #[serde(default)]
    pub count: usize,

    #[serde(default)]
    pub next: Option<String>,

    #[serde(default)]
    pub previous: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub results: Vec<CurriculumRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_parses_with_nulls() {
        let json = r#"{
            "_class": "lecture",
            "id": 12,
            "title": "Intro",
            "title_cleaned": null,
            "object_index": 3,
            "asset": null,
            "supplementary_assets": null
        }"#;

        let record: CurriculumRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.class, "lecture");
        assert_eq!(record.object_index, 3);
        assert!(record.title_cleaned.is_empty());
        assert!(record.asset.is_none());
        assert!(record.supplementary_assets.is_empty());
    }

    #[test]
    fn test_display_title_falls_back_to_raw_title() {
        let mut lecture = Lecture::new(1, "1. Welcome!", 1);
        lecture.title_cleaned = String::new();
        assert_eq!(lecture.display_title(), "1. Welcome!");

        lecture.title_cleaned = "Welcome".to_string();
        assert_eq!(lecture.display_title(), "Welcome");
    }

    #[test]
    fn test_page_envelope_parsing() {
        let json = r#"{"count": 2, "next": null, "previous": null, "results": [
            {"_class": "chapter", "id": 1, "title": "Basics", "object_index": 1},
            {"_class": "quiz", "id": 2}
        ]}"#;

        let page: CurriculumPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.count, 2);
        assert!(page.next.is_none());
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[1].class, "quiz");
    }
}
