//! Curriculum decoding.
//!
//! Turns the API's flat, discriminated record list into typed
//! `CurriculumNode`s. Chapters do not nest: each lecture is attached to the
//! most recent chapter seen before it.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::{Chapter, CurriculumNode, CurriculumPage, CurriculumRecord, Lecture};

/// Discriminators that are recognised but produce no node
const SKIPPED_CLASSES: &[&str] = &["quiz", "practice"];

/// Errors raised while decoding a curriculum
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed curriculum payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(
        "Unknown type for curriculum item at position {position}: want \"chapter\" or \"lecture\", got {kind:?}"
    )]
    UnrecognizedNodeKind { position: usize, kind: String },
}

/// Decode an ordered record sequence into curriculum nodes.
///
/// Fails on the first record with an unrecognised discriminator; no partial
/// result is returned.
pub fn decode(records: &[CurriculumRecord]) -> Result<Vec<CurriculumNode>, DecodeError> {
    let mut nodes = Vec::with_capacity(records.len());
    let mut current_chapter: Option<Arc<Chapter>> = None;

    for (position, record) in records.iter().enumerate() {
        match record.class.as_str() {
            "chapter" => {
                let chapter = Arc::new(Chapter::new(
                    record.id,
                    record.title.clone(),
                    record.object_index,
                ));
                current_chapter = Some(Arc::clone(&chapter));
                nodes.push(CurriculumNode::Chapter(chapter));
            }
            "lecture" => {
                nodes.push(CurriculumNode::Lecture(Lecture {
                    id: record.id,
                    title: record.title.clone(),
                    title_cleaned: record.title_cleaned.clone(),
                    object_index: record.object_index,
                    asset: record.asset.clone(),
                    supplementary_assets: record.supplementary_assets.clone(),
                    chapter: current_chapter.clone(),
                }));
            }
            class if SKIPPED_CLASSES.contains(&class) => {}
            class => {
                return Err(DecodeError::UnrecognizedNodeKind {
                    position,
                    kind: class.to_string(),
                });
            }
        }
    }

    Ok(nodes)
}

/// Decode several pages as one curriculum.
///
/// The current chapter carries across page boundaries and error positions
/// index into the concatenated record sequence.
pub fn decode_pages(pages: &[CurriculumPage]) -> Result<Vec<CurriculumNode>, DecodeError> {
    let records: Vec<CurriculumRecord> = pages
        .iter()
        .flat_map(|page| page.results.iter().cloned())
        .collect();
    decode(&records)
}

/// Parse and decode a JSON curriculum payload.
///
/// Accepts a bare record array or a page envelope. Any other object (an API
/// error body, say) lacks `results` and is rejected as malformed.
pub fn decode_json(json: &str) -> Result<Vec<CurriculumNode>, DecodeError> {
    let records = if json.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<CurriculumRecord>>(json)?
    } else {
        serde_json::from_str::<CurriculumPage>(json)?.results
    };
    decode(&records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_classes_produce_no_node() {
        let records = vec![
            CurriculumRecord::chapter(1, "One", 1),
            CurriculumRecord::other("quiz", 2),
            CurriculumRecord::lecture(3, "L", 1),
            CurriculumRecord::other("practice", 4),
        ];

        let nodes = decode(&records).unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].as_chapter().is_some());
        assert!(nodes[1].as_lecture().is_some());
    }

    #[test]
    fn test_unknown_class_reports_position() {
        let records = vec![
            CurriculumRecord::chapter(1, "One", 1),
            CurriculumRecord::other("unknown_x", 2),
        ];

        match decode(&records) {
            Err(DecodeError::UnrecognizedNodeKind { position, kind }) => {
                assert_eq!(position, 1);
                assert_eq!(kind, "unknown_x");
            }
            other => panic!("Expected UnrecognizedNodeKind, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_class_is_rejected() {
        let records = vec![CurriculumRecord::other("", 1)];
        assert!(matches!(
            decode(&records),
            Err(DecodeError::UnrecognizedNodeKind { position: 0, .. })
        ));
    }

    #[test]
    fn test_quiz_does_not_reset_current_chapter() {
        let records = vec![
            CurriculumRecord::chapter(1, "One", 1),
            CurriculumRecord::other("quiz", 2),
            CurriculumRecord::lecture(3, "L", 1),
        ];

        let nodes = decode(&records).unwrap();
        let lecture = nodes[1].as_lecture().unwrap();
        assert_eq!(lecture.chapter.as_ref().unwrap().id, 1);
    }

    #[test]
    fn test_error_message() {
        let err = decode(&[CurriculumRecord::other("assignment", 9)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown type for curriculum item at position 0: want \"chapter\" or \"lecture\", got \"assignment\""
        );
    }

    #[test]
    fn test_decode_json_accepts_both_shapes() {
        let bare = r#"[{"_class": "chapter", "id": 1, "title": "A", "object_index": 1}]"#;
        assert_eq!(decode_json(bare).unwrap().len(), 1);

        let page = r#"{"count": 1, "next": null, "results": [
            {"_class": "lecture", "id": 2, "title": "B", "object_index": 1}
        ]}"#;
        let nodes = decode_json(page).unwrap();
        assert!(nodes[0].as_lecture().unwrap().chapter.is_none());
    }

    #[test]
    fn test_decode_json_page_requires_results() {
        let err = decode_json(r#"{"count": 0, "next": null}"#).unwrap_err();
        assert!(err.to_string().contains("missing field `results`"));

        let nodes = decode_json(r#"{"results": null}"#).unwrap();
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_decode_json_malformed() {
        assert!(matches!(
            decode_json("{not json"),
            Err(DecodeError::Malformed(_))
        ));
    }
}
