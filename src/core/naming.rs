//! Directory and file naming.
//!
//! All names are pure functions of course, chapter and lecture identity.
//! Lecture stems embed the lecture's index so distinct lectures in the same
//! chapter never share a stem.
//!
//! # Layout
//!
//! ```text
//! <root>/
//! └── <course title>/
//!     └── 01 - <chapter title>/
//!         ├── 001 - <lecture title>.mp4
//!         ├── 001 - <lecture title>.mp3
//!         └── 001 - <lecture title>/      # ancillary dir
//!             ├── 001 - <lecture title>.en_US.vtt
//!             ├── <asset title>
//!             └── links.txt
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::{Caption, Chapter, Course, Lecture};

use super::options::TitleCollisionPolicy;

/// Characters that are invalid in Windows filenames
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Windows reserved filenames (case-insensitive)
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Fallback for names that sanitize to nothing
const UNNAMED: &str = "unnamed";

/// Name of the generated external-links file
pub const LINKS_FILE: &str = "links.txt";

pub const DEFAULT_VIDEO_EXT: &str = ".mp4";
pub const DEFAULT_AUDIO_EXT: &str = ".mp3";
pub const DEFAULT_CAPTION_EXT: &str = ".vtt";

/// MIME type to extension, first match wins
const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("video/mp4", ".mp4"),
    ("video/webm", ".webm"),
    ("video/ogg", ".ogv"),
    ("video/quicktime", ".mov"),
    ("video/x-matroska", ".mkv"),
    ("video/x-msvideo", ".avi"),
    ("video/x-flv", ".flv"),
    ("video/mp2t", ".ts"),
    ("audio/mpeg", ".mp3"),
    ("audio/mp3", ".mp3"),
    ("audio/mp4", ".m4a"),
    ("audio/aac", ".aac"),
    ("audio/ogg", ".ogg"),
    ("audio/webm", ".weba"),
    ("audio/wav", ".wav"),
    ("audio/x-wav", ".wav"),
    ("audio/flac", ".flac"),
    ("text/vtt", ".vtt"),
    ("application/x-subrip", ".srt"),
];

/// Sanitize a string for use as a single path component on all platforms.
///
/// Invalid and control characters become `_` (runs collapse to one),
/// leading/trailing spaces and dots are trimmed, reserved device names get a
/// `_` prefix and empty results become "unnamed".
pub fn sanitize_filename(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut last_was_replacement = false;

    for c in input.chars() {
        if c.is_control() || INVALID_CHARS.contains(&c) {
            if !last_was_replacement {
                result.push('_');
                last_was_replacement = true;
            }
        } else {
            result.push(c);
            last_was_replacement = false;
        }
    }

    let trimmed = result.trim_matches(|c| c == ' ' || c == '.');
    if trimmed.is_empty() {
        return UNNAMED.to_string();
    }

    let upper = trimmed.to_uppercase();
    let stem = upper.split('.').next().unwrap_or_default();
    if RESERVED_NAMES.contains(&stem) {
        return format!("_{}", trimmed);
    }

    trimmed.to_string()
}

/// Directory name for a course: its title, else its slug, else its id
pub fn course_dir(root: &Path, course: &Course) -> PathBuf {
    let name = [course.title.as_str(), course.published_title.as_str()]
        .into_iter()
        .map(sanitize_filename)
        .find(|n| n != UNNAMED)
        .unwrap_or_else(|| format!("course-{}", course.id));

    root.join(name)
}

/// Directory for a chapter, nested under the course directory
pub fn chapter_dir(course_dir: &Path, chapter: &Chapter) -> PathBuf {
    course_dir.join(format!(
        "{:02} - {}",
        chapter.object_index,
        sanitize_filename(&chapter.title)
    ))
}

/// Directory holding a lecture's files: its chapter dir, or the course dir
/// for lectures that precede any chapter
pub fn lecture_parent_dir(course_dir: &Path, lecture: &Lecture) -> PathBuf {
    match &lecture.chapter {
        Some(chapter) => chapter_dir(course_dir, chapter),
        None => course_dir.to_path_buf(),
    }
}

/// File stem shared by every file belonging to a lecture
pub fn lecture_stem(lecture: &Lecture) -> String {
    format!(
        "{:03} - {}",
        lecture.object_index,
        sanitize_filename(lecture.display_title())
    )
}

/// Extension (with leading dot) for a MIME type, ignoring parameters and case
pub fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    let essence = mime_type.split(';').next()?.trim().to_ascii_lowercase();

    MIME_EXTENSIONS
        .iter()
        .find(|(mime, _)| *mime == essence)
        .map(|(_, ext)| *ext)
}

/// Caption file name: `<stem>.<locale><ext>`, ext taken from the source file name
pub fn caption_file_name(stem: &str, caption: &Caption) -> String {
    let ext = Path::new(&caption.file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{}", e))
        .unwrap_or_else(|| DEFAULT_CAPTION_EXT.to_string());

    let locale = sanitize_filename(&caption.locale.locale);
    format!("{}.{}{}", stem, locale, ext)
}

/// Hands out file names within one directory according to a collision policy.
///
/// Names are compared case-insensitively, so `Notes.pdf` and `notes.pdf`
/// count as the same file.
#[derive(Debug)]
pub struct NameRegistry {
    policy: TitleCollisionPolicy,
    /// Keyed by lowercased name
    seen: HashMap<String, usize>,
}

impl NameRegistry {
    pub fn new(policy: TitleCollisionPolicy) -> Self {
        Self {
            policy,
            seen: HashMap::new(),
        }
    }

    /// Claim `name`, returning the name to use
    pub fn claim(&mut self, name: &str) -> String {
        let count = self.seen.entry(name.to_lowercase()).or_insert(0);
        *count += 1;

        if *count == 1 || self.policy == TitleCollisionPolicy::Keep {
            return name.to_string();
        }

        let mut index = *count;
        loop {
            let candidate = with_index_suffix(name, index);
            let key = candidate.to_lowercase();
            if !self.seen.contains_key(&key) {
                self.seen.insert(key, 1);
                return candidate;
            }
            index += 1;
        }
    }
}

/// `notes.pdf` + 2 -> `notes (2).pdf`
fn with_index_suffix(name: &str, index: usize) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{} ({}){}", &name[..dot], index, &name[dot..]),
        _ => format!("{} ({})", name, index),
    }
}
