//! Per-lecture asset planning.
//!
//! Produces, for one lecture, the download tasks in a fixed step order
//! (video, captions, audio, other files, supplementary files, links file)
//! and the ancillary directory when any task lands in it.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{Asset, DirectoryRequirement, DownloadTask, ExternalLink, Lecture};

use super::naming::{
    caption_file_name, extension_for_mime, lecture_parent_dir, lecture_stem, sanitize_filename,
    NameRegistry, DEFAULT_AUDIO_EXT, DEFAULT_VIDEO_EXT, LINKS_FILE,
};
use super::options::PlanOptions;
use super::selector::{pick_audio, pick_video};

/// Tasks and directories for a single lecture
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LecturePlan {
    pub directories: Vec<DirectoryRequirement>,
    pub tasks: Vec<DownloadTask>,
}

/// Supplementary assets split by how they are materialized
struct Supplements<'a> {
    links: Vec<ExternalLink>,
    downloads: Vec<&'a Asset>,
}

fn partition_supplements(assets: &[Asset]) -> Supplements<'_> {
    let mut links = Vec::new();
    let mut downloads = Vec::new();

    for asset in assets {
        if let Some(link) = asset.as_link() {
            links.push(link);
        } else if asset.download_urls.is_none() {
            debug!(asset_id = asset.id, title = %asset.title, "Supplementary asset has no download URLs, skipping");
        } else {
            downloads.push(asset);
        }
    }

    Supplements { links, downloads }
}

/// Serialize links as repeated `title\nurl\n\n` blocks
pub fn links_file_contents(links: &[ExternalLink]) -> String {
    links
        .iter()
        .map(|l| format!("{}\n{}\n\n", l.title, l.url))
        .collect()
}

/// Plan every download for `lecture`, whose files live under `course_dir`
pub fn plan_lecture(lecture: &Lecture, course_dir: &Path, options: &PlanOptions) -> LecturePlan {
    let parent = lecture_parent_dir(course_dir, lecture);
    let stem = lecture_stem(lecture);
    let ancillary = parent.join(&stem);

    let supplements = partition_supplements(&lecture.supplementary_assets);

    // Names in the lecture's parent dir and in its ancillary dir
    let mut parent_names = NameRegistry::new(options.title_collisions);
    let mut ancillary_names = NameRegistry::new(options.title_collisions);
    if !supplements.links.is_empty() {
        ancillary_names.claim(LINKS_FILE);
    }

    let mut tasks = Vec::new();

    let candidates = lecture
        .asset
        .as_ref()
        .map(Asset::media_candidates)
        .unwrap_or(&[]);

    // Video, then its captions
    match pick_video(candidates, options.target_resolution) {
        Some(video) => {
            let ext = extension_for_mime(&video.mime_type).unwrap_or(DEFAULT_VIDEO_EXT);
            let name = parent_names.claim(&format!("{}{}", stem, ext));
            tasks.push(DownloadTask::remote(parent.join(name), video.url.clone()));

            let captions = lecture
                .asset
                .as_ref()
                .map(|a| a.captions.as_slice())
                .unwrap_or(&[]);
            if options.load_subtitles {
                for caption in captions {
                    let name = ancillary_names.claim(&caption_file_name(&stem, caption));
                    tasks.push(DownloadTask::remote(ancillary.join(name), caption.url.clone()));
                }
            }
        }
        None => {
            debug!(lecture_id = lecture.id, "No video selected");
        }
    }

    if let Some(audio) = pick_audio(candidates, options.audio_selection) {
        let ext = extension_for_mime(&audio.mime_type).unwrap_or(DEFAULT_AUDIO_EXT);
        let name = parent_names.claim(&format!("{}{}", stem, ext));
        tasks.push(DownloadTask::remote(parent.join(name), audio.url.clone()));
    }

    // Files of a "File"/"E-Book" primary asset, named after the asset
    if let Some(asset) = lecture.asset.as_ref().filter(|a| a.kind.is_document()) {
        let title = sanitize_filename(&asset.title);
        for file in asset.document_files() {
            let name = ancillary_names.claim(&title);
            tasks.push(DownloadTask::remote(ancillary.join(name), file.url.clone()));
        }
    }

    for asset in &supplements.downloads {
        let title = sanitize_filename(&asset.title);
        for file in asset.document_files() {
            let name = ancillary_names.claim(&title);
            tasks.push(DownloadTask::remote(ancillary.join(name), file.url.clone()));
        }
    }

    if !supplements.links.is_empty() {
        tasks.push(DownloadTask::inline(
            ancillary.join(LINKS_FILE),
            links_file_contents(&supplements.links),
        ));
    }

    LecturePlan {
        directories: ancillary_requirement(&ancillary, &tasks),
        tasks,
    }
}

/// The ancillary directory is required iff some task targets it
fn ancillary_requirement(ancillary: &Path, tasks: &[DownloadTask]) -> Vec<DirectoryRequirement> {
    let used = tasks
        .iter()
        .any(|t| t.local_path.parent() == Some(ancillary));

    if used {
        vec![DirectoryRequirement::new(PathBuf::from(ancillary))]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::{AudioSelection, TitleCollisionPolicy};
    use crate::domain::{AssetKind, Caption, Chapter, DownloadUrls, FileSource, MediaSource, StreamUrls};
    use std::sync::Arc;

    const COURSE: &str = "/b/Course";
    const CHAPTER: &str = "/b/Course/01 - Basics";

    fn chapter() -> Arc<Chapter> {
        Arc::new(Chapter::new(1, "Basics", 1))
    }

    fn video_asset(labels: &[&str]) -> Asset {
        Asset::new(AssetKind::Video, "video.mp4").with_stream_urls(StreamUrls {
            video: labels
                .iter()
                .map(|l| MediaSource::new("video/mp4", *l, format!("https://cdn/{}", l)))
                .collect(),
        })
    }

    fn file_asset(kind: AssetKind, title: &str, urls: &[&str]) -> Asset {
        let files: Vec<FileSource> = urls.iter().map(|u| FileSource::new("download", *u)).collect();
        let download_urls = match kind {
            AssetKind::EBook => DownloadUrls {
                ebook: files,
                ..Default::default()
            },
            _ => DownloadUrls {
                file: files,
                ..Default::default()
            },
        };
        Asset::new(kind, title).with_download_urls(download_urls)
    }

    fn paths(plan: &LecturePlan) -> Vec<PathBuf> {
        plan.tasks.iter().map(|t| t.local_path.clone()).collect()
    }

    #[test]
    fn test_video_only_lecture_needs_no_ancillary_dir() {
        let lecture = Lecture::new(1, "Hello", 1)
            .with_chapter(chapter())
            .with_asset(video_asset(&["720", "1080"]));

        let plan = plan_lecture(&lecture, Path::new(COURSE), &PlanOptions::default());

        assert_eq!(plan.tasks.len(), 1);
        assert_eq!(plan.tasks[0].local_path, PathBuf::from(CHAPTER).join("001 - Hello.mp4"));
        assert_eq!(plan.tasks[0].remote_url(), Some("https://cdn/1080"));
        assert!(plan.directories.is_empty());
    }

    #[test]
    fn test_captions_follow_video_into_ancillary_dir() {
        let asset = video_asset(&["720"])
            .with_caption(Caption::new("en_US", "hello_en.vtt", "https://cdn/en"))
            .with_caption(Caption::new("es_ES", "hello_es.srt", "https://cdn/es"));
        let lecture = Lecture::new(1, "Hello", 1).with_chapter(chapter()).with_asset(asset);

        let plan = plan_lecture(&lecture, Path::new(COURSE), &PlanOptions::default());
        let ancillary = PathBuf::from(CHAPTER).join("001 - Hello");

        assert_eq!(
            paths(&plan),
            vec![
                PathBuf::from(CHAPTER).join("001 - Hello.mp4"),
                ancillary.join("001 - Hello.en_US.vtt"),
                ancillary.join("001 - Hello.es_ES.srt"),
            ]
        );
        assert_eq!(plan.directories, vec![DirectoryRequirement::new(ancillary)]);
    }

    #[test]
    fn test_captions_skipped_when_disabled_or_no_video() {
        let asset = video_asset(&["720"]).with_caption(Caption::new("en_US", "a.vtt", "c"));
        let lecture = Lecture::new(1, "Hello", 1).with_asset(asset);
        let options = PlanOptions {
            load_subtitles: false,
            ..Default::default()
        };

        let plan = plan_lecture(&lecture, Path::new(COURSE), &options);
        assert_eq!(plan.tasks.len(), 1);
        assert!(plan.directories.is_empty());

        let no_video = video_asset(&["Auto"]).with_caption(Caption::new("en_US", "a.vtt", "c"));
        let lecture = Lecture::new(2, "Other", 2).with_asset(no_video);
        let plan = plan_lecture(&lecture, Path::new(COURSE), &PlanOptions::default());
        assert!(plan.tasks.is_empty());
        assert!(plan.directories.is_empty());
    }

    #[test]
    fn test_unknown_mime_falls_back_to_default_extensions() {
        let asset = Asset::new(AssetKind::Video, "v").with_stream_urls(StreamUrls {
            video: vec![
                MediaSource::new("video/x-custom", "720", "v-url"),
                MediaSource::new("audio/x-custom", "", "a-url"),
            ],
        });
        let lecture = Lecture::new(4, "Mix", 4).with_asset(asset);

        let plan = plan_lecture(&lecture, Path::new(COURSE), &PlanOptions::default());
        assert_eq!(
            paths(&plan),
            vec![
                PathBuf::from(COURSE).join("004 - Mix.mp4"),
                PathBuf::from(COURSE).join("004 - Mix.mp3"),
            ]
        );
    }

    #[test]
    fn test_audio_uses_mime_extension() {
        let asset = Asset::new(AssetKind::Video, "v").with_download_urls(DownloadUrls {
            video: vec![
                MediaSource::new("video/webm", "480", "v"),
                MediaSource::new("audio/mp4", "", "a"),
            ],
            ..Default::default()
        });
        let lecture = Lecture::new(1, "Talk", 2).with_asset(asset);

        let plan = plan_lecture(&lecture, Path::new(COURSE), &PlanOptions::default());
        assert_eq!(plan.tasks[0].local_path, PathBuf::from(COURSE).join("002 - Talk.webm"));
        assert_eq!(plan.tasks[1].local_path, PathBuf::from(COURSE).join("002 - Talk.m4a"));
        assert_eq!(plan.tasks[1].remote_url(), Some("a"));
    }

    #[test]
    fn test_legacy_audio_collides_with_video_under_keep() {
        let lecture = Lecture::new(1, "Hello", 1).with_asset(video_asset(&["720"]));
        let options = PlanOptions {
            audio_selection: AudioSelection::Legacy,
            title_collisions: TitleCollisionPolicy::Keep,
            ..Default::default()
        };

        let plan = plan_lecture(&lecture, Path::new(COURSE), &options);
        assert_eq!(plan.tasks.len(), 2);
        assert_eq!(plan.tasks[0].local_path, plan.tasks[1].local_path);
    }

    #[test]
    fn test_legacy_audio_is_suffixed_by_default_policy() {
        let lecture = Lecture::new(1, "Hello", 1).with_asset(video_asset(&["720"]));
        let options = PlanOptions {
            audio_selection: AudioSelection::Legacy,
            ..Default::default()
        };

        let plan = plan_lecture(&lecture, Path::new(COURSE), &options);
        assert_eq!(
            paths(&plan),
            vec![
                PathBuf::from(COURSE).join("001 - Hello.mp4"),
                PathBuf::from(COURSE).join("001 - Hello (2).mp4"),
            ]
        );
    }

    #[test]
    fn test_document_primary_asset() {
        let asset = file_asset(AssetKind::EBook, "Guide.pdf", &["https://cdn/guide"]);
        let lecture = Lecture::new(1, "Reading", 5).with_chapter(chapter()).with_asset(asset);

        let plan = plan_lecture(&lecture, Path::new(COURSE), &PlanOptions::default());
        let ancillary = PathBuf::from(CHAPTER).join("005 - Reading");

        assert_eq!(paths(&plan), vec![ancillary.join("Guide.pdf")]);
        assert_eq!(plan.directories, vec![DirectoryRequirement::new(ancillary)]);
    }

    #[test]
    fn test_supplementary_files_and_links() {
        let lecture = Lecture::new(1, "Hello", 1)
            .with_chapter(chapter())
            .with_asset(video_asset(&["1080"]))
            .with_supplementary(Asset::link("Docs", "https://docs"))
            .with_supplementary(file_asset(AssetKind::File, "code.zip", &["https://cdn/zip"]))
            .with_supplementary(Asset::new(AssetKind::File, "no-urls"))
            .with_supplementary(Asset::link("Blog", "https://blog"));

        let plan = plan_lecture(&lecture, Path::new(COURSE), &PlanOptions::default());
        let ancillary = PathBuf::from(CHAPTER).join("001 - Hello");

        assert_eq!(
            paths(&plan),
            vec![
                PathBuf::from(CHAPTER).join("001 - Hello.mp4"),
                ancillary.join("code.zip"),
                ancillary.join("links.txt"),
            ]
        );
        assert_eq!(
            plan.tasks[2].inline_content(),
            Some("Docs\nhttps://docs\n\nBlog\nhttps://blog\n\n")
        );
        assert_eq!(plan.directories.len(), 1);
    }

    #[test]
    fn test_supplementary_without_downloads_needs_no_dir() {
        let lecture = Lecture::new(1, "Hello", 1)
            .with_supplementary(Asset::new(AssetKind::File, "nothing"));

        let plan = plan_lecture(&lecture, Path::new(COURSE), &PlanOptions::default());
        assert!(plan.tasks.is_empty());
        assert!(plan.directories.is_empty());
    }

    #[test]
    fn test_asset_named_links_txt_does_not_displace_links_file() {
        let lecture = Lecture::new(1, "Hello", 1)
            .with_supplementary(file_asset(AssetKind::File, "links.txt", &["u"]))
            .with_supplementary(Asset::link("A", "u1"));

        let plan = plan_lecture(&lecture, Path::new(COURSE), &PlanOptions::default());
        let ancillary = PathBuf::from(COURSE).join("001 - Hello");

        assert_eq!(
            paths(&plan),
            vec![ancillary.join("links (2).txt"), ancillary.join("links.txt")]
        );
    }

    #[test]
    fn test_lecture_without_asset() {
        let lecture = Lecture::new(1, "Empty", 1).with_chapter(chapter());
        let plan = plan_lecture(&lecture, Path::new(COURSE), &PlanOptions::default());
        assert_eq!(plan, LecturePlan::default());
    }

    #[test]
    fn test_links_file_contents() {
        let links = vec![
            ExternalLink {
                title: "A".to_string(),
                url: "u1".to_string(),
            },
            ExternalLink {
                title: "B".to_string(),
                url: "u2".to_string(),
            },
        ];
        assert_eq!(links_file_contents(&links), "A\nu1\n\nB\nu2\n\n");
        assert_eq!(links_file_contents(&[]), "");
    }
}
