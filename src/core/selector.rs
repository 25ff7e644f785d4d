//! Video and audio selection over a lecture's media candidates.

use crate::domain::MediaSource;

use super::options::AudioSelection;

/// Pick the video matching `target_resolution`, or the highest one available.
///
/// Only entries with a "video/" MIME type and a numeric, positive label are
/// considered. The first exact match wins immediately; otherwise the entry
/// with the highest label is returned (earliest wins on ties). A target of 0
/// never matches exactly.
pub fn pick_video(candidates: &[MediaSource], target_resolution: u32) -> Option<&MediaSource> {
    let mut best: Option<(&MediaSource, i64)> = None;

    for candidate in candidates.iter().filter(|c| c.is_video()) {
        let Ok(resolution) = candidate.label.parse::<i64>() else {
            continue;
        };

        if target_resolution > 0 && resolution == i64::from(target_resolution) {
            return Some(candidate);
        }

        let current = best.map(|(_, r)| r).unwrap_or(0);
        if resolution > current {
            best = Some((candidate, resolution));
        }
    }

    best.map(|(candidate, _)| candidate)
}

/// Pick the audio entry according to `selection`
pub fn pick_audio(candidates: &[MediaSource], selection: AudioSelection) -> Option<&MediaSource> {
    match selection {
        AudioSelection::AudioTyped => candidates.iter().find(|c| c.is_audio()),
        AudioSelection::Legacy => candidates.iter().find(|c| !c.is_audio()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(label: &str) -> MediaSource {
        MediaSource::new("video/mp4", label, format!("https://cdn/{}.mp4", label))
    }

    #[test]
    fn test_exact_match_short_circuits() {
        let candidates = vec![video("480"), video("1080"), video("2160")];
        let picked = pick_video(&candidates, 1080).unwrap();
        assert_eq!(picked.label, "1080");
    }

    #[test]
    fn test_falls_back_to_highest() {
        let candidates = vec![video("480"), video("720"), video("360")];
        assert_eq!(pick_video(&candidates, 1080).unwrap().label, "720");
    }

    #[test]
    fn test_non_numeric_and_non_video_skipped() {
        let candidates = vec![
            video("Auto"),
            MediaSource::new("application/x-mpegURL", "1080", "hls"),
            video("360"),
        ];
        assert_eq!(pick_video(&candidates, 1080).unwrap().label, "360");
    }

    #[test]
    fn test_nothing_parses() {
        let candidates = vec![video("Auto"), video("hd")];
        assert!(pick_video(&candidates, 1080).is_none());
        assert!(pick_video(&[], 720).is_none());
    }

    #[test]
    fn test_zero_target_takes_max() {
        let candidates = vec![video("720"), video("1080")];
        assert_eq!(pick_video(&candidates, 0).unwrap().label, "1080");
    }

    #[test]
    fn test_tie_keeps_first() {
        let mut second = video("720");
        second.url = "second".to_string();
        let candidates = vec![video("720"), second];
        assert_eq!(pick_video(&candidates, 1080).unwrap().url, "https://cdn/720.mp4");
    }

    #[test]
    fn test_audio_typed_selection() {
        let candidates = vec![
            video("720"),
            MediaSource::new("audio/mpeg", "128", "audio-url"),
        ];
        let picked = pick_audio(&candidates, AudioSelection::AudioTyped).unwrap();
        assert_eq!(picked.url, "audio-url");
    }

    #[test]
    fn test_legacy_selection_returns_first_non_audio() {
        let candidates = vec![
            MediaSource::new("audio/mpeg", "128", "audio-url"),
            video("720"),
        ];
        let picked = pick_audio(&candidates, AudioSelection::Legacy).unwrap();
        assert_eq!(picked.url, "https://cdn/720.mp4");

        let only_audio = vec![MediaSource::new("audio/mpeg", "128", "audio-url")];
        assert!(pick_audio(&only_audio, AudioSelection::Legacy).is_none());
    }
}
