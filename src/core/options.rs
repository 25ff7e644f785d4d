//! Planning options and selection policies.

use serde::{Deserialize, Serialize};

/// Options consumed by the planner for every lecture of a course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOptions {
    /// Download caption tracks alongside videos (default: true)
    #[serde(default = "default_load_subtitles")]
    pub load_subtitles: bool,

    /// Preferred video resolution; 0 disables exact matching (default: 1080)
    #[serde(default = "default_target_resolution")]
    pub target_resolution: u32,

    /// How the audio-only entry is picked
    #[serde(default)]
    pub audio_selection: AudioSelection,

    /// How clashing file names inside a lecture directory are handled
    #[serde(default)]
    pub title_collisions: TitleCollisionPolicy,
}

fn default_load_subtitles() -> bool {
    true
}
fn default_target_resolution() -> u32 {
    1080
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            load_subtitles: default_load_subtitles(),
            target_resolution: default_target_resolution(),
            audio_selection: AudioSelection::default(),
            title_collisions: TitleCollisionPolicy::default(),
        }
    }
}

/// Audio entry selection rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioSelection {
    /// First candidate whose MIME type starts with "audio/"
    #[default]
    AudioTyped,

    /// First candidate whose MIME type does NOT start with "audio/".
    /// Matches the behaviour of the original backup tool; usually picks a
    /// video stream and can collide with the video task's path.
    Legacy,
}

/// Policy for two files that would land on the same name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleCollisionPolicy {
    /// Insert " (n)" before the extension of every repeat
    #[default]
    IndexSuffix,

    /// Emit the clashing path as-is; later tasks overwrite earlier ones
    Keep,
}

impl std::fmt::Display for AudioSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioSelection::AudioTyped => write!(f, "audio_typed"),
            AudioSelection::Legacy => write!(f, "legacy"),
        }
    }
}

impl std::fmt::Display for TitleCollisionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TitleCollisionPolicy::IndexSuffix => write!(f, "index_suffix"),
            TitleCollisionPolicy::Keep => write!(f, "keep"),
        }
    }
}

impl std::str::FromStr for AudioSelection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "audio_typed" | "audio" => Ok(AudioSelection::AudioTyped),
            "legacy" => Ok(AudioSelection::Legacy),
            _ => anyhow::bail!("Unknown audio selection: {}", s),
        }
    }
}

impl std::str::FromStr for TitleCollisionPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "index_suffix" | "suffix" => Ok(TitleCollisionPolicy::IndexSuffix),
            "keep" => Ok(TitleCollisionPolicy::Keep),
            _ => anyhow::bail!("Unknown collision policy: {}", s),
        }
    }
}
