//! Command-line interface for course-backup.
//!
//! Provides commands for planning a course backup manifest from a
//! curriculum payload and for inspecting the resolved configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::AsyncReadExt;

use crate::config;
use crate::core::{AudioSelection, ManifestAggregator, PlanOptions, TitleCollisionPolicy};
use crate::domain::{Course, Manifest, TaskSource};

/// course-backup - Plan downloads for backing up an online course
#[derive(Parser, Debug)]
#[command(name = "course-backup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the download manifest for a course
    Plan {
        /// Curriculum JSON file ("-" reads stdin)
        #[arg(short, long)]
        curriculum: PathBuf,

        /// Course title (names the course directory)
        #[arg(short = 't', long)]
        course_title: String,

        /// Course ID
        #[arg(long, default_value = "0")]
        course_id: u64,

        /// Course URL slug, used when the title is unusable as a directory name
        #[arg(long)]
        published_title: Option<String>,

        /// Backup root directory (overrides config)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Preferred video resolution (overrides config)
        #[arg(long)]
        resolution: Option<u32>,

        /// Skip caption downloads
        #[arg(long)]
        no_subtitles: bool,

        /// Audio selection rule
        #[arg(long, value_enum)]
        audio: Option<AudioArg>,

        /// Handling of clashing file names within a lecture
        #[arg(long, value_enum)]
        collisions: Option<CollisionArg>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Audio selection for CLI (maps to AudioSelection)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AudioArg {
    /// First entry with an audio/* type
    AudioTyped,

    /// First entry without an audio/* type (original tool behaviour)
    Legacy,
}

impl From<AudioArg> for AudioSelection {
    fn from(a: AudioArg) -> Self {
        match a {
            AudioArg::AudioTyped => AudioSelection::AudioTyped,
            AudioArg::Legacy => AudioSelection::Legacy,
        }
    }
}

/// Collision policy for CLI (maps to TitleCollisionPolicy)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CollisionArg {
    /// Append " (n)" to repeated names
    IndexSuffix,

    /// Keep clashing names as-is
    Keep,
}

impl From<CollisionArg> for TitleCollisionPolicy {
    fn from(c: CollisionArg) -> Self {
        match c {
            CollisionArg::IndexSuffix => TitleCollisionPolicy::IndexSuffix,
            CollisionArg::Keep => TitleCollisionPolicy::Keep,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Manifest as pretty-printed JSON
    Json,

    /// Human-readable listing
    Table,
}

/// CLI overrides applied on top of the resolved configuration
#[derive(Debug, Default)]
struct PlanOverrides {
    resolution: Option<u32>,
    no_subtitles: bool,
    audio: Option<AudioArg>,
    collisions: Option<CollisionArg>,
}

impl PlanOverrides {
    fn apply(&self, mut options: PlanOptions) -> PlanOptions {
        if let Some(resolution) = self.resolution {
            options.target_resolution = resolution;
        }
        if self.no_subtitles {
            options.load_subtitles = false;
        }
        if let Some(audio) = self.audio {
            options.audio_selection = audio.into();
        }
        if let Some(collisions) = self.collisions {
            options.title_collisions = collisions.into();
        }
        options
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Plan {
                curriculum,
                course_title,
                course_id,
                published_title,
                root,
                resolution,
                no_subtitles,
                audio,
                collisions,
                format,
            } => {
                let course = Course {
                    published_title: published_title.unwrap_or_default(),
                    ..Course::new(course_id, course_title)
                };
                let overrides = PlanOverrides {
                    resolution,
                    no_subtitles,
                    audio,
                    collisions,
                };
                plan_course(&course, &curriculum, root, overrides, format).await
            }
            Commands::Config => show_config(),
        }
    }
}

/// Read the curriculum payload from a file or stdin
async fn read_curriculum(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await
            .context("Failed to read curriculum from stdin")?;
        return Ok(buffer);
    }

    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read curriculum file: {}", path.display()))
}

/// Build and print the manifest for a course
async fn plan_course(
    course: &Course,
    curriculum_path: &Path,
    root: Option<PathBuf>,
    overrides: PlanOverrides,
    format: OutputFormat,
) -> Result<()> {
    let cfg = config::config()?;
    let root = root.unwrap_or_else(|| cfg.root.clone());
    let options = overrides.apply(cfg.options.clone());

    let payload = read_curriculum(curriculum_path).await?;
    if payload.trim().is_empty() {
        anyhow::bail!("Curriculum payload is empty");
    }

    let aggregator = ManifestAggregator::new(root, options);
    let manifest = aggregator
        .aggregate_json(course, &payload)
        .with_context(|| format!("Failed to plan course '{}'", course.title))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
        OutputFormat::Table => print_table(&manifest),
    }

    let duplicates = manifest.duplicate_paths();
    if !duplicates.is_empty() {
        eprintln!("\n[{} colliding path(s):]", duplicates.len());
        for path in duplicates {
            eprintln!("  {}", path.display());
        }
    }

    eprintln!(
        "\n[{} directories, {} downloads, {} generated files, digest {}]",
        manifest.directories.len(),
        manifest.remote_count(),
        manifest.inline_count(),
        &manifest.digest()[..16]
    );

    Ok(())
}

/// Print the manifest as a human-readable listing
fn print_table(manifest: &Manifest) {
    println!("Directories:");
    for dir in &manifest.directories {
        println!("  {}", dir.path.display());
    }

    println!();
    println!("{:<8} {}", "SOURCE", "PATH");
    println!("{}", "-".repeat(80));
    for task in &manifest.tasks {
        let kind = match task.source {
            TaskSource::Remote(_) => "remote",
            TaskSource::Inline(_) => "inline",
        };
        println!("{:<8} {}", kind, task.local_path.display());
    }
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("Course Backup Configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!("Root:        {}", cfg.root.display());
    println!();
    println!("Planning:");
    println!("  Subtitles:         {}", cfg.options.load_subtitles);
    println!("  Target resolution: {}", cfg.options.target_resolution);
    println!("  Audio selection:   {}", cfg.options.audio_selection);
    println!("  Title collisions:  {}", cfg.options.title_collisions);

    Ok(())
}
