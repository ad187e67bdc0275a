//! Command-line interface.
//!
//! The CLI stands in for the upload API: `ingest` plays the role of the
//! upload handler (create the asset row, fire the creation hook, run the
//! conversion), `remove` the delete handler. Conversion outcome is observed
//! through the asset record (`status`), never through the command's exit
//! alone.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use vf_av::{EncoderSettings, FfmpegEncoder, ToolRegistry};
use vf_core::config::Config;
use vf_core::events::EventBus;
use vf_core::{NewVideoAsset, VideoId};
use vf_store::SqliteVideoStore;

use crate::context::EngineContext;
use crate::hooks;
use crate::pipeline::MediaLayout;
use crate::queue::{JobState, MemoryJobQueue};
use crate::worker::WorkerPool;

#[derive(Parser)]
#[command(name = "vodforge")]
#[command(author, version, about = "Background HLS transcoding engine")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a video and convert it to HLS renditions
    Ingest {
        /// Master video file to ingest
        #[arg(required = true)]
        file: PathBuf,

        /// Title for the asset (defaults to the file stem)
        #[arg(long)]
        title: Option<String>,

        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,

        /// Genre tag
        #[arg(long, default_value = "")]
        genre: String,
    },

    /// Resubmit the conversion for an existing video
    Convert {
        /// Video id to convert
        video_id: VideoId,
    },

    /// Delete a video and reclaim its on-disk artifacts
    Remove {
        /// Video id to remove
        video_id: VideoId,
    },

    /// Show the conversion state recorded for a video
    Status {
        /// Video id to inspect
        video_id: VideoId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that required external tools are available
    CheckTools {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },
}

/// Build the engine context from configuration.
fn build_context(config: Config) -> anyhow::Result<EngineContext> {
    let pool = vf_store::pool::init_pool(&config.media.db_path.to_string_lossy())
        .context("failed to open asset catalog")?;
    let store = Arc::new(SqliteVideoStore::new(pool));

    let tools = Arc::new(ToolRegistry::discover(&config.tools));
    let encoder = Arc::new(FfmpegEncoder::new(
        tools,
        EncoderSettings::from(&config.encoding),
    ));

    let events = Arc::new(EventBus::default());
    let queue = Arc::new(MemoryJobQueue::new(events.clone()));
    let layout = MediaLayout::new(config.media.media_root.clone());

    Ok(EngineContext {
        store,
        queue,
        encoder,
        events,
        layout,
        config: Arc::new(config),
    })
}

/// Entry point invoked by `main` after parsing.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load_or_default(cli.config.as_deref());
    for warning in config.validate() {
        tracing::warn!("Config: {warning}");
    }

    match cli.command {
        Commands::Ingest {
            file,
            title,
            description,
            genre,
        } => {
            let file = file
                .canonicalize()
                .with_context(|| format!("input file not found: {}", file.display()))?;
            let title = title.unwrap_or_else(|| {
                file.file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "untitled".into())
            });

            let ctx = build_context(config)?;
            let asset = ctx.store.create(&NewVideoAsset {
                title,
                description,
                genre,
                input_path: file.to_string_lossy().into_owned(),
            })?;
            println!("Registered video {} ({})", asset.id, asset.title);

            let handle = hooks::on_asset_created(&ctx, asset.id)?;
            WorkerPool::new(&ctx).drain().await;

            report_outcome(&ctx, asset.id, handle.id)?;
        }

        Commands::Convert { video_id } => {
            let ctx = build_context(config)?;
            // Fail early with a clear message if the id is unknown.
            let asset = ctx.store.get(video_id)?;
            println!("Converting video {} ({})", asset.id, asset.title);

            let handle = ctx.queue.enqueue(video_id)?;
            WorkerPool::new(&ctx).drain().await;

            report_outcome(&ctx, video_id, handle.id)?;
        }

        Commands::Remove { video_id } => {
            let ctx = build_context(config)?;
            let deleted = ctx.store.delete(video_id)?;
            hooks::on_asset_deleted(&ctx, video_id, std::path::Path::new(&deleted.input_path));
            println!("Removed video {} ({})", deleted.id, deleted.title);
        }

        Commands::Status { video_id, json } => {
            let ctx = build_context(config)?;
            let asset = ctx.store.get(video_id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&asset)?);
            } else {
                println!("Video:     {} ({})", asset.id, asset.title);
                println!("Input:     {}", asset.input_path);
                match &asset.hls_master_playlist {
                    Some(locator) => println!("Playlist:  {locator}"),
                    None => println!("Playlist:  (not converted)"),
                }
                match &asset.thumbnail {
                    Some(locator) => println!("Thumbnail: {locator}"),
                    None => println!("Thumbnail: (none)"),
                }
            }
        }

        Commands::CheckTools { json } => {
            let tools = ToolRegistry::discover(&config.tools);
            let infos = tools.check_all();

            if json {
                println!("{}", serde_json::to_string_pretty(&infos)?);
            } else {
                for info in infos {
                    if info.available {
                        println!(
                            "{:<10} OK    {} ({})",
                            info.name,
                            info.version.as_deref().unwrap_or("unknown version"),
                            info.path
                                .as_deref()
                                .map(|p| p.display().to_string())
                                .unwrap_or_default()
                        );
                    } else {
                        println!("{:<10} MISSING", info.name);
                    }
                }
            }
        }

        Commands::Validate { config: path } => {
            let config = Config::load_or_default(path.as_deref());
            let warnings = config.validate();
            if warnings.is_empty() {
                println!("Configuration OK");
            } else {
                for warning in &warnings {
                    println!("warning: {warning}");
                }
                anyhow::bail!("{} configuration warning(s)", warnings.len());
            }
        }
    }

    Ok(())
}

/// Print the terminal state of a finished job and exit non-zero on failure.
fn report_outcome(
    ctx: &EngineContext,
    video_id: VideoId,
    job_id: vf_core::ConversionJobId,
) -> anyhow::Result<()> {
    match ctx.queue.get(job_id) {
        Some(job) if job.state == JobState::Completed => {
            let asset = ctx.store.get(video_id)?;
            println!(
                "Conversion completed: {}",
                asset
                    .hls_master_playlist
                    .as_deref()
                    .unwrap_or("(playlist missing)")
            );
            Ok(())
        }
        Some(job) if job.state == JobState::Failed => {
            anyhow::bail!(
                "conversion failed: {}",
                job.error.as_deref().unwrap_or("unknown error")
            );
        }
        other => {
            anyhow::bail!(
                "conversion did not reach a terminal state (job: {:?})",
                other.map(|j| j.state)
            );
        }
    }
}
