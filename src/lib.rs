//! lingo - sort a music library by language
//!
//! A CLI tool that infers the language of every track in a music catalog
//! and builds one playlist per language.
//!
//! # Overview
//!
//! Tracks go through three stages, each reading the previous stage's file:
//! - Metadata detection: instrumental tracks are set aside, then name,
//!   artist and album are scored per language with fixed weights
//! - Lyrics augmentation: tracks metadata could not settle are looked up on
//!   a lyrics provider and detected from a lyrics snippet; progress is
//!   checkpointed after every track so interrupted runs resume
//! - Playlist creation: resolved tracks are grouped by language and written
//!   to a playlist service in batches
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `catalog` - Track records at each stage and their JSON files
//! - `detection` - Language oracle, weighted scorer, instrumental classifier
//! - `http` - Shared HTTP client, failure classification and retry policy
//! - `lyrics` - Lyrics provider abstraction and the Genius client
//! - `checkpoint` - Resumable store of augmentation records
//! - `augment` - Lyrics-based augmentation
//! - `grouping` - Tracks grouped by final language
//! - `playlist` - Playlist sink abstraction, Spotify client, batched creation
//! - `summary` - Language distribution reports
//! - `pipeline` - Stage coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use lingo::config::Settings;
//! use lingo::pipeline::{LanguageSelection, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let catalog = settings.catalog_path();
//!     let pipeline = Pipeline::new(settings);
//!
//!     let report = pipeline.run(&catalog, &LanguageSelection::All).await?;
//!     println!("Created {} playlists", report.playlists.created());
//!
//!     Ok(())
//! }
//! ```

pub mod augment;
pub mod catalog;
pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod grouping;
pub mod http;
pub mod lyrics;
pub mod pipeline;
pub mod playlist;
pub mod summary;

pub use error::{LingoError, Result};
