//! CLI command implementations.

mod augment;
mod config;
mod detect;
mod doctor;
mod playlists;
mod run;
mod summary;

pub use augment::run_augment;
pub use config::run_config;
pub use detect::run_detect;
pub use doctor::run_doctor;
pub use playlists::run_playlists;
pub use run::run_pipeline;
pub use summary::run_summary;
