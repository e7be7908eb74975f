//! Personalized house-music playlists from like/dislike quiz feedback.

pub mod config;
pub mod db;
pub mod error;
pub mod generation_id;
pub mod models;
pub mod services;

pub use config::{Config, ScoringWeights};
pub use error::{AppError, AppResult};
