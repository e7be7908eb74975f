pub mod catalog;
pub mod playlists;
pub mod quiz;
pub mod recommender;

pub use catalog::{FeedbackSink, FeedbackSource, SongCatalog};
pub use playlists::PlaylistService;
pub use quiz::QuizService;
pub use recommender::Recommender;
