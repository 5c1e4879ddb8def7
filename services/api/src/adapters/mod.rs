pub mod classifier;
pub mod db;
pub mod process;
pub mod ranker;
pub mod spotify;

pub use classifier::SubprocessClassifier;
pub use db::DbAdapter;
pub use ranker::SubprocessRanker;
pub use spotify::{SpotifyCatalogAdapter, SpotifySettings};
