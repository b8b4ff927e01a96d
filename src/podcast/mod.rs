pub mod db;
pub mod feed;
pub mod opml;

pub use db::{ListenedEpisode, PodcastDb};
