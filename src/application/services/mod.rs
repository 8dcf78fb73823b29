pub mod feed_service;

pub mod like_service;

pub mod profile_service;

pub use feed_service::{FeedService, FeedServiceImpl, PageFetch};
pub use like_service::{LikeService, LikeServiceImpl};
pub use profile_service::{ProfileImageService, ProfileService, ProfileServiceImpl};
