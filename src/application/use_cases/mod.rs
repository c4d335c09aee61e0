pub mod documents;
pub mod sharing;
