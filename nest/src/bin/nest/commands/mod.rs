pub mod listings;
pub mod serve;
