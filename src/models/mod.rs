pub mod actor;
pub mod application;
pub mod interview;
pub mod offer;
pub mod profile;
pub mod score;
