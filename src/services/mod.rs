pub mod pipeline_service;
pub mod scoring_service;
pub mod visibility;
