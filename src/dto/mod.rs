pub mod pipeline_dto;
pub mod score_dto;
