pub mod application_routes;
pub mod health;
pub mod interview_routes;
pub mod offer_routes;
pub mod score_routes;
