pub mod application_dto;
pub mod dashboard_dto;
pub mod interview_dto;
pub mod pagination;
pub mod patch;
pub mod review_dto;
