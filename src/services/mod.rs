pub mod application_service;
pub mod dashboard_service;
pub mod directory_service;
pub mod interview_service;
pub mod review_service;
