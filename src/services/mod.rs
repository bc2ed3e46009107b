pub mod auth_service;
pub mod certificate_service;
pub mod company_service;
pub mod course_service;
pub mod job_posting_service;
pub mod pagination;
pub mod recommendation_service;
pub mod user_service;
