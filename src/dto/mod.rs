pub mod auth_dto;
pub mod certificate_dto;
pub mod company_dto;
pub mod course_dto;
pub mod job_posting_dto;
pub mod links;
pub mod page_dto;
pub mod user_dto;
