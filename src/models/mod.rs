pub mod certificate;
pub mod company;
pub mod course;
pub mod job_posting;
pub mod user;
