pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::services::{
    auth_service::JwtService, certificate_service::CertificateService,
    company_service::CompanyService, course_service::CourseService,
    job_posting_service::JobPostingService, recommendation_service::RecommendationService,
    user_service::UserService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub jwt: JwtService,
    pub user_service: UserService,
    pub company_service: CompanyService,
    pub job_posting_service: JobPostingService,
    pub course_service: CourseService,
    pub certificate_service: CertificateService,
    pub recommendation_service: RecommendationService,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self {
            jwt: JwtService::new(config),
            user_service: UserService::new(pool.clone()),
            company_service: CompanyService::new(pool.clone()),
            job_posting_service: JobPostingService::new(pool.clone()),
            course_service: CourseService::new(pool.clone()),
            certificate_service: CertificateService::new(pool.clone()),
            recommendation_service: RecommendationService::with_pool(pool.clone()),
            pool,
        }
    }
}
