pub mod auth_service;
pub mod dashboard_service;
pub mod marketplace_service;
pub mod metrics_service;
pub mod profile_service;
pub mod recommendation_service;
pub mod report_service;
