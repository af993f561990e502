pub mod audit;
pub mod auth_redirect;
