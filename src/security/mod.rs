pub mod auth;
pub mod htaccess;
