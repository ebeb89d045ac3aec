pub mod error;
pub mod routes;
pub mod schedules;
pub mod state;
pub mod virtual_posts;
