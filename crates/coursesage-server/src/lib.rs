//! CourseSage server: catalog and AI learning routes over axum.

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
