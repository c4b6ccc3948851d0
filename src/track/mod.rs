pub mod dispatcher;
pub mod handlers;
pub mod routes;

pub use routes::create_track_router;
