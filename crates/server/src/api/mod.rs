mod handlers;
mod movies;
mod routes;

pub use routes::create_router;
