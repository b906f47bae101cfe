//! HTTP surface of the dashboard

mod query;
mod routes;
mod server;
mod state;

pub use query::{list_logs, QueryError};
pub use routes::create_router;
pub use server::{create_server, run_server};
pub use state::AppState;
