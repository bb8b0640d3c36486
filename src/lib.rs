pub mod category;
pub mod classify;
pub mod hero;
pub mod http_client;
pub mod query;
pub mod record_fetch;
pub mod saved_players;
pub mod summary;
