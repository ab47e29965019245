pub mod api_connection;
pub mod plan;
pub mod cli;
pub mod grocery;
pub mod generate;
pub mod family;
pub mod recipes;
pub mod store;
