pub mod card;
pub mod config;
pub mod error;
pub mod handlers;
pub mod i18n;
pub mod metadata;
pub mod models;
pub mod refresh;
pub mod registry;
pub mod render;
pub mod search;
pub mod state;
pub mod store;
