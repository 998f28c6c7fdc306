//! Application services layer.

pub mod admin;
pub mod auth;
pub mod chrome;
pub mod error;
pub mod feed;
pub mod page;
pub mod pagination;
pub mod repos;
pub mod travels;
pub mod upstream;
