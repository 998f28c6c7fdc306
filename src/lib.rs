//! Backend for a personal blog and portfolio.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
