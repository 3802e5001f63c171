//! Gazette - a blog-style content API
//!
//! This library provides the core functionality for the Gazette content API:
//! articles organized into categories and tags, exposed over HTTP JSON
//! endpoints with token-based authentication.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
