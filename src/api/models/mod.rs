//! Request and response models for the HTTP surface.

pub mod auth;
pub mod lists;
pub mod movies;
pub mod users;
