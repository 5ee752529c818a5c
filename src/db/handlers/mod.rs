//! Repository implementations for CRUD operations.

pub mod lists;
pub mod movies;
pub mod repository;
pub mod users;

pub use lists::Lists;
pub use movies::Movies;
pub use repository::Repository;
pub use users::Users;
