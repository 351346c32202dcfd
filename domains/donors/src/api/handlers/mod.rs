pub mod auth;
pub mod users;

pub use users::UserResponse;
