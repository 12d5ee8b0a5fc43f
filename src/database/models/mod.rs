pub mod todo;
pub mod user;

pub use todo::{Todo, TodoState};
pub use user::User;
