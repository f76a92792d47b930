pub mod message;

pub use message::{fold_system_into_user, Message};
