mod migrate;
mod user;

pub use migrate::cmd_migrate;
pub use user::cmd_user_add;
