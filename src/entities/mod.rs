pub mod prelude;

pub mod books;
pub mod categories;
pub mod users;
