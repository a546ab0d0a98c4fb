pub use super::books::Entity as Books;
pub use super::categories::Entity as Categories;
pub use super::users::Entity as Users;
