pub mod auth_service;
pub use auth_service::{
    AuthError, AuthService, AuthUser, LoginResult, RegisteredUser, SYSTEM_ACTOR,
};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod catalog_service;
pub use catalog_service::{Book, CatalogError, CatalogService, Category, CategoryRef};

pub mod catalog_service_impl;
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod token;
pub use token::{Claims, SignedToken, TokenSigner};
