//! Service layer
//!
//! Business logic for the Gazette content API. Each service owns validation
//! and orchestration for one entity and delegates persistence to the
//! repository layer.

pub mod article;
pub mod category;
pub mod password;
pub mod tag;
pub mod token;
pub mod user;

pub use article::{ArticleService, ArticleServiceError};
pub use category::{CategoryService, CategoryServiceError};
pub use tag::{TagService, TagServiceError};
pub use token::{AccessClaims, TokenError, TokenSigner};
pub use user::{LoginInput, RegisterInput, TokenPair, UserService, UserServiceError};
