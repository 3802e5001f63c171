//! Domain models
//!
//! Plain entity structs shared by the repository, service, and API layers.

pub mod article;
pub mod category;
pub mod session;
pub mod tag;
pub mod user;

pub use article::{
    Article, ArticleStatus, CreateArticleInput, ListParams, PagedResult, UpdateArticleInput,
};
pub use category::{Category, CreateCategoryInput, UpdateCategoryInput};
pub use session::RefreshToken;
pub use tag::{CreateTagInput, Tag, UpdateTagInput};
pub use user::{User, UserRole};
