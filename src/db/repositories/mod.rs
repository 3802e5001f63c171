//! Repository layer
//!
//! One repository trait per entity, each implemented over the
//! `DatabasePool` abstraction with driver dispatch to SQLite or MySQL.

pub mod article;
pub mod category;
pub mod session;
pub mod tag;
pub mod user;

pub use article::{ArticleRepository, SqlxArticleRepository};
pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use session::{RefreshTokenRepository, SqlxRefreshTokenRepository};
pub use tag::{SqlxTagRepository, TagRepository};
pub use user::{SqlxUserRepository, UserRepository};
