pub mod client;
pub mod errors;
pub mod types;

pub use client::{resolve_author_email, GitHubSsoClient, IdentityProvider};
pub use errors::IdentityError;
