pub mod account;
pub mod blog;
pub mod person;

pub use account::{Account, NewAccount};
pub use blog::{Blog, BlogBody, BlogOwner, BlogPayload, PopulatedBlog};
pub use person::{Person, PersonBody};
