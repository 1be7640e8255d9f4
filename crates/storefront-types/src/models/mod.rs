//! Domain models exchanged with the storefront API.

mod blog;
mod cart;
mod catalog;
mod settings;
mod user;

pub use blog::BlogPost;
pub use cart::{Cart, CartItem};
pub use catalog::{Category, Product};
pub use settings::StoreSettings;
pub use user::{Credentials, User};
