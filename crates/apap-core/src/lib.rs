pub mod crypto;
pub mod locale;

pub use locale::{Marketplace, UnknownLocale};
