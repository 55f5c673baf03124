pub mod blog;
pub mod user;
pub mod validation;

pub use blog::*;
pub use user::*;
pub use validation::*;
