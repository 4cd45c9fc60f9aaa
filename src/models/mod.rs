mod admin;
mod auth;
mod brand;
mod category;
mod discount;
mod pagination;
mod product;
mod product_image;
mod product_specification;
mod tag;
mod user;

pub use admin::*;
pub use auth::*;
pub use brand::*;
pub use category::*;
pub use discount::*;
pub use pagination::*;
pub use product::*;
pub use product_image::*;
pub use product_specification::*;
pub use tag::*;
pub use user::*;
