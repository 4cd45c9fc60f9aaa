pub mod auth_service;
pub mod brand_service;
pub mod category_service;
pub mod discount_service;
pub mod product_image_service;
pub mod product_service;
pub mod product_specification_service;
pub mod product_tag_service;
pub mod resource;
pub mod stats_service;
pub mod subcategory_service;
pub mod tag_service;
pub mod user_service;

pub use resource::{Endpoints, IdPlacement, ListParams, Resource};
