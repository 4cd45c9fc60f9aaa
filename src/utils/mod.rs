pub mod de;
pub mod jwt;
pub mod slug;

pub use slug::slugify;
