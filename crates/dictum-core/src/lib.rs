pub mod collapse;
pub mod format;
pub mod template;
pub mod truncate;

pub use collapse::should_collapse;
pub use format::ResultFormatter;
pub use template::render;
pub use truncate::truncate;
