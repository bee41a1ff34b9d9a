pub mod files;
pub mod hero_images;
pub mod settings;
pub mod system;
