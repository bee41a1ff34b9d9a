pub mod files;
pub mod hero_images;
pub mod integrity;
pub mod site_settings;
