pub mod episode;
pub mod file_metadata;
pub mod hero_image;
pub mod podcast;
pub mod site_settings;
pub mod variable;
