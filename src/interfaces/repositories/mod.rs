pub mod episode;
pub mod file;
pub mod hero_image;
pub mod podcast;
pub mod repository;
pub mod sqlx_repo;
pub mod variable;
