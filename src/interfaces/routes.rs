use actix_web::web;

use crate::handlers::{files, hero_images, settings, system};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(system::health_check);

    // Literal /files/... routes must register before the parameterized
    // /files/{file_id} catch-all.
    cfg.service(
        web::scope("/api")
            .service(files::upload_file)
            .service(files::list_files)
            .service(files::serve_optimized)
            .service(files::serve_resized)
            .service(files::get_file_metadata)
            .service(files::get_file)
            .service(files::delete_file)
            .service(hero_images::create_hero_image)
            .service(hero_images::find_hero_images)
            .service(hero_images::get_hero_image_urls)
            .service(hero_images::get_hero_image)
            .service(hero_images::delete_hero_image)
            .service(settings::get_site_settings)
            .service(settings::update_site_settings)
    );
}
