use std::time::Instant;

use env_logger::Builder;
use image::open;
use log::info;
use lowpoly_polygonize::{visualize_triangles, Polygonizer, DEFAULT_MAX_POINTS, DEFAULT_THRESHOLD};

fn main() {
    Builder::from_default_env().format_timestamp_nanos().init();

    let img = open("test_image/input.png").unwrap().to_rgb8();
    info!("Loading image: {}x{}", img.width(), img.height());

    let polygonizer = Polygonizer::default();
    let instance = Instant::now();

    let triangles = polygonizer
        .polygonize(&img, DEFAULT_MAX_POINTS, DEFAULT_THRESHOLD)
        .unwrap();
    info!("Triangulated in {:?}: {} triangles", instance.elapsed(), triangles.len());

    let lowpoly = polygonizer.render(&img, &triangles).unwrap();
    info!("Rendered in {:?}", instance.elapsed());

    lowpoly.save("test_image/lowpoly.png").unwrap();
    visualize_triangles(&img, &triangles)
        .save("test_image/mesh.png")
        .unwrap();
}
