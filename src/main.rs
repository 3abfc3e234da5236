// This file is an example of how to use the `binsight` library.
// The main library entry point is `src/lib.rs`.

use binsight::pipeline::{AnnotationPipeline, Label, PipelineConfig};
use image::ImageEncoder;

/// Generates a small uniform PNG in memory, standing in for a camera upload.
fn synthetic_photo(shade: u8) -> Vec<u8> {
    let mut bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(std::io::Cursor::new(&mut bytes));
    encoder
        .write_image(
            &vec![shade; 32 * 32 * 3],
            32,
            32,
            image::ExtendedColorType::Rgb8,
        )
        .expect("Error encoding demo image.");
    bytes
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Binsight Annotation Engine - Example Runner");

    let mut pipeline = AnnotationPipeline::new(PipelineConfig::default());

    // Three containers along one street, one across town.
    let depot = [
        ("quay north", Some((48.8566, 2.3522))),
        ("quay north", Some((48.85723, 2.3522))),
        ("quay north", Some((48.85786, 2.3522))),
        ("market square", Some((48.8666, 2.3522))),
    ];
    for (index, (location, coordinates)) in depot.iter().enumerate() {
        let shade = if index < 3 { 40 } else { 230 };
        let id = pipeline.ingest(&synthetic_photo(shade), location, *coordinates);
        let label = if index < 2 { Label::Full } else { Label::Empty };
        pipeline
            .annotate(id, label)
            .expect("Error annotating demo observation.");
    }

    let report = pipeline.zones().expect("Error computing zones.");
    for zone in &report.zones {
        println!(
            "observation {} @ ({:.5}, {:.5}) -> zone {} [{:?}]",
            zone.observation_id, zone.latitude, zone.longitude, zone.zone_id, zone.risk
        );
    }
    println!(
        "zones: {} critical / {} monitored / {} safe",
        report.summary.critical, report.summary.monitored, report.summary.safe
    );
}
