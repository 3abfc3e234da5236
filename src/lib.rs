// THEORY:
// This file is the main entry point for the `binsight` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the public
// API that will be exposed to external consumers (the web shell and the
// `zone_tester` tool).
//
// The primary goal is to export the `AnnotationPipeline` and its associated data
// structures (`PipelineConfig`, `ZoneReport`, etc.) as the clean, high-level
// interface for the entire engine. The internal modules (`core_modules`) stay
// encapsulated behind it, providing a clean separation of concerns.

pub mod core_modules;
pub mod pipeline;
