// crop1080/src/processors/mod.rs
mod batch;
mod encoder;
mod format;
mod loader;
mod orientation;
mod sink;
mod transform;

pub use batch::{BatchEntry, BatchInput, BatchProcessor, BatchReport, InputSource};
pub use encoder::Encoder;
pub use format::FormatResolver;
pub use loader::Loader;
pub use orientation::OrientationCorrector;
pub use sink::{DirectorySink, MemorySink, OutputSink, ZipSink};
pub use transform::Transformer;

pub mod prelude {
    pub use super::{
        BatchInput, BatchProcessor, DirectorySink, Encoder, FormatResolver, Loader, OutputSink,
        Transformer, ZipSink,
    };
}
