mod candidate_loader;
mod content_reader;
mod result_exporter;

pub use candidate_loader::candidate_from_path;
pub use content_reader::FsFileContentReader;
pub use result_exporter::{FsResultExporter, IMAGES_DIR, MARKDOWN_FILE};
