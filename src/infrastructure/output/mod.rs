pub mod report_file;

pub use report_file::{expand_path, write_report};
