pub mod json;

pub use json::{export_json_to_path, import_json};
