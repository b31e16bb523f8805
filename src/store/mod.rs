pub mod storage;
pub mod types;

pub use storage::{get_gradebook_path, load_gradebook, save_gradebook};
pub use types::Gradebook;
