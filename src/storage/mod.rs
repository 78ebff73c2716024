pub mod uploads;

pub use uploads::{UploadStore, UploadedFile};
