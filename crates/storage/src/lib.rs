//! Object storage for course materials.
//!
//! Objects live under `courses/{course_id}/materials/{filename}`. Each upload
//! also writes a `course_materials` document holding any text the assistant
//! can read from the file.

pub mod error;
pub mod local;
pub mod memory;
pub mod object_store;
pub mod uploader;

pub use error::{StorageError, StorageResult};
pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;
pub use object_store::{material_key, ObjectStore};
pub use uploader::{
    extract_content, MaterialFile, MaterialUploader, StoredMaterialUploader, UploadedMaterial,
};
