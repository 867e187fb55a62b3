//! Folders, uploads, and the blob storage behind them.

pub mod blob;
pub mod service;

pub use blob::{BlobStore, ByteStream, LocalBlobStore, StoredBlob};
pub use service::{DriveService, FolderWithFiles, UploadInput};
