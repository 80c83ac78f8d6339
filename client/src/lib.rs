#![warn(clippy::unwrap_in_result)]
#![warn(clippy::unwrap_used)]

pub mod api;
pub mod dashboard;
pub mod error;
pub mod inventory;
pub mod notice;
pub mod render;
pub mod resource;
pub mod search;
pub mod session;
pub mod upload;

pub use api::{HttpStorage, StorageApi};
pub use dashboard::{AssumeYes, Confirm, Dashboard, DeleteOutcome};
pub use error::{ClientError, Result};
pub use inventory::FileState;
pub use notice::{Notice, Notify};
pub use session::Session;
pub use upload::{Batch, BatchSource, FileHandle};
