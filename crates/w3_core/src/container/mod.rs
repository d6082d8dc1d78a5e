// XLZF save container: one magic line, ten fixed header fields, then the
// compressed document trailing to end of file.

pub mod codec;
pub mod error;
pub mod header;
pub mod store;

pub use codec::SaveContainer;
pub use error::SaveError;
pub use header::SaveHeader;
pub use store::{derived_output_path, load, save, DEFAULT_OUTPUT_SUFFIX};

/// First line of every save file, newline excluded.
pub const MAGIC: &[u8] = b"XLZF";
