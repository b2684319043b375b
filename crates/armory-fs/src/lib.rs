//! Filesystem foundation for Armory
//!
//! Resolves the workspace layout (tool directories, the shared `bin/`
//! directory) and provides atomic, lock-protected file writes used for
//! install records and profile edits.

mod error;
mod io;
mod layout;

pub use error::{Error, Result};
pub use io::{append_line, read_text, write_atomic};
pub use layout::Layout;
