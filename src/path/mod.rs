//! Path interning
//!
//! Every symbolic string the application hands to the runtime (interaction profiles,
//! binding paths, subaction paths) is interned once and referenced afterwards through a
//! small integer [`Path`]. Handles are assigned sequentially starting at 1 and stay valid
//! for the lifetime of the [`PathTable`]; `0` is reserved for [`Path::NULL`].
//!
//! ```text
//! "/user/hand/left" ──intern──► Path(1) ──resolve──► "/user/hand/left"
//! ```

pub mod user;

pub use user::{join_action_path, side_of, Side};

use crate::error::ActionError;
use std::fmt;
use tracing::trace;

/// Interned path handle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(u64);

impl Path {
    /// Reserved sentinel meaning "unspecified"
    pub const NULL: Path = Path(0);

    pub const fn from_raw(raw: u64) -> Self {
        Path(raw)
    }

    pub const fn into_raw(self) -> u64 {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({})", self.0)
    }
}

/// Bidirectional string <-> handle table
///
/// Lookup is a linear scan by value. Tables stay small (a few hundred entries for a
/// typical application) and exact string comparison is the contract, so no hashing
/// layer sits in front of it.
#[derive(Debug, Default, Clone)]
pub struct PathTable {
    strings: Vec<String>,
}

impl PathTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `path`, allocating the next sequential one on first use
    pub fn intern(&mut self, path: &str) -> Path {
        if let Some(existing) = self.lookup(path) {
            return existing;
        }

        self.strings.push(path.to_owned());
        let handle = Path(self.strings.len() as u64);
        trace!("Interned '{}' as {}", path, handle);
        handle
    }

    /// Finds the handle of an already interned string without allocating one
    pub fn lookup(&self, path: &str) -> Option<Path> {
        self.strings
            .iter()
            .position(|candidate| candidate == path)
            .map(|index| Path(index as u64 + 1))
    }

    /// Resolves a handle back to its string. The null path resolves to ""
    pub fn resolve(&self, path: Path) -> Result<&str, ActionError> {
        if path.is_null() {
            return Ok("");
        }

        self.strings
            .get(path.0 as usize - 1)
            .map(String::as_str)
            .ok_or(ActionError::PathInvalid(path.0))
    }

    /// Materializes a path into a caller buffer as a NUL-terminated string
    ///
    /// Returns the required size (string length + 1). An empty buffer only queries the
    /// size; a buffer that is non-empty but too small fails before anything is written.
    pub fn path_to_string(&self, path: Path, buffer: &mut [u8]) -> Result<usize, ActionError> {
        let string = self.resolve(path)?;
        write_c_string(string, buffer)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Two-call buffer fill for element arrays
///
/// `buffer.len()` is the declared capacity. Zero capacity reports the required count.
pub fn fill_buffer<T: Copy>(source: &[T], buffer: &mut [T]) -> Result<usize, ActionError> {
    let required = source.len();
    if buffer.is_empty() {
        return Ok(required);
    }

    if buffer.len() < required {
        return Err(ActionError::SizeInsufficient {
            required,
            capacity: buffer.len(),
        });
    }

    buffer[..required].copy_from_slice(source);
    Ok(required)
}

/// Two-call buffer fill for strings, including the terminating NUL
pub fn write_c_string(string: &str, buffer: &mut [u8]) -> Result<usize, ActionError> {
    let required = string.len() + 1;
    if buffer.is_empty() {
        return Ok(required);
    }

    if buffer.len() < required {
        return Err(ActionError::SizeInsufficient {
            required,
            capacity: buffer.len(),
        });
    }

    buffer[..string.len()].copy_from_slice(string.as_bytes());
    buffer[string.len()] = 0;
    Ok(required)
}
