//! Fixed-size entry header of the wpress container.
//!
//! ```text
//! offset  length  field
//! 0       255     file name, NUL-terminated
//! 255     14      payload size, ASCII decimal
//! 269     12      modification time, ASCII
//! 281     4096    path prefix, NUL-terminated
//! ```
//!
//! Payload bytes follow the header directly. An all-zero header block ends the archive.

use std::ops::Range;

pub const HEADER_SIZE: usize = 4377;

/// Payloads are copied in chunks of this many bytes.
pub const CHUNK_SIZE: usize = 1024;

const NAME: Range<usize> = 0..255;
const SIZE: Range<usize> = 255..269;
const MTIME: Range<usize> = 269..281;
const PREFIX: Range<usize> = 281..HEADER_SIZE;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("invalid payload size field '{0}'")]
    InvalidSize(String),

    #[error("header has an empty file name")]
    EmptyName,

    #[error("{field} is {len} bytes, at most {max} fit")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WpressHeader {
    pub name: String,
    pub size: u64,
    pub mtime: String,
    pub prefix: String,
}

impl WpressHeader {
    pub fn is_eof_block(block: &[u8]) -> bool {
        block.iter().all(|&b| b == 0)
    }

    /// Decode one header block. Returns `None` for the end-of-archive block.
    pub fn parse(block: &[u8; HEADER_SIZE]) -> Result<Option<Self>, HeaderError> {
        if Self::is_eof_block(block) {
            return Ok(None);
        }

        let name = field(&block[NAME]);
        if name.is_empty() {
            return Err(HeaderError::EmptyName);
        }
        let size_text = field(&block[SIZE]);
        let size = size_text
            .trim()
            .parse::<u64>()
            .map_err(|_| HeaderError::InvalidSize(size_text.clone()))?;

        Ok(Some(Self {
            name,
            size,
            mtime: field(&block[MTIME]),
            prefix: field(&block[PREFIX]),
        }))
    }

    /// Path of the entry relative to the archive root.
    ///
    /// A prefix of `.` (or none at all) means the root itself.
    pub fn relative_path(&self) -> String {
        let prefix = self.prefix.replace('\\', "/");
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() || prefix == "." {
            self.name.clone()
        } else {
            format!("{prefix}/{}", self.name)
        }
    }

    /// Encode this header into a block, the inverse of [`WpressHeader::parse`].
    pub fn encode(&self) -> Result<[u8; HEADER_SIZE], HeaderError> {
        if self.name.is_empty() {
            return Err(HeaderError::EmptyName);
        }
        let mut block = [0u8; HEADER_SIZE];
        put(&mut block[NAME], "name", self.name.as_bytes())?;
        put(&mut block[SIZE], "size", self.size.to_string().as_bytes())?;
        put(&mut block[MTIME], "mtime", self.mtime.as_bytes())?;
        put(&mut block[PREFIX], "prefix", self.prefix.as_bytes())?;
        Ok(block)
    }
}

fn field(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn put(slot: &mut [u8], field: &'static str, value: &[u8]) -> Result<(), HeaderError> {
    if value.len() > slot.len() {
        return Err(HeaderError::FieldTooLong {
            field,
            len: value.len(),
            max: slot.len(),
        });
    }
    slot[..value.len()].copy_from_slice(value);
    Ok(())
}
