//! Backing streams for a [`Table`](crate::Table).
//!
//! The table only needs two things from its stream: the whole current
//! content, and a way to replace the whole content. Opening and closing
//! files stays with the caller; [`open_or_create`] and [`open_existing`]
//! are thin helpers for the two usual ways of doing that.

use std::{
    fs::{File, OpenOptions},
    io::{self, Cursor, Read, Seek, SeekFrom, Write},
    path::Path,
};

use tracing::debug;

/// A readable, rewritable text stream.
///
/// One stream backs one table. Sharing a stream between tables, or
/// reading it from elsewhere while a table writes, is unsupported.
pub trait Storage {
    /// Read the entire content from the start of the stream.
    fn read_all(&mut self) -> io::Result<String>;

    /// Replace the entire content of the stream with `content`.
    fn replace(&mut self, content: &str) -> io::Result<()>;
}

impl Storage for File {
    fn read_all(&mut self) -> io::Result<String> {
        self.seek(SeekFrom::Start(0))?;
        let mut text = String::new();
        self.read_to_string(&mut text)?;
        Ok(text)
    }

    fn replace(&mut self, content: &str) -> io::Result<()> {
        self.set_len(0)?;
        self.seek(SeekFrom::Start(0))?;
        self.write_all(content.as_bytes())?;
        self.flush()
    }
}

impl Storage for Cursor<Vec<u8>> {
    fn read_all(&mut self) -> io::Result<String> {
        String::from_utf8(self.get_ref().clone())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn replace(&mut self, content: &str) -> io::Result<()> {
        let buf = self.get_mut();
        buf.clear();
        buf.extend_from_slice(content.as_bytes());
        self.set_position(content.len() as u64);
        Ok(())
    }
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn read_all(&mut self) -> io::Result<String> {
        (**self).read_all()
    }

    fn replace(&mut self, content: &str) -> io::Result<()> {
        (**self).replace(content)
    }
}

/// Open `path` for reading and writing, creating an empty file if absent.
pub fn open_or_create<P: AsRef<Path>>(path: P) -> io::Result<File> {
    let path = path.as_ref();
    debug!(path = %path.display(), "open_or_create");
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
}

/// Open an existing file at `path` for reading and writing.
pub fn open_existing<P: AsRef<Path>>(path: P) -> io::Result<File> {
    let path = path.as_ref();
    debug!(path = %path.display(), "open_existing");
    OpenOptions::new().read(true).write(true).open(path)
}
