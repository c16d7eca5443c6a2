//! Seekable byte stream abstraction.
//!
//! [`BasicIo`] is the stream interface the container handlers parse
//! from and write to. Implementations: [`FileIo`] over a filesystem
//! path and [`MemIo`] over a growable buffer (also the spill store
//! for stdin input). Replacement of a stream's contents is
//! transactional: [`BasicIo::transfer`] builds the new bytes
//! elsewhere and swaps them in atomically, so a failed write leaves
//! the original untouched.

use crate::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Open mode for a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    ReadWrite,
}

impl OpenMode {
    const fn as_str(self) -> &'static str {
        match self {
            OpenMode::Read => "r",
            OpenMode::ReadWrite => "r+",
        }
    }
}

/// A seekable byte stream.
///
/// `read` is the non-throwing variant: a short read sets the eof flag
/// and returns the count. Structural parsing goes through
/// `read_exact_vec`, which treats a short read as corruption.
pub trait BasicIo: Send {
    /// Open (or reopen) the stream in the given mode.
    fn open(&mut self, mode: OpenMode) -> Result<()>;

    /// Close the stream, releasing the handle.
    fn close(&mut self) -> Result<()>;

    /// Read up to `buf.len()` bytes; a short count sets eof.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Read exactly `n` bytes or fail with `UnexpectedEof`.
    fn read_exact_vec(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        let got = self.read(&mut buf)?;
        if got < n {
            return Err(Error::UnexpectedEof { need: n, have: got });
        }
        Ok(buf)
    }

    /// Write all of `data` at the current position.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Seek; reads past the end are `OutOfRange`, writes extend.
    fn seek(&mut self, pos: SeekFrom) -> Result<u64>;

    /// Current position.
    fn tell(&self) -> u64;

    /// Total size in bytes.
    fn size(&self) -> Result<u64>;

    /// Whether the last read hit end of stream.
    fn eof(&self) -> bool;

    /// Atomically replace this stream's contents.
    fn replace_with(&mut self, data: &[u8]) -> Result<()>;

    /// Swap in the full contents of `source`, leaving both closed.
    ///
    /// The read of `source` happens before any mutation of `self`;
    /// an error on either side leaves `self` unchanged.
    fn transfer(&mut self, source: &mut dyn BasicIo) -> Result<()> {
        source.seek(SeekFrom::Start(0))?;
        let len = source.size()? as usize;
        let data = source.read_exact_vec(len)?;
        self.replace_with(&data)?;
        source.close()?;
        self.close()
    }

    /// Read the remaining bytes of the stream.
    fn read_to_end_vec(&mut self) -> Result<Vec<u8>> {
        let remaining = self.size()?.saturating_sub(self.tell()) as usize;
        let mut buf = vec![0u8; remaining];
        let got = self.read(&mut buf)?;
        buf.truncate(got);
        Ok(buf)
    }
}

/// File-backed stream.
#[derive(Debug)]
pub struct FileIo {
    path: PathBuf,
    file: Option<File>,
    pos: u64,
    at_eof: bool,
}

impl FileIo {
    /// Create an unopened stream for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
            pos: 0,
            at_eof: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_mut(&mut self) -> Result<&mut File> {
        self.file.as_mut().ok_or(Error::ReadFailed)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".pixmeta-tmp");
        self.path.with_file_name(name)
    }
}

impl BasicIo for FileIo {
    fn open(&mut self, mode: OpenMode) -> Result<()> {
        let file = match mode {
            OpenMode::Read => OpenOptions::new().read(true).open(&self.path),
            OpenMode::ReadWrite => OpenOptions::new().read(true).write(true).open(&self.path),
        };
        self.file = Some(file.map_err(|_| Error::FileOpenFailed {
            path: self.path.display().to_string(),
            mode: mode.as_str(),
        })?);
        self.pos = 0;
        self.at_eof = false;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.file = None;
        self.pos = 0;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let file = self.file_mut()?;
        let mut total = 0;
        while total < buf.len() {
            match file.read(&mut buf[total..]) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => return Err(Error::ReadFailed),
            }
        }
        self.pos += total as u64;
        self.at_eof = total < buf.len();
        Ok(total)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let file = self.file_mut()?;
        file.write_all(data).map_err(|_| Error::WriteFailed)?;
        self.pos += data.len() as u64;
        Ok(data.len())
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let file = self.file_mut()?;
        self.pos = file.seek(pos).map_err(|_| Error::ReadFailed)?;
        self.at_eof = false;
        Ok(self.pos)
    }

    fn tell(&self) -> u64 {
        self.pos
    }

    fn size(&self) -> Result<u64> {
        match &self.file {
            Some(f) => Ok(f.metadata().map_err(|_| Error::ReadFailed)?.len()),
            None => Ok(std::fs::metadata(&self.path)
                .map_err(|_| Error::ReadFailed)?
                .len()),
        }
    }

    fn eof(&self) -> bool {
        self.at_eof
    }

    fn replace_with(&mut self, data: &[u8]) -> Result<()> {
        let tmp = self.temp_path();
        {
            let mut f = File::create(&tmp).map_err(|e| Error::TransferFailed(e.to_string()))?;
            f.write_all(data)
                .map_err(|e| Error::TransferFailed(e.to_string()))?;
            f.sync_all()
                .map_err(|e| Error::TransferFailed(e.to_string()))?;
        }
        self.file = None;
        std::fs::rename(&tmp, &self.path).map_err(|_| {
            let _ = std::fs::remove_file(&tmp);
            Error::RenameFailed(self.path.display().to_string())
        })?;
        self.pos = 0;
        Ok(())
    }
}

/// Growable in-memory stream.
#[derive(Debug, Default, Clone)]
pub struct MemIo {
    data: Vec<u8>,
    pos: usize,
    at_eof: bool,
}

impl MemIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data,
            pos: 0,
            at_eof: false,
        }
    }

    /// Drain stdin into a memory spill buffer (read-only use).
    pub fn from_stdin() -> Result<Self> {
        let mut data = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut data)
            .map_err(|_| Error::SourceOpenFailed("stdin".into()))?;
        Ok(Self::from_vec(data))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl BasicIo for MemIo {
    fn open(&mut self, _mode: OpenMode) -> Result<()> {
        self.pos = 0;
        self.at_eof = false;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.pos = 0;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let available = self.data.len().saturating_sub(self.pos);
        let n = buf.len().min(available);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        self.at_eof = n < buf.len();
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let end = self.pos + data.len();
        if end > self.data.len() {
            self.data.resize(end, 0);
        }
        self.data[self.pos..end].copy_from_slice(data);
        self.pos = end;
        Ok(data.len())
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let target: i64 = match pos {
            SeekFrom::Start(o) => o as i64,
            SeekFrom::Current(o) => self.pos as i64 + o,
            SeekFrom::End(o) => self.data.len() as i64 + o,
        };
        if target < 0 {
            return Err(Error::OutOfRange(0, self.data.len() as u64));
        }
        // Seeking past the end is permitted; a write there zero-fills,
        // a read reports eof.
        self.pos = target as usize;
        self.at_eof = false;
        Ok(self.pos as u64)
    }

    fn tell(&self) -> u64 {
        self.pos as u64
    }

    fn size(&self) -> Result<u64> {
        Ok(self.data.len() as u64)
    }

    fn eof(&self) -> bool {
        self.at_eof
    }

    fn replace_with(&mut self, data: &[u8]) -> Result<()> {
        self.data = data.to_vec();
        self.pos = 0;
        self.at_eof = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mem_io_read_write() {
        let mut io = MemIo::new();
        io.write(b"hello").unwrap();
        assert_eq!(io.tell(), 5);
        io.seek(SeekFrom::Start(0)).unwrap();
        let data = io.read_exact_vec(5).unwrap();
        assert_eq!(&data, b"hello");
        assert!(io.read_exact_vec(1).is_err());
    }

    #[test]
    fn mem_io_short_read_sets_eof() {
        let mut io = MemIo::from_vec(vec![1, 2, 3]);
        let mut buf = [0u8; 8];
        let n = io.read(&mut buf).unwrap();
        assert_eq!(n, 3);
        assert!(io.eof());
    }

    #[test]
    fn mem_io_write_past_end_zero_fills() {
        let mut io = MemIo::new();
        io.seek(SeekFrom::Start(4)).unwrap();
        io.write(b"x").unwrap();
        assert_eq!(io.as_slice(), &[0, 0, 0, 0, b'x']);
    }

    #[test]
    fn transfer_swaps_contents() {
        let mut dst = MemIo::from_vec(b"old contents".to_vec());
        let mut src = MemIo::from_vec(b"new".to_vec());
        dst.transfer(&mut src).unwrap();
        assert_eq!(dst.as_slice(), b"new");
    }

    #[test]
    fn file_io_replace_is_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.bin");
        std::fs::write(&path, b"original").unwrap();

        let mut io = FileIo::new(&path);
        io.open(OpenMode::Read).unwrap();
        assert_eq!(io.size().unwrap(), 8);

        io.replace_with(b"rewritten").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"rewritten");
        // temp file is gone
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn file_io_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("io.bin");
        std::fs::write(&path, b"0123456789").unwrap();

        let mut io = FileIo::new(&path);
        io.open(OpenMode::Read).unwrap();
        io.seek(SeekFrom::Start(3)).unwrap();
        assert_eq!(io.read_exact_vec(4).unwrap(), b"3456");
        assert_eq!(io.tell(), 7);
        io.close().unwrap();
    }
}
