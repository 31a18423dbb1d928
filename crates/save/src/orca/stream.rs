//! One description of a chunk's layout serves both directions: chunk code
//! calls `rw_*` on a mutable field, the reader overwrites it and the writer
//! appends it.

use crate::byte_stream::ByteReader;
use crate::config::ORCA_MAX_STRING_LEN;
use crate::error::{TrackExportError, TrackImportError};

pub trait ChunkStream {
    type Error;

    fn is_reading(&self) -> bool;

    fn rw_u8(&mut self, value: &mut u8) -> Result<(), Self::Error>;
    fn rw_u16(&mut self, value: &mut u16) -> Result<(), Self::Error>;
    fn rw_u32(&mut self, value: &mut u32) -> Result<(), Self::Error>;
    fn rw_i32(&mut self, value: &mut i32) -> Result<(), Self::Error>;
    fn rw_i64(&mut self, value: &mut i64) -> Result<(), Self::Error>;
    fn rw_string(&mut self, value: &mut String) -> Result<(), Self::Error>;

    /// Element count of a list, bounded by `max` in both directions.
    fn rw_count(&mut self, len: usize, max: usize) -> Result<usize, Self::Error>;

    fn rw_i16(&mut self, value: &mut i16) -> Result<(), Self::Error> {
        let mut raw = *value as u16;
        self.rw_u16(&mut raw)?;
        *value = raw as i16;
        Ok(())
    }

    fn rw_bool(&mut self, value: &mut bool) -> Result<(), Self::Error> {
        let mut raw = u8::from(*value);
        self.rw_u8(&mut raw)?;
        *value = raw != 0;
        Ok(())
    }

    fn rw_vec<T, F>(&mut self, items: &mut Vec<T>, max: usize, mut rw_item: F) -> Result<(), Self::Error>
    where
        Self: Sized,
        T: Default,
        F: FnMut(&mut Self, &mut T) -> Result<(), Self::Error>,
    {
        let len = self.rw_count(items.len(), max)?;
        if self.is_reading() {
            items.clear();
            items.resize_with(len, T::default);
        }
        for item in items.iter_mut() {
            rw_item(self, item)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

pub struct OrcaReader<'a> {
    inner: ByteReader<'a>,
}

impl<'a> OrcaReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            inner: ByteReader::new(data),
        }
    }
}

impl ChunkStream for OrcaReader<'_> {
    type Error = TrackImportError;

    fn is_reading(&self) -> bool {
        true
    }

    fn rw_u8(&mut self, value: &mut u8) -> Result<(), TrackImportError> {
        *value = self.inner.read_u8()?;
        Ok(())
    }

    fn rw_u16(&mut self, value: &mut u16) -> Result<(), TrackImportError> {
        *value = self.inner.read_u16()?;
        Ok(())
    }

    fn rw_u32(&mut self, value: &mut u32) -> Result<(), TrackImportError> {
        *value = self.inner.read_u32()?;
        Ok(())
    }

    fn rw_i32(&mut self, value: &mut i32) -> Result<(), TrackImportError> {
        *value = self.inner.read_i32()?;
        Ok(())
    }

    fn rw_i64(&mut self, value: &mut i64) -> Result<(), TrackImportError> {
        *value = self.inner.read_i64()?;
        Ok(())
    }

    fn rw_string(&mut self, value: &mut String) -> Result<(), TrackImportError> {
        let len = self.inner.read_u16()? as usize;
        if len > ORCA_MAX_STRING_LEN {
            return Err(TrackImportError::InvalidString);
        }
        let bytes = self.inner.read_bytes(len)?;
        *value = std::str::from_utf8(bytes)
            .map_err(|_| TrackImportError::InvalidString)?
            .to_string();
        Ok(())
    }

    fn rw_count(&mut self, _len: usize, max: usize) -> Result<usize, TrackImportError> {
        let len = self.inner.read_u32()? as usize;
        if len > max {
            return Err(TrackImportError::TooManyElements);
        }
        Ok(len)
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct OrcaWriter {
    buf: Vec<u8>,
}

impl OrcaWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl ChunkStream for OrcaWriter {
    type Error = TrackExportError;

    fn is_reading(&self) -> bool {
        false
    }

    fn rw_u8(&mut self, value: &mut u8) -> Result<(), TrackExportError> {
        self.buf.push(*value);
        Ok(())
    }

    fn rw_u16(&mut self, value: &mut u16) -> Result<(), TrackExportError> {
        self.buf.extend_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn rw_u32(&mut self, value: &mut u32) -> Result<(), TrackExportError> {
        self.buf.extend_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn rw_i32(&mut self, value: &mut i32) -> Result<(), TrackExportError> {
        self.buf.extend_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn rw_i64(&mut self, value: &mut i64) -> Result<(), TrackExportError> {
        self.buf.extend_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn rw_string(&mut self, value: &mut String) -> Result<(), TrackExportError> {
        let len = value.len();
        if len > ORCA_MAX_STRING_LEN {
            return Err(TrackExportError::StringTooLong(len));
        }
        self.buf.extend_from_slice(&(len as u16).to_le_bytes());
        self.buf.extend_from_slice(value.as_bytes());
        Ok(())
    }

    fn rw_count(&mut self, len: usize, max: usize) -> Result<usize, TrackExportError> {
        if len > max {
            return Err(TrackExportError::TooManyElements);
        }
        self.buf.extend_from_slice(&(len as u32).to_le_bytes());
        Ok(len)
    }
}
