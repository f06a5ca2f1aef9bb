//! Read and write vectors of fixed-width integers as little-endian bytes.
//!
//! The evaluation tables are persisted as flat arrays of `u32` and `i16`
//! entries, so the encoding must be stable across platforms.

use std::fs::File;
use std::io::prelude::*;
use std::io::{Error, ErrorKind, Result};

/// A fixed-width integer with an explicit little-endian byte layout.
pub trait LeBytes: Copy {
    /// Encoded width in bytes.
    const WIDTH: usize;
    fn put_le(self, out: &mut [u8]);
    fn get_le(src: &[u8]) -> Self;
}

macro_rules! impl_le_bytes {
    ($($t:ty),*) => {
        $(impl LeBytes for $t {
            const WIDTH: usize = std::mem::size_of::<$t>();
            fn put_le(self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_le_bytes());
            }
            fn get_le(src: &[u8]) -> Self {
                <$t>::from_le_bytes(src.try_into().unwrap())
            }
        })*
    };
}

impl_le_bytes!(u16, i16, u32);

/// Extends [`File`] with typed vector reads and writes.
pub trait VecIO {
    fn write_vec_to_file<T: LeBytes>(&mut self, data: &[T]) -> Result<()>;
    fn read_vec_from_file<T: LeBytes>(&mut self, len: usize) -> Result<Vec<T>>;
}

impl VecIO for File {
    /// Writes a slice of `T` as consecutive little-endian values.
    fn write_vec_to_file<T: LeBytes>(&mut self, data: &[T]) -> Result<()> {
        let mut buf = vec![0u8; data.len() * T::WIDTH];
        for (v, chunk) in data.iter().zip(buf.chunks_exact_mut(T::WIDTH)) {
            v.put_le(chunk);
        }
        self.write_all(&buf)
    }

    /// Reads exactly `len` little-endian values of `T`.
    fn read_vec_from_file<T: LeBytes>(&mut self, len: usize) -> Result<Vec<T>> {
        let mut buf = vec![0u8; len * T::WIDTH];
        self.read_exact(&mut buf).map_err(|e| {
            Error::new(
                ErrorKind::UnexpectedEof,
                format!("short read, wanted {} entries of {} bytes: {}", len, T::WIDTH, e),
            )
        })?;
        Ok(buf.chunks_exact(T::WIDTH).map(T::get_le).collect())
    }
}
