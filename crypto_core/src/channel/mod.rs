//! Point-to-point byte channels between the two parties.
//!
//! Every implementation is reliable and FIFO in each direction; reads block
//! until the requested bytes arrive. A closed peer surfaces as an
//! `std::io::Error` instead of blocking forever.

pub mod local_channel;
pub mod net_channel;

pub use local_channel::*;
pub use net_channel::*;

use std::io::{Error, ErrorKind, Read, Result, Write};

use num_bigint::BigUint;

use crate::utils::{pack_bits, unpack_bits};
use crate::Key;

/// Upper bound on a single length-prefixed message.
pub const MAX_VAR_BYTES: usize = 1 << 24;

/// A trait for I/O channel.
pub trait AbstractChannel {
    /// Write bytes slice to the channel.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;
    /// Read bytes slice from the channel.
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()>;
    /// Flush the channel.
    fn flush(&mut self) -> Result<()>;

    /// Write a `bool` to the channel.
    #[inline(always)]
    fn write_bool(&mut self, b: bool) -> Result<()> {
        self.write_bytes(&[b as u8])
    }

    /// Read a 'bool' from the channel.
    #[inline(always)]
    fn read_bool(&mut self) -> Result<bool> {
        let mut data = [0u8; 1];
        self.read_bytes(&mut data)?;
        Ok(data[0] != 0)
    }

    /// Write a slice of `bool`s packed eight to a byte.
    fn write_bools(&mut self, bits: &[bool]) -> Result<()> {
        self.write_bytes(&pack_bits(bits))
    }

    /// Read `n` packed `bool`s.
    fn read_bools(&mut self, n: usize) -> Result<Vec<bool>> {
        let mut bytes = vec![0u8; (n + 7) / 8];
        self.read_bytes(&mut bytes)?;
        Ok(unpack_bits(&bytes, n))
    }

    #[inline(always)]
    fn write_u32(&mut self, x: u32) -> Result<()> {
        self.write_bytes(&x.to_le_bytes())
    }

    #[inline(always)]
    fn read_u32(&mut self) -> Result<u32> {
        let mut data = [0u8; 4];
        self.read_bytes(&mut data)?;
        Ok(u32::from_le_bytes(data))
    }

    /// Write a `usize` as 8 little-endian bytes.
    #[inline(always)]
    fn write_usize(&mut self, x: usize) -> Result<()> {
        self.write_bytes(&(x as u64).to_le_bytes())
    }

    #[inline(always)]
    fn read_usize(&mut self) -> Result<usize> {
        let mut data = [0u8; 8];
        self.read_bytes(&mut data)?;
        usize::try_from(u64::from_le_bytes(data))
            .map_err(|_| Error::new(ErrorKind::InvalidData, "usize out of range"))
    }

    /// Write a `u32` length prefix followed by `bytes`.
    fn write_var_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > MAX_VAR_BYTES {
            return Err(Error::new(ErrorKind::InvalidInput, "message too long"));
        }
        self.write_u32(bytes.len() as u32)?;
        self.write_bytes(bytes)
    }

    /// Read a message written by `write_var_bytes`.
    fn read_var_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_u32()? as usize;
        if len > MAX_VAR_BYTES {
            return Err(Error::new(ErrorKind::InvalidData, "message too long"));
        }
        let mut bytes = vec![0u8; len];
        self.read_bytes(&mut bytes)?;
        Ok(bytes)
    }

    /// Write a `Key`; the width is implied by the protocol and not sent.
    #[inline(always)]
    fn write_key(&mut self, key: &Key) -> Result<()> {
        self.write_bytes(key.as_bytes())
    }

    /// Read a `Key` of width `bits`.
    #[inline(always)]
    fn read_key(&mut self, bits: usize) -> Result<Key> {
        let mut bytes = vec![0u8; crate::key::byte_len(bits)];
        self.read_bytes(&mut bytes)?;
        Ok(Key::from_bytes(bits, &bytes))
    }

    /// Write a big integer, little-endian and length-prefixed.
    fn write_biguint(&mut self, x: &BigUint) -> Result<()> {
        self.write_var_bytes(&x.to_bytes_le())
    }

    fn read_biguint(&mut self) -> Result<BigUint> {
        let bytes = self.read_var_bytes()?;
        Ok(BigUint::from_bytes_le(&bytes))
    }
}

/// A standard channel over a separate reader and writer.
pub struct StdChannel<R, W> {
    reader: R,
    writer: W,

    read_bytes: usize,
    write_bytes: usize,
}

impl<R: Read, W: Write> StdChannel<R, W> {
    /// New a `StdChannel`
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            read_bytes: 0,
            write_bytes: 0,
        }
    }

    /// Total bytes written so far.
    pub fn bytes_written(&self) -> usize {
        self.write_bytes
    }

    /// Total bytes read so far.
    pub fn bytes_read(&self) -> usize {
        self.read_bytes
    }
}

impl<R: Read, W: Write> AbstractChannel for StdChannel<R, W> {
    #[inline(always)]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.write_bytes += bytes.len();
        Ok(())
    }

    #[inline(always)]
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()> {
        self.reader.read_exact(bytes)?;
        self.read_bytes += bytes.len();
        Ok(())
    }

    #[inline(always)]
    fn flush(&mut self) -> Result<()> {
        self.writer.flush()
    }
}
