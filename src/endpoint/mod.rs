//! Byte endpoints the drivers pull from and push to.

use std::io::Result;

mod io;
mod memory;

pub use self::{
    io::{IoReader, IoWriter},
    memory::{MemoryReader, MemoryWriter},
};

/// A byte source producing data on demand.
pub trait PullEndpoint {
    /// Advisory: `false` once the endpoint knows it has nothing left to produce.
    fn has_data_available(&self) -> bool;

    fn open(&mut self) -> Result<()>;

    /// Reads up to `buf.len()` bytes into `buf`, returning how many were read.
    ///
    /// `Ok(0)` for a non-empty `buf` means the endpoint is exhausted.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    fn close(&mut self);
}

/// A byte sink accepting data.
pub trait PushEndpoint {
    /// Advisory: `false` if a write would currently be rejected.
    fn has_space_available(&self) -> bool;

    fn open(&mut self) -> Result<()>;

    /// Writes all of `buf`, or fails.
    fn write(&mut self, buf: &[u8]) -> Result<()>;

    fn close(&mut self) -> Result<()>;
}

impl<T: PullEndpoint + ?Sized> PullEndpoint for &mut T {
    fn has_data_available(&self) -> bool {
        (**self).has_data_available()
    }

    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

impl<T: PushEndpoint + ?Sized> PushEndpoint for &mut T {
    fn has_space_available(&self) -> bool {
        (**self).has_space_available()
    }

    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write(buf)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

impl<T: PullEndpoint + ?Sized> PullEndpoint for Box<T> {
    fn has_data_available(&self) -> bool {
        (**self).has_data_available()
    }

    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

impl<T: PushEndpoint + ?Sized> PushEndpoint for Box<T> {
    fn has_space_available(&self) -> bool {
        (**self).has_space_available()
    }

    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write(buf)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}
