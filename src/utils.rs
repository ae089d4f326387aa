use crate::error::{from_io, Error};
use std::io::Read;

/// Reads a single byte, mapping EOF to `Error::Truncated`.
pub(crate) fn read_u8(src: &mut impl Read, context: &'static str) -> Result<u8, Error> {
    let mut byte = [0u8; 1];
    src.read_exact(&mut byte).map_err(|e| from_io(e, context))?;
    Ok(byte[0])
}

/// Reads `n` bytes into a fixed-size array known at compile time.
macro_rules! read_stack {
    ($src:expr, $n:expr, $ctx:expr) => {{
        let mut bytes = [0u8; $n];
        $src.read_exact(&mut bytes).map_err(|e| crate::error::from_io(e, $ctx)).map(|_| bytes)
    }};
}

pub(crate) use read_stack;

/// Reads `n` bytes onto the heap; `n` is only known at runtime.
pub(crate) fn read_heap(src: &mut impl Read, n: usize, context: &'static str) -> Result<Vec<u8>, Error> {
    let mut bytes = vec![0u8; n];
    src.read_exact(&mut bytes).map_err(|e| from_io(e, context))?;
    Ok(bytes)
}
