//! Length-prefixed array framing
//!
//! Every variable-length section of the wire format is framed with a
//! big-endian `u16` prefix. A blob frame counts bytes; a list frame counts
//! elements, and each element is expected to be self-delimiting. Contract
//! sections use both levels: an outer blob around a list whose elements are
//! themselves blob frames.

use crate::error::{ContractError, Result};
use byteorder::{BigEndian, ByteOrder};

/// Size of every length or count prefix
pub const PREFIX_LEN: usize = 2;

/// Convert a length or count to its `u16` prefix
pub(crate) fn prefix_for(len: usize, field: &str) -> Result<u16> {
    u16::try_from(len).map_err(|_| {
        ContractError::invalid_value(field, format!("{len} does not fit a 16-bit prefix"))
    })
}

pub(crate) fn put_u16(buf: &mut Vec<u8>, value: u16) {
    let mut prefix = [0u8; PREFIX_LEN];
    BigEndian::write_u16(&mut prefix, value);
    buf.extend_from_slice(&prefix);
}

/// Borrow `len` bytes at `offset`, or report how far short the buffer is
pub(crate) fn take(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let available = bytes.len().saturating_sub(offset);
    if len > available {
        return Err(ContractError::TruncatedInput {
            offset,
            needed: len,
            available,
        });
    }
    Ok(&bytes[offset..offset + len])
}

/// Read a big-endian `u16` at `offset`
pub fn read_u16(bytes: &[u8], offset: usize) -> Result<u16> {
    take(bytes, offset, PREFIX_LEN).map(BigEndian::read_u16)
}

/// Prefix a single blob with its byte length
pub fn frame_blob(bytes: &[u8]) -> Result<Vec<u8>> {
    let len = prefix_for(bytes.len(), "blob length")?;
    let mut buf = Vec::with_capacity(PREFIX_LEN + bytes.len());
    put_u16(&mut buf, len);
    buf.extend_from_slice(bytes);
    Ok(buf)
}

/// Prefix a list with its element count and concatenate the elements raw.
///
/// Elements are not framed here; callers that need self-delimiting elements
/// pass already-framed bytes or use [`frame_blobs`].
pub fn frame_list<T: AsRef<[u8]>>(items: &[T]) -> Result<Vec<u8>> {
    let count = prefix_for(items.len(), "list count")?;
    let body_len: usize = items.iter().map(|item| item.as_ref().len()).sum();
    let mut buf = Vec::with_capacity(PREFIX_LEN + body_len);
    put_u16(&mut buf, count);
    for item in items {
        buf.extend_from_slice(item.as_ref());
    }
    Ok(buf)
}

/// Frame each element as a blob, then count-prefix the list
pub fn frame_blobs<T: AsRef<[u8]>>(items: &[T]) -> Result<Vec<u8>> {
    let framed = items
        .iter()
        .map(|item| frame_blob(item.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    frame_list(&framed)
}

/// Read a blob frame at `offset`, returning its body and the offset just past it
pub fn parse_blob(bytes: &[u8], offset: usize) -> Result<(&[u8], usize)> {
    let len = read_u16(bytes, offset)? as usize;
    let start = offset + PREFIX_LEN;
    let body = take(bytes, start, len)?;
    Ok((body, start + len))
}

/// Read a list frame whose elements are blob frames
pub fn parse_list(bytes: &[u8], offset: usize) -> Result<(Vec<&[u8]>, usize)> {
    let count = read_u16(bytes, offset)? as usize;
    let mut pos = offset + PREFIX_LEN;

    // Each element needs at least its own prefix
    let available = bytes.len().saturating_sub(pos);
    if count * PREFIX_LEN > available {
        return Err(ContractError::TruncatedInput {
            offset: pos,
            needed: count * PREFIX_LEN,
            available,
        });
    }

    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        let (item, next) = parse_blob(bytes, pos)?;
        items.push(item);
        pos = next;
    }
    Ok((items, pos))
}
