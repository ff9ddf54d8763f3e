use byteorder::{ByteOrder, LittleEndian};

use crate::error::SampQueryError;

/// Borrow `wanted` bytes at index `offset` from `data`.
///
/// Mutates `offset` to the index after the bytes. Fails without
/// moving `offset` if `data` is too short.
pub fn get_bytes<'a>(data: &'a [u8], offset: &mut usize, wanted: usize) -> Result<&'a [u8], SampQueryError> {
    let start: usize = *offset;
    let end: usize = start
        .checked_add(wanted)
        .filter(|end| *end <= data.len())
        .ok_or(SampQueryError::UnexpectedEnd {
            offset: start,
            wanted,
            len: data.len(),
        })?;
    *offset = end;
    Ok(&data[start..end])
}

/// Get the [u8] at index `offset` from `data`.
///
/// Mutates `offset` to the index after the byte.
pub fn get_u8(data: &[u8], offset: &mut usize) -> Result<u8, SampQueryError> {
    Ok(get_bytes(data, offset, 1)?[0])
}

/// Get 2 little-endian bytes (as a [u16]) at index `offset` from `data`.
///
/// Mutates `offset` to the index after the bytes.
pub fn get_u16(data: &[u8], offset: &mut usize) -> Result<u16, SampQueryError> {
    Ok(LittleEndian::read_u16(get_bytes(data, offset, 2)?))
}

/// Get 4 little-endian bytes (as an [i32]) at index `offset` from `data`.
///
/// Mutates `offset` to the index after the bytes.
pub fn get_i32(data: &[u8], offset: &mut usize) -> Result<i32, SampQueryError> {
    Ok(LittleEndian::read_i32(get_bytes(data, offset, 4)?))
}

/// Get a string prefixed by a single length byte at index `offset` in `data`.
///
/// Mutates `offset` to the index after the last string byte.
pub fn get_string(data: &[u8], offset: &mut usize) -> Result<String, SampQueryError> {
    let start: usize = *offset;
    let len: usize = get_u8(data, offset)? as usize;
    match get_bytes(data, offset, len) {
        Ok(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        Err(e) => {
            *offset = start;
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_values() {
        let data = [0x05, 0x20, 0x00, 0xFE, 0xFF, 0xFF, 0xFF];
        let mut offset = 0;
        assert_eq!(get_u8(&data, &mut offset).unwrap(), 5);
        assert_eq!(get_u16(&data, &mut offset).unwrap(), 32);
        assert_eq!(get_i32(&data, &mut offset).unwrap(), -2);
        assert_eq!(offset, data.len());
    }

    #[test]
    fn reads_length_prefixed_string() {
        let data = b"\x04nick\x00";
        let mut offset = 0;
        assert_eq!(get_string(data, &mut offset).unwrap(), "nick");
        assert_eq!(offset, 5);
        assert_eq!(get_string(data, &mut offset).unwrap(), "");
        assert_eq!(offset, 6);
    }

    #[test]
    fn string_longer_than_buffer_is_rejected() {
        let data = b"\x09short";
        let mut offset = 0;
        let err = get_string(data, &mut offset).unwrap_err();
        assert!(matches!(
            err,
            SampQueryError::UnexpectedEnd { offset: 1, wanted: 9, len: 6 }
        ));
        assert_eq!(offset, 0);
    }

    #[test]
    fn short_integer_does_not_advance() {
        let data = [0x01, 0x02, 0x03];
        let mut offset = 1;
        assert!(get_i32(&data, &mut offset).unwrap_err().is_malformed());
        assert_eq!(offset, 1);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let data = [0x02, 0xFF, b'a'];
        let mut offset = 0;
        assert_eq!(get_string(&data, &mut offset).unwrap(), "\u{FFFD}a");
    }
}
