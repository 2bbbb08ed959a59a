use bincode::{
    config,
    serde::{decode_from_slice, encode_to_vec},
};
use serde::{Serialize, de::DeserializeOwned};
use std::io::{self, Read, Write};

/// Largest payload either side will read or write. Real frames are a few
/// dozen bytes; anything near this is a broken or hostile peer.
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// Read one frame: a big-endian `u32` length followed by that many bytes
/// of bincode.
pub fn read_prefixed<T: DeserializeOwned, R: Read>(reader: &mut R) -> io::Result<T> {
    let mut len_bytes = [0; 4];
    reader.read_exact(&mut len_bytes)?;
    let len = u32::from_be_bytes(len_bytes) as usize;

    // Refuse before allocating anything for it.
    if len > MAX_MESSAGE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("message size {len} exceeds maximum allowed size of {MAX_MESSAGE_SIZE} bytes"),
        ));
    }

    let mut buf = vec![0; len];
    reader.read_exact(&mut buf)?;

    decode_from_slice(&buf, config::standard())
        .map(|(value, _)| value)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error.to_string()))
}

/// Write one frame in a single `write_all` so the reader never sees a
/// length without its payload.
pub fn write_prefixed<T: Serialize, W: Write>(writer: &mut W, value: &T) -> io::Result<()> {
    let serialized = encode_to_vec(value, config::standard())
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error.to_string()))?;
    if serialized.len() > MAX_MESSAGE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "serialized message size {} exceeds maximum allowed size of {MAX_MESSAGE_SIZE} bytes",
                serialized.len()
            ),
        ));
    }

    let size = serialized.len() as u32;
    let mut buf = Vec::from(size.to_be_bytes());
    buf.extend(serialized);
    writer.write_all(&buf)
}
