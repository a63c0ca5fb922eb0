//! Frame codec
//!
//! Length-prefixed UTF-8 frames shared by the server connection handler and
//! the client.

use std::io::{Read, Write};

use crate::error::{Result, StrataError};

/// Header size: 4-byte big-endian payload length
pub const FRAME_HEADER_SIZE: usize = 4;

/// Maximum frame payload (1 MB)
pub const MAX_FRAME_SIZE: u32 = 1024 * 1024;

/// Read one complete frame from a stream.
///
/// Blocks until the frame is fully received or an error occurs.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<String> {
    let mut header = [0u8; FRAME_HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = u32::from_be_bytes(header);
    if payload_len > MAX_FRAME_SIZE {
        return Err(StrataError::Protocol(format!(
            "frame too large: {payload_len} bytes (max {MAX_FRAME_SIZE})"
        )));
    }

    let mut payload = vec![0u8; payload_len as usize];
    if payload_len > 0 {
        reader.read_exact(&mut payload)?;
    }

    String::from_utf8(payload)
        .map_err(|e| StrataError::Protocol(format!("frame is not valid UTF-8: {e}")))
}

/// Write one frame to a stream and flush it
pub fn write_frame<W: Write>(writer: &mut W, text: &str) -> Result<()> {
    if text.len() as u64 > MAX_FRAME_SIZE as u64 {
        return Err(StrataError::Protocol(format!(
            "frame too large: {} bytes (max {MAX_FRAME_SIZE})",
            text.len()
        )));
    }

    writer.write_all(&(text.len() as u32).to_be_bytes())?;
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}
