//! Multipart frame delimiting
//!
//! Live streams and recording files share one boundary framing: each unit is
//! `--frame\r\nContent-Type: <mime>\r\n\r\n` followed by the encoded image
//! bytes and a trailing `\r\n`. A consumer splitting on the boundary line
//! recovers exactly one complete image per unit, with no external index.

use bytes::{BufMut, Bytes, BytesMut};

use crate::capture::{EncodedFrame, ImageFormat};

/// Multipart boundary token (without the leading dashes)
pub const BOUNDARY: &str = "frame";

/// `Content-Type` header value for a live multipart stream
pub fn stream_content_type() -> String {
    format!("multipart/x-mixed-replace; boundary={}", BOUNDARY)
}

/// Wrap one encoded frame in the boundary framing
pub fn encode_part(format: ImageFormat, data: &[u8]) -> Bytes {
    let header = format!("--{}\r\nContent-Type: {}\r\n\r\n", BOUNDARY, format.mime());

    let mut part = BytesMut::with_capacity(header.len() + data.len() + 2);
    part.put_slice(header.as_bytes());
    part.put_slice(data);
    part.put_slice(b"\r\n");
    part.freeze()
}

/// Wrap an already-encoded frame
pub fn encode_frame(frame: &EncodedFrame) -> Bytes {
    encode_part(frame.format, &frame.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_framing() {
        let payload = b"\x89PNG-not-really";
        let part = encode_part(ImageFormat::Png, payload);

        let header_end = b"\r\n\r\n";
        let pos = part
            .windows(header_end.len())
            .position(|w| w == header_end)
            .expect("header terminator present");

        let header = std::str::from_utf8(&part[..pos]).unwrap();
        assert!(header.starts_with("--frame\r\n"));
        assert!(header.contains("Content-Type: image/png"));

        let body = &part[pos + header_end.len()..];
        assert_eq!(&body[..payload.len()], payload);
        assert_eq!(&body[payload.len()..], b"\r\n");
    }

    #[test]
    fn test_jpeg_content_type() {
        let part = encode_part(ImageFormat::Jpeg, b"jpg");
        let text = String::from_utf8_lossy(&part);

        assert!(text.contains("Content-Type: image/jpeg"));
    }

    #[test]
    fn test_units_split_on_boundary() {
        // Concatenated units must split back into one image per unit.
        let mut stream = BytesMut::new();
        for payload in [b"one".as_slice(), b"two".as_slice(), b"three".as_slice()] {
            stream.put_slice(&encode_part(ImageFormat::Png, payload));
        }

        let text = stream.freeze();
        let marker = format!("--{}\r\n", BOUNDARY);
        let count = text
            .windows(marker.len())
            .filter(|w| *w == marker.as_bytes())
            .count();

        assert_eq!(count, 3);
    }
}
