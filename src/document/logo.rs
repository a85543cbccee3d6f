//! Institution logo decoding.
//!
//! Logos arrive as `data:` URIs or as bytes fetched from a URL. Only JPEG
//! is embedded (PDF reads it natively through `DCTDecode`); anything else is
//! reported as unsupported and the header draws a placeholder box.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub width: u32,
    pub height: u32,
    /// 1 = gray, 3 = RGB, 4 = CMYK
    pub components: u8,
    pub data: Vec<u8>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LogoError {
    #[error("logo data URI is malformed")]
    MalformedDataUri,
    #[error("logo is not base64 encoded: {0}")]
    InvalidBase64(String),
    #[error("unsupported logo format")]
    UnsupportedFormat,
    #[error("JPEG header is truncated")]
    TruncatedJpeg,
}

pub fn is_data_uri(source: &str) -> bool {
    source.trim_start().starts_with("data:")
}

pub fn is_remote_url(source: &str) -> bool {
    let source = source.trim_start();
    source.starts_with("http://") || source.starts_with("https://")
}

pub fn decode_data_uri(source: &str) -> Result<Vec<u8>, LogoError> {
    let (header, payload) = source
        .trim()
        .split_once(',')
        .ok_or(LogoError::MalformedDataUri)?;
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(LogoError::MalformedDataUri);
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| LogoError::InvalidBase64(e.to_string()))
}

pub fn decode_logo(bytes: &[u8]) -> Result<EmbeddedImage, LogoError> {
    let (width, height, components) = jpeg_dimensions(bytes)?;
    Ok(EmbeddedImage {
        width,
        height,
        components,
        data: bytes.to_vec(),
    })
}

/// Reads width, height and component count from the first SOF segment.
fn jpeg_dimensions(bytes: &[u8]) -> Result<(u32, u32, u8), LogoError> {
    if bytes.len() < 4 || bytes[0] != 0xFF || bytes[1] != 0xD8 {
        return Err(LogoError::UnsupportedFormat);
    }
    let mut pos = 2;
    while pos + 1 < bytes.len() {
        if bytes[pos] != 0xFF {
            return Err(LogoError::TruncatedJpeg);
        }
        let marker = bytes[pos + 1];
        pos += 2;
        match marker {
            0xFF => {
                pos -= 1;
                continue;
            }
            0x01 | 0xD0..=0xD7 => continue,
            0xD9 | 0xDA => break,
            _ => {}
        }
        let length = read_u16(bytes, pos)? as usize;
        if matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF) {
            let height = read_u16(bytes, pos + 3)?;
            let width = read_u16(bytes, pos + 5)?;
            let components = *bytes.get(pos + 7).ok_or(LogoError::TruncatedJpeg)?;
            if width == 0 || height == 0 {
                return Err(LogoError::TruncatedJpeg);
            }
            return Ok((u32::from(width), u32::from(height), components));
        }
        pos += length;
    }
    Err(LogoError::TruncatedJpeg)
}

fn read_u16(bytes: &[u8], pos: usize) -> Result<u16, LogoError> {
    match bytes.get(pos..pos + 2) {
        Some([hi, lo]) => Ok(u16::from_be_bytes([*hi, *lo])),
        _ => Err(LogoError::TruncatedJpeg),
    }
}
