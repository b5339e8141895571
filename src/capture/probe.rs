use std::io::Cursor;

use image::ImageReader;
use serde::{Deserialize, Serialize};

use crate::error::{unsupported_format_error, Error};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Reads width and height from the raster header without decoding pixel data.
pub fn probe(bytes: &[u8]) -> Result<Dimensions, Error> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(unsupported_format_error)?;

    if reader.format().is_none() {
        return Err(unsupported_format_error("unrecognized raster signature"));
    }

    let (width, height) = reader.into_dimensions()?;

    Ok(Dimensions { width, height })
}

#[test]
fn probe_reads_png_header() {
    use crate::capture::testing::png;

    let dimensions = probe(&png(800, 600)).unwrap();
    assert_eq!(
        dimensions,
        Dimensions {
            width: 800,
            height: 600
        }
    );
}

#[test]
fn probe_reads_jpeg_header() {
    let mut bytes = Cursor::new(Vec::new());
    image::RgbImage::new(320, 200)
        .write_to(&mut bytes, image::ImageFormat::Jpeg)
        .unwrap();

    let dimensions = probe(bytes.get_ref()).unwrap();
    assert_eq!((dimensions.width, dimensions.height), (320, 200));
}

#[test]
fn probe_rejects_non_raster_bytes() {
    use crate::error::ErrorKind;

    let err = probe(b"<html><body>not an image</body></html>").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedFormat);

    let err = probe(&[]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedFormat);
}

#[test]
fn probe_rejects_truncated_png() {
    use crate::capture::testing::png;
    use crate::error::ErrorKind;

    let bytes = png(800, 600);
    let err = probe(&bytes[..12]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedFormat);
}
