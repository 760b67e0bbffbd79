//! Fixtures shared by the integration tests. The crate's own `jpeg_with_date`
//! is `#[cfg(test)]` and not visible from here.

/// JPEG with a single DateTimeOriginal in its Exif sub-IFD.
pub fn jpeg_with_date(stamp: &str) -> Vec<u8> {
    fn ifd(t: &mut Vec<u8>, tag: u16, typ: u16, count: u32, value: u32) {
        t.extend_from_slice(&1u16.to_be_bytes());
        t.extend_from_slice(&tag.to_be_bytes());
        t.extend_from_slice(&typ.to_be_bytes());
        t.extend_from_slice(&count.to_be_bytes());
        t.extend_from_slice(&value.to_be_bytes());
        t.extend_from_slice(&0u32.to_be_bytes());
    }

    let mut value = stamp.as_bytes().to_vec();
    value.push(0);

    let mut tiff = b"MM\x00\x2a\x00\x00\x00\x08".to_vec();
    ifd(&mut tiff, 0x8769, 4, 1, 26);
    ifd(&mut tiff, 0x9003, 2, value.len() as u32, 44);
    tiff.extend_from_slice(&value);

    let mut jpeg = vec![0xff, 0xd8, 0xff, 0xe1];
    jpeg.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    jpeg.extend_from_slice(b"Exif\x00\x00");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xff, 0xd9]);
    jpeg
}
