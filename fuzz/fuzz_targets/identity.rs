#![no_main]
use gifstream::{logical_screen_descriptor, GifReader, GifWriter, ImageDescriptor, Version};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

/// Writes a single-image stream built from arbitrary pixel data, then reads
/// it back and asserts the decoded buffer matches what was written bit for
/// bit (testable property 2 from the format's write-then-read guarantee).
fuzz_target!(|data: (u8, u8, Vec<u8>)| {
    let (w, h, raw_pixels) = data;
    if w == 0 || h == 0 {
        return;
    }
    let (width, height) = (w as u16, h as u16);
    let len = width as usize * height as usize;
    if raw_pixels.is_empty() {
        return;
    }
    let pixels: Vec<u8> = (0..len).map(|i| raw_pixels[i % raw_pixels.len()]).collect();

    let mut writer = GifWriter::new(Vec::new());
    writer.write_header(Version::V89A).unwrap();
    writer
        .write_logical_screen_descriptor(&logical_screen_descriptor(width, height, None).unwrap())
        .unwrap();
    let descriptor = ImageDescriptor {
        left: 0,
        top: 0,
        width,
        height,
        interlaced: false,
        sorted: false,
        local_color_table_size: None,
    };
    writer.write_image_descriptor(&descriptor).unwrap();
    writer.write_image_data(&pixels).unwrap();
    writer.write_trailer().unwrap();
    let bytes = writer.close();

    let mut reader = GifReader::new(Cursor::new(bytes));
    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    reader.peek_part().unwrap();
    reader.read_image_descriptor().unwrap();
    let decoded = reader.read_image_data().unwrap();
    assert_eq!(decoded, pixels);
});
