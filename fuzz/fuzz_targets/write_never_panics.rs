#![no_main]
use gifstream::{logical_screen_descriptor, GifWriter, ImageDescriptor, Version};
use libfuzzer_sys::fuzz_target;
use std::io::sink;

/// Drives a writer through a minimal single-image stream built from
/// arbitrary dimensions and pixel data; every rejected combination must
/// surface as an `Err`, never a panic.
fuzz_target!(|data: (u8, u8, Vec<u8>)| {
    let (w, h, pixels) = data;
    let (width, height) = (w as u16, h as u16);

    let mut writer = GifWriter::new(sink());
    if writer.write_header(Version::V89A).is_err() {
        return;
    }
    let lsd = match logical_screen_descriptor(width, height, None) {
        Ok(lsd) => lsd,
        Err(_) => return,
    };
    if writer.write_logical_screen_descriptor(&lsd).is_err() {
        return;
    }
    let descriptor = ImageDescriptor {
        left: 0,
        top: 0,
        width,
        height,
        interlaced: false,
        sorted: false,
        local_color_table_size: None,
    };
    if writer.write_image_descriptor(&descriptor).is_err() {
        return;
    }
    let _ = writer.write_image_data(&pixels);
});
