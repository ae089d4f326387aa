use criterion::{criterion_group, criterion_main, BatchSize::SmallInput, Criterion};
use gifstream::{logical_screen_descriptor, Color, ColorTable, GifReader, GifWriter, ImageDescriptor, Version};
use std::io::Cursor;

fn sample_pixels(width: u16, height: u16) -> Vec<u8> {
    (0..width as usize * height as usize).map(|i| (i % 16) as u8).collect()
}

fn sample_bytes(width: u16, height: u16, pixels: &[u8]) -> Vec<u8> {
    let mut writer = GifWriter::new(Vec::new());
    writer.write_header(Version::V89A).unwrap();
    writer
        .write_logical_screen_descriptor(&logical_screen_descriptor(width, height, Some(16)).unwrap())
        .unwrap();
    let table = ColorTable((0..16).map(|i| Color { r: i, g: i, b: i }).collect());
    writer.write_color_table(&table).unwrap();
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
    writer.write_image_data(pixels).unwrap();
    writer.write_trailer().unwrap();
    writer.close()
}

pub fn read(c: &mut Criterion) {
    let pixels = sample_pixels(256, 256);
    let bytes = sample_bytes(256, 256, &pixels);
    c.bench_function("gif read", |b| {
        b.iter_batched(
            || Cursor::new(&bytes[..]),
            |mut src| {
                let mut reader = GifReader::new(&mut src);
                reader.read_header().unwrap();
                reader.read_logical_screen_descriptor().unwrap();
                reader.read_color_table().unwrap();
                reader.peek_part().unwrap();
                reader.read_image_descriptor().unwrap();
                reader.read_image_data().unwrap()
            },
            SmallInput,
        )
    });
}

pub fn write(c: &mut Criterion) {
    let pixels = sample_pixels(256, 256);
    c.bench_function("gif write", |b| {
        b.iter_batched(
            Vec::new,
            |dest| {
                let mut writer = GifWriter::new(dest);
                writer.write_header(Version::V89A).unwrap();
                writer
                    .write_logical_screen_descriptor(&logical_screen_descriptor(256, 256, Some(16)).unwrap())
                    .unwrap();
                let table = ColorTable((0..16).map(|i| Color { r: i, g: i, b: i }).collect());
                writer.write_color_table(&table).unwrap();
                let descriptor = ImageDescriptor {
                    left: 0,
                    top: 0,
                    width: 256,
                    height: 256,
                    interlaced: false,
                    sorted: false,
                    local_color_table_size: None,
                };
                writer.write_image_descriptor(&descriptor).unwrap();
                writer.write_image_data(&pixels).unwrap();
                writer.write_trailer().unwrap();
            },
            SmallInput,
        )
    });
}

criterion_group!(gif, read, write);
criterion_main!(gif);
