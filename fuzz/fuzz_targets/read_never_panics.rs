#![no_main]
use gifstream::{GifReader, Part};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

/// Drives a reader over arbitrary bytes, pulling whatever part comes next
/// until the stream errors, ends, or the walk runs long enough that a cycle
/// would indicate a stuck phase.
fuzz_target!(|data: &[u8]| {
    let mut reader = GifReader::new(Cursor::new(data));
    if reader.read_header().is_err() {
        return;
    }
    if reader.read_logical_screen_descriptor().is_err() {
        return;
    }

    for _ in 0..10_000 {
        let part = match reader.peek_part() {
            Ok(part) => part,
            Err(_) => return,
        };
        let result = match part {
            Part::ColorTable => reader.read_color_table().map(|_| ()),
            Part::ExtensionLabel => reader.read_extension_label().and_then(|label| {
                use gifstream::ExtensionLabel::*;
                match label {
                    GraphicControl => reader.read_graphic_control_extension().map(|_| ()),
                    PlainText => reader.read_plain_text_extension().map(|_| ()),
                    Application => reader.read_application_extension().map(|_| ()),
                    Comment | Unknown(_) => Ok(()),
                }
            }),
            Part::ImageDescriptor => reader.read_image_descriptor().map(|_| ()),
            Part::ImageData => reader.read_image_data().map(|_| ()),
            Part::SubBlock => loop {
                match reader.read_subblock() {
                    Ok(Some(_)) => continue,
                    Ok(None) => break Ok(()),
                    Err(e) => break Err(e),
                }
            },
            Part::Trailer => return,
            Part::LogicalScreenDescriptor => unreachable!(),
        };
        if result.is_err() {
            return;
        }
    }
});
