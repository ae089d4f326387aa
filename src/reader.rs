//! Pull-style reader over a GIF byte stream.
//!
//! Operations are only legal in the phase documented on each method; calling
//! one from the wrong phase returns `Error::InvalidState` and leaves the
//! reader's phase untouched. Any I/O or parse failure is sticky: the reader
//! moves to `Phase::Error` and every later call fails with `InvalidState`.

use crate::color::{count_for_packed_size, ColorTable};
use crate::error::Error;
use crate::lzw;
use crate::netscape::NetscapeSubBlock;
use crate::records::{
    ApplicationExtension, ExtensionLabel, GraphicControlExtension, ImageDescriptor, LogicalScreenDescriptor,
    PlainTextExtension,
};
use crate::utils::{read_heap, read_stack, read_u8};
use crate::version::Version;
use log::{debug, info, trace};
use std::io::Read;

const SIGNATURE: &[u8; 3] = b"GIF";

/// What the caller must do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    LogicalScreenDescriptor,
    ColorTable,
    ExtensionLabel,
    ImageDescriptor,
    ImageData,
    SubBlock,
    Trailer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Header,
    LogicalScreen,
    GlobalColorTable(u8),
    AwaitingBlockLabel,
    ExtensionLabel,
    BlockBody(ExtensionLabel),
    SubblockStream(ExtensionLabel),
    ImageDescriptorPending,
    LocalColorTable(u8),
    ImageData(u16, u16),
    Done,
    Error,
}

/// A GIF reader driven one part at a time over any `Read` stream.
pub struct GifReader<R: Read> {
    src: R,
    phase: Phase,
    version: Version,
    pending_image_dims: Option<(u16, u16)>,
}

impl<R: Read> GifReader<R> {
    pub fn new(src: R) -> Self {
        GifReader { src, phase: Phase::Header, version: Version::V87A, pending_image_dims: None }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Releases the underlying stream, whatever phase the reader is in.
    pub fn close(self) -> R {
        self.src
    }

    fn fail(&mut self, err: Error) -> Error {
        if err.is_sticky() {
            self.phase = Phase::Error;
        }
        err
    }

    /// Reads the six-byte header. Legal in `Header`.
    pub fn read_header(&mut self) -> Result<Version, Error> {
        if self.phase != Phase::Header {
            return Err(Error::invalid_state("read_header is only legal before any bytes have been read"));
        }
        let bytes = read_stack!(self.src, 6, "gif header").map_err(|e| self.fail(e))?;
        if &bytes[0..3] != SIGNATURE {
            return Err(self.fail(Error::malformed("missing GIF signature")));
        }
        let mut version_bytes = [0u8; 3];
        version_bytes.copy_from_slice(&bytes[3..6]);
        let version = Version::parse(version_bytes).map_err(|e| self.fail(e))?;
        debug!("parsed gif header, version {:?}", version);
        self.version = version;
        self.phase = Phase::LogicalScreen;
        Ok(version)
    }

    /// Reads the logical screen descriptor. Legal in `LogicalScreen`.
    pub fn read_logical_screen_descriptor(&mut self) -> Result<LogicalScreenDescriptor, Error> {
        if self.phase != Phase::LogicalScreen {
            return Err(Error::invalid_state("read_logical_screen_descriptor requires the header to have been read"));
        }
        let bytes = read_stack!(self.src, 7, "logical screen descriptor").map_err(|e| self.fail(e))?;
        let descriptor = LogicalScreenDescriptor::parse(bytes, self.version).map_err(|e| self.fail(e))?;
        self.phase = match descriptor.global_color_table_size {
            Some(size) => Phase::GlobalColorTable(size),
            None => Phase::AwaitingBlockLabel,
        };
        Ok(descriptor)
    }

    /// Reads a color table. Legal right after a descriptor declared one.
    pub fn read_color_table(&mut self) -> Result<ColorTable, Error> {
        let size = match self.phase {
            Phase::GlobalColorTable(size) => size,
            Phase::LocalColorTable(size) => size,
            _ => return Err(Error::invalid_state("read_color_table requires a pending color table")),
        };
        let count = count_for_packed_size(size);
        let bytes = read_heap(&mut self.src, count * 3, "color table").map_err(|e| self.fail(e))?;
        self.phase = match self.phase {
            Phase::GlobalColorTable(_) => Phase::AwaitingBlockLabel,
            Phase::LocalColorTable(_) => {
                let (w, h) = self.pending_image_dims.take().expect("local color table without pending image");
                Phase::ImageData(w, h)
            }
            _ => unreachable!(),
        };
        Ok(ColorTable::from_bytes(&bytes))
    }

    /// Disambiguates the next block. Legal whenever `AwaitingBlockLabel`.
    pub fn peek_part(&mut self) -> Result<Part, Error> {
        match self.phase {
            Phase::Header => Ok(Part::LogicalScreenDescriptor),
            Phase::LogicalScreen => Ok(Part::LogicalScreenDescriptor),
            Phase::GlobalColorTable(_) | Phase::LocalColorTable(_) => Ok(Part::ColorTable),
            Phase::ImageData(_, _) => Ok(Part::ImageData),
            Phase::BlockBody(_) | Phase::SubblockStream(_) => Ok(Part::SubBlock),
            Phase::Done => Ok(Part::Trailer),
            Phase::Error => Err(Error::invalid_state("reader is in the error phase")),
            Phase::AwaitingBlockLabel => {
                let byte = read_u8(&mut self.src, "block label").map_err(|e| self.fail(e))?;
                match byte {
                    0x21 => {
                        self.phase = Phase::ExtensionLabel;
                        Ok(Part::ExtensionLabel)
                    }
                    0x2C => {
                        self.phase = Phase::ImageDescriptorPending;
                        Ok(Part::ImageDescriptor)
                    }
                    0x3B => {
                        info!("reached gif trailer");
                        self.phase = Phase::Done;
                        Ok(Part::Trailer)
                    }
                    other => Err(self.fail(Error::malformed(format!("unknown block introducer {other:#04X}")))),
                }
            }
            Phase::ExtensionLabel => Ok(Part::ExtensionLabel),
            Phase::ImageDescriptorPending => Ok(Part::ImageDescriptor),
        }
    }

    /// Reads the extension label byte. Legal in `ExtensionLabel`.
    pub fn read_extension_label(&mut self) -> Result<ExtensionLabel, Error> {
        if self.phase != Phase::ExtensionLabel {
            return Err(Error::invalid_state("read_extension_label requires peek_part to have returned ExtensionLabel"));
        }
        let byte = read_u8(&mut self.src, "extension label").map_err(|e| self.fail(e))?;
        let label = ExtensionLabel::from_byte(byte, self.version).map_err(|e| self.fail(e))?;
        self.phase = Phase::BlockBody(label);
        Ok(label)
    }

    /// Reads the graphic control extension's fixed sub-block and terminator.
    /// Legal in `BlockBody(GraphicControl)`.
    pub fn read_graphic_control_extension(&mut self) -> Result<GraphicControlExtension, Error> {
        match self.phase {
            Phase::BlockBody(ExtensionLabel::GraphicControl) => {}
            _ => return Err(Error::invalid_state("read_graphic_control_extension requires a pending graphic control block")),
        }
        if self.version < Version::V89A {
            return Err(self.fail(Error::malformed("graphic control extensions require version 89a")));
        }
        let size = read_u8(&mut self.src, "graphic control block size").map_err(|e| self.fail(e))?;
        if size != 4 {
            return Err(self.fail(Error::malformed("graphic control block size must be 4")));
        }
        let bytes = read_stack!(self.src, 4, "graphic control data").map_err(|e| self.fail(e))?;
        let extension = GraphicControlExtension::parse(bytes, self.version).map_err(|e| self.fail(e))?;
        let terminator = read_u8(&mut self.src, "graphic control terminator").map_err(|e| self.fail(e))?;
        if terminator != 0 {
            return Err(self.fail(Error::malformed("graphic control extension missing block terminator")));
        }
        self.phase = Phase::AwaitingBlockLabel;
        Ok(extension)
    }

    /// Reads the plain text extension's fixed first sub-block. Legal in
    /// `BlockBody(PlainText)`; leaves the reader in `SubblockStream` so the
    /// caller can pull the remaining variable sub-blocks.
    pub fn read_plain_text_extension(&mut self) -> Result<PlainTextExtension, Error> {
        match self.phase {
            Phase::BlockBody(ExtensionLabel::PlainText) => {}
            _ => return Err(Error::invalid_state("read_plain_text_extension requires a pending plain text block")),
        }
        if self.version < Version::V89A {
            return Err(self.fail(Error::malformed("plain text extensions require version 89a")));
        }
        let size = read_u8(&mut self.src, "plain text block size").map_err(|e| self.fail(e))?;
        if size != 12 {
            return Err(self.fail(Error::malformed("plain text block size must be 12")));
        }
        let bytes = read_stack!(self.src, 12, "plain text data").map_err(|e| self.fail(e))?;
        self.phase = Phase::SubblockStream(ExtensionLabel::PlainText);
        Ok(PlainTextExtension::parse(bytes))
    }

    /// Reads the application extension's fixed first sub-block. Legal in
    /// `BlockBody(Application)`; leaves the reader in `SubblockStream`.
    pub fn read_application_extension(&mut self) -> Result<ApplicationExtension, Error> {
        match self.phase {
            Phase::BlockBody(ExtensionLabel::Application) => {}
            _ => return Err(Error::invalid_state("read_application_extension requires a pending application block")),
        }
        if self.version < Version::V89A {
            return Err(self.fail(Error::malformed("application extensions require version 89a")));
        }
        let size = read_u8(&mut self.src, "application block size").map_err(|e| self.fail(e))?;
        if size != 11 {
            return Err(self.fail(Error::malformed("application block size must be 11")));
        }
        let bytes = read_stack!(self.src, 11, "application identifier").map_err(|e| self.fail(e))?;
        self.phase = Phase::SubblockStream(ExtensionLabel::Application);
        Ok(ApplicationExtension::parse(bytes))
    }

    /// Reads one sub-block. Legal in `BlockBody` (comment extensions go
    /// straight to sub-blocks with no fixed header) or `SubblockStream`.
    /// Returns `None` once the zero-length terminator is hit.
    pub fn read_subblock(&mut self) -> Result<Option<Vec<u8>>, Error> {
        let label = match self.phase {
            Phase::BlockBody(label) => label,
            Phase::SubblockStream(label) => label,
            _ => return Err(Error::invalid_state("read_subblock requires a pending sub-block stream")),
        };
        let len = read_u8(&mut self.src, "sub-block length").map_err(|e| self.fail(e))?;
        if len == 0 {
            self.phase = Phase::AwaitingBlockLabel;
            return Ok(None);
        }
        let bytes = read_heap(&mut self.src, len as usize, "sub-block data").map_err(|e| self.fail(e))?;
        self.phase = Phase::SubblockStream(label);
        Ok(Some(bytes))
    }

    /// Reads one Netscape application sub-block. Legal only in
    /// `SubblockStream(Application)`.
    pub fn read_netscape_subblock(&mut self) -> Result<Option<NetscapeSubBlock>, Error> {
        match self.phase {
            Phase::SubblockStream(ExtensionLabel::Application) => {}
            _ => return Err(Error::invalid_state("read_netscape_subblock requires a pending application sub-block stream")),
        }
        match self.read_subblock()? {
            None => Ok(None),
            Some(bytes) => NetscapeSubBlock::parse(&bytes).map(Some).map_err(|e| self.fail(e)),
        }
    }

    /// Reads the image descriptor. Legal in `ImageDescriptorPending`
    /// (after `peek_part` has consumed the `0x2C` separator).
    pub fn read_image_descriptor(&mut self) -> Result<ImageDescriptor, Error> {
        if self.phase != Phase::ImageDescriptorPending {
            return Err(Error::invalid_state("read_image_descriptor requires peek_part to have returned ImageDescriptor"));
        }
        let bytes = read_stack!(self.src, 9, "image descriptor").map_err(|e| self.fail(e))?;
        let descriptor = ImageDescriptor::parse(bytes, self.version).map_err(|e| self.fail(e))?;
        match descriptor.local_color_table_size {
            Some(size) => {
                self.pending_image_dims = Some((descriptor.width, descriptor.height));
                self.phase = Phase::LocalColorTable(size);
            }
            None => self.phase = Phase::ImageData(descriptor.width, descriptor.height),
        }
        Ok(descriptor)
    }

    /// Decodes the image data. Legal in `ImageData`.
    pub fn read_image_data(&mut self) -> Result<Vec<u8>, Error> {
        let (width, height) = match self.phase {
            Phase::ImageData(w, h) => (w, h),
            _ => return Err(Error::invalid_state("read_image_data requires a pending image")),
        };
        let min_code_size = read_u8(&mut self.src, "lzw minimum code size").map_err(|e| self.fail(e))?;
        trace!("decoding image data, {}x{}, min code size {}", width, height, min_code_size);
        let output_len = width as usize * height as usize;
        let pixels = lzw::decode(&mut self.src, min_code_size, output_len).map_err(|e| self.fail(e))?;
        self.phase = Phase::AwaitingBlockLabel;
        Ok(pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn minimal_empty() -> Vec<u8> {
        let mut bytes = b"GIF87a".to_vec();
        bytes.extend_from_slice(&[0; 7]);
        bytes.push(0x3B);
        bytes
    }

    #[test]
    fn reads_minimal_empty_file() {
        let mut reader = GifReader::new(Cursor::new(minimal_empty()));
        assert_eq!(reader.read_header().unwrap(), Version::V87A);
        let lsd = reader.read_logical_screen_descriptor().unwrap();
        assert_eq!(lsd.width, 0);
        assert_eq!(lsd.global_color_table_size, None);
        assert_eq!(reader.peek_part().unwrap(), Part::Trailer);
    }

    #[test]
    fn wrong_phase_is_invalid_state_and_does_not_mutate() {
        let mut reader = GifReader::new(Cursor::new(minimal_empty()));
        assert!(matches!(reader.read_logical_screen_descriptor(), Err(Error::InvalidState(_))));
        // phase untouched: header can still be read correctly afterward.
        assert_eq!(reader.read_header().unwrap(), Version::V87A);
    }

    #[test]
    fn rejects_bad_signature() {
        let mut bytes = b"GIX87a".to_vec();
        bytes.extend_from_slice(&[0; 9]);
        let mut reader = GifReader::new(Cursor::new(bytes));
        assert!(reader.read_header().is_err());
        assert!(matches!(reader.read_header(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn version_87a_rejects_graphic_control_extension_body() {
        let mut bytes = b"GIF87a".to_vec();
        bytes.extend_from_slice(&[0; 7]);
        bytes.extend_from_slice(&[0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00]);
        bytes.push(0x3B);

        let mut reader = GifReader::new(Cursor::new(bytes));
        reader.read_header().unwrap();
        reader.read_logical_screen_descriptor().unwrap();
        reader.peek_part().unwrap();
        assert_eq!(reader.read_extension_label().unwrap(), ExtensionLabel::GraphicControl);
        assert!(matches!(reader.read_graphic_control_extension(), Err(Error::Malformed(_))));
    }

    #[test]
    fn decodes_one_pixel_image() {
        let mut bytes = b"GIF87a".to_vec();
        bytes.extend_from_slice(&[0; 7]); // no global color table
        bytes.push(0x2C);
        bytes.extend_from_slice(&[0, 0, 0, 0, 1, 0, 1, 0, 0]); // 1x1, no local color table
        bytes.extend_from_slice(&[0x02, 0x02, 0x44, 0x01, 0x00]);
        bytes.push(0x3B);

        let mut reader = GifReader::new(Cursor::new(bytes));
        reader.read_header().unwrap();
        reader.read_logical_screen_descriptor().unwrap();
        assert_eq!(reader.peek_part().unwrap(), Part::ImageDescriptor);
        let descriptor = reader.read_image_descriptor().unwrap();
        assert_eq!((descriptor.width, descriptor.height), (1, 1));
        let pixels = reader.read_image_data().unwrap();
        assert_eq!(pixels, vec![0]);
        assert_eq!(reader.peek_part().unwrap(), Part::Trailer);
    }
}
