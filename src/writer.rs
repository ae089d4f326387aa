//! Push-style writer over a GIF byte stream.
//!
//! Operations are only legal in the phase documented on each method; calling
//! one from the wrong phase returns `Error::InvalidState` and leaves the
//! writer's phase untouched. Any I/O failure is sticky: the writer moves to
//! `Phase::Error` and every later call fails with `InvalidState`.

use crate::color::{count_for_packed_size, packed_size_for_count, ColorTable};
use crate::error::Error;
use crate::lzw;
use crate::netscape::NetscapeSubBlock;
use crate::records::{
    ApplicationExtension, ExtensionLabel, GraphicControlExtension, ImageDescriptor, LogicalScreenDescriptor,
    PlainTextExtension,
};
use crate::version::Version;
use log::{debug, info, trace};
use std::io::Write;

const SIGNATURE: &[u8; 3] = b"GIF";

/// Which sub-block stream is currently open: an extension's, or an image's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubblockContext {
    Extension(ExtensionLabel),
    ImageData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Header,
    LogicalScreen,
    GlobalColorTable(u8),
    AwaitingBlockLabel,
    LocalColorTable(u8),
    ImageData(u16, u16),
    Subblock0(SubblockContext),
    Subblocks(SubblockContext),
    Done,
    Error,
}

/// A GIF writer driven one part at a time over any `Write` stream.
pub struct GifWriter<W: Write> {
    dest: W,
    phase: Phase,
    version: Version,
    pending_image_dims: Option<(u16, u16)>,
}

impl<W: Write> GifWriter<W> {
    pub fn new(dest: W) -> Self {
        GifWriter { dest, phase: Phase::Header, version: Version::V87A, pending_image_dims: None }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Releases the underlying stream, whatever phase the writer is in.
    pub fn close(self) -> W {
        self.dest
    }

    fn fail(&mut self, err: Error) -> Error {
        if err.is_sticky() {
            self.phase = Phase::Error;
        }
        err
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.dest.write_all(bytes).map_err(|e| self.fail(Error::Io(e)))
    }

    /// Writes the six-byte header. Legal in `Header`.
    pub fn write_header(&mut self, version: Version) -> Result<(), Error> {
        if self.phase != Phase::Header {
            return Err(Error::invalid_state("write_header is only legal before any bytes have been written"));
        }
        let mut bytes = SIGNATURE.to_vec();
        bytes.extend_from_slice(&version.encode());
        self.write_bytes(&bytes)?;
        debug!("wrote gif header, version {:?}", version);
        self.version = version;
        self.phase = Phase::LogicalScreen;
        Ok(())
    }

    /// Writes the logical screen descriptor. Legal in `LogicalScreen`.
    pub fn write_logical_screen_descriptor(&mut self, descriptor: &LogicalScreenDescriptor) -> Result<(), Error> {
        if self.phase != Phase::LogicalScreen {
            return Err(Error::invalid_state("write_logical_screen_descriptor requires the header to have been written"));
        }
        let bytes = descriptor.encode(self.version).map_err(|e| self.fail(e))?;
        self.write_bytes(&bytes)?;
        self.phase = match descriptor.global_color_table_size {
            Some(size) => Phase::GlobalColorTable(size),
            None => Phase::AwaitingBlockLabel,
        };
        Ok(())
    }

    /// Writes a color table, padding short tables with black. Legal right
    /// after a descriptor declared one.
    pub fn write_color_table(&mut self, table: &ColorTable) -> Result<(), Error> {
        let size = match self.phase {
            Phase::GlobalColorTable(size) => size,
            Phase::LocalColorTable(size) => size,
            _ => return Err(Error::invalid_state("write_color_table requires a pending color table")),
        };
        let count = count_for_packed_size(size);
        if table.len() > count {
            return Err(Error::invalid_argument("color table has more entries than its declared size"));
        }
        let mut bytes = table.to_bytes();
        bytes.resize(count * 3, 0);
        self.write_bytes(&bytes)?;
        self.phase = match self.phase {
            Phase::GlobalColorTable(_) => Phase::AwaitingBlockLabel,
            Phase::LocalColorTable(_) => {
                let (w, h) = self.pending_image_dims.take().expect("local color table without pending image");
                Phase::ImageData(w, h)
            }
            _ => unreachable!(),
        };
        Ok(())
    }

    /// Writes the image separator and nine-byte image descriptor. Legal in
    /// `AwaitingBlockLabel`.
    pub fn write_image_descriptor(&mut self, descriptor: &ImageDescriptor) -> Result<(), Error> {
        if self.phase != Phase::AwaitingBlockLabel {
            return Err(Error::invalid_state("write_image_descriptor requires an awaited block label"));
        }
        let mut bytes = vec![0x2C];
        bytes.extend_from_slice(&descriptor.encode());
        self.write_bytes(&bytes)?;
        match descriptor.local_color_table_size {
            Some(size) => {
                self.pending_image_dims = Some((descriptor.width, descriptor.height));
                self.phase = Phase::LocalColorTable(size);
            }
            None => self.phase = Phase::ImageData(descriptor.width, descriptor.height),
        }
        Ok(())
    }

    /// Encodes and writes image data in one call, computing the minimum code
    /// size from the highest palette index present in `pixels`. Legal in
    /// `ImageData`.
    pub fn write_image_data(&mut self, pixels: &[u8]) -> Result<(), Error> {
        let min_code_size = lzw::min_code_size_for(pixels);
        self.write_image_data_with_min_code_size(min_code_size, pixels)
    }

    /// As [`write_image_data`](Self::write_image_data), but with an explicit
    /// minimum code size rather than one derived from the pixel data.
    pub fn write_image_data_with_min_code_size(&mut self, min_code_size: u8, pixels: &[u8]) -> Result<(), Error> {
        let (width, height) = match self.phase {
            Phase::ImageData(w, h) => (w, h),
            _ => return Err(Error::invalid_state("write_image_data requires a pending image")),
        };
        if !(2..=8).contains(&min_code_size) {
            return Err(Error::invalid_argument("lzw minimum code size must be between 2 and 8"));
        }
        trace!("encoding image data, {}x{}, min code size {}", width, height, min_code_size);
        self.write_bytes(&[min_code_size])?;
        lzw::encode(&mut self.dest, min_code_size, pixels).map_err(|e| self.fail(e))?;
        self.phase = Phase::AwaitingBlockLabel;
        Ok(())
    }

    /// Writes only the minimum-code-size header byte, leaving the caller to
    /// drive [`write_subblock`](Self::write_subblock) and
    /// [`write_block_terminator`](Self::write_block_terminator) with an
    /// already-encoded LZW code stream. Legal in `ImageData`.
    pub fn begin_image_data(&mut self, min_code_size: u8) -> Result<(), Error> {
        if !matches!(self.phase, Phase::ImageData(_, _)) {
            return Err(Error::invalid_state("begin_image_data requires a pending image"));
        }
        if !(2..=8).contains(&min_code_size) {
            return Err(Error::invalid_argument("lzw minimum code size must be between 2 and 8"));
        }
        self.write_bytes(&[min_code_size])?;
        self.phase = Phase::Subblock0(SubblockContext::ImageData);
        Ok(())
    }

    /// Writes the `0x21` introducer and the label byte for an extension
    /// whose body will be written sub-block by sub-block (comment extensions,
    /// or forward-compatible unknown labels). Legal in `AwaitingBlockLabel`.
    pub fn write_extension_label(&mut self, label: ExtensionLabel) -> Result<(), Error> {
        if self.phase != Phase::AwaitingBlockLabel {
            return Err(Error::invalid_state("write_extension_label requires an awaited block label"));
        }
        if self.version < Version::V89A {
            return Err(Error::invalid_argument("extensions require version 89a"));
        }
        if self.version == Version::V89A && matches!(label, ExtensionLabel::Unknown(_)) {
            return Err(Error::invalid_argument("unknown extension labels require a version newer than 89a"));
        }
        self.write_bytes(&[0x21, label.to_byte()])?;
        self.phase = Phase::Subblock0(SubblockContext::Extension(label));
        Ok(())
    }

    /// Writes the graphic control extension's label and fixed sub-block,
    /// including the block terminator (it has no further sub-blocks). Legal
    /// in `AwaitingBlockLabel`.
    pub fn write_graphic_control_extension(&mut self, extension: &GraphicControlExtension) -> Result<(), Error> {
        if self.phase != Phase::AwaitingBlockLabel {
            return Err(Error::invalid_state("write_graphic_control_extension requires an awaited block label"));
        }
        if self.version < Version::V89A {
            return Err(Error::invalid_argument("graphic control extensions require version 89a"));
        }
        let bytes = extension.encode();
        if (bytes[0] & 0b0001_1100) >> 2 > 3 {
            return Err(Error::invalid_argument("disposal method greater than 3 requires a future version"));
        }
        let mut out = vec![0x21, ExtensionLabel::GraphicControl.to_byte(), 4];
        out.extend_from_slice(&bytes);
        out.push(0);
        self.write_bytes(&out)?;
        self.phase = Phase::AwaitingBlockLabel;
        Ok(())
    }

    /// Writes the plain text extension's label and fixed first sub-block.
    /// Legal in `AwaitingBlockLabel`; leaves the writer in `Subblocks` so the
    /// caller can write the remaining variable sub-blocks.
    pub fn write_plain_text_extension(&mut self, extension: &PlainTextExtension) -> Result<(), Error> {
        if self.phase != Phase::AwaitingBlockLabel {
            return Err(Error::invalid_state("write_plain_text_extension requires an awaited block label"));
        }
        if self.version < Version::V89A {
            return Err(Error::invalid_argument("plain text extensions require version 89a"));
        }
        let mut out = vec![0x21, ExtensionLabel::PlainText.to_byte(), 12];
        out.extend_from_slice(&extension.encode());
        self.write_bytes(&out)?;
        self.phase = Phase::Subblocks(SubblockContext::Extension(ExtensionLabel::PlainText));
        Ok(())
    }

    /// Writes the application extension's label and fixed first sub-block.
    /// Legal in `AwaitingBlockLabel`; leaves the writer in `Subblocks`.
    pub fn write_application_extension(&mut self, extension: &ApplicationExtension) -> Result<(), Error> {
        if self.phase != Phase::AwaitingBlockLabel {
            return Err(Error::invalid_state("write_application_extension requires an awaited block label"));
        }
        if self.version < Version::V89A {
            return Err(Error::invalid_argument("application extensions require version 89a"));
        }
        let mut out = vec![0x21, ExtensionLabel::Application.to_byte(), 11];
        out.extend_from_slice(&extension.encode());
        self.write_bytes(&out)?;
        self.phase = Phase::Subblocks(SubblockContext::Extension(ExtensionLabel::Application));
        Ok(())
    }

    /// Writes one sub-block (1..=255 data bytes). Legal whenever a sub-block
    /// stream is open, whether zero or more sub-blocks have been written so
    /// far.
    pub fn write_subblock(&mut self, data: &[u8]) -> Result<(), Error> {
        let context = match self.phase {
            Phase::Subblock0(ctx) => ctx,
            Phase::Subblocks(ctx) => ctx,
            _ => return Err(Error::invalid_state("write_subblock requires an open sub-block stream")),
        };
        if data.is_empty() || data.len() > 0xFF {
            return Err(Error::invalid_argument("sub-block length must be between 1 and 255"));
        }
        let mut out = vec![data.len() as u8];
        out.extend_from_slice(data);
        self.write_bytes(&out)?;
        self.phase = Phase::Subblocks(context);
        Ok(())
    }

    /// Writes one Netscape application sub-block. Legal only while the open
    /// sub-block stream belongs to an application extension.
    pub fn write_netscape_subblock(&mut self, block: NetscapeSubBlock) -> Result<(), Error> {
        match self.phase {
            Phase::Subblock0(SubblockContext::Extension(ExtensionLabel::Application))
            | Phase::Subblocks(SubblockContext::Extension(ExtensionLabel::Application)) => {}
            _ => return Err(Error::invalid_state("write_netscape_subblock requires an open application sub-block stream")),
        }
        self.write_subblock(&block.encode())
    }

    /// Writes the zero-length sub-block terminator, closing whichever
    /// sub-block stream (extension or image data) is currently open.
    pub fn write_block_terminator(&mut self) -> Result<(), Error> {
        match self.phase {
            Phase::Subblock0(_) | Phase::Subblocks(_) => {}
            _ => return Err(Error::invalid_state("write_block_terminator requires an open sub-block stream")),
        }
        self.write_bytes(&[0])?;
        self.phase = Phase::AwaitingBlockLabel;
        Ok(())
    }

    /// Writes the trailer byte, ending the stream. Legal in `AwaitingBlockLabel`.
    pub fn write_trailer(&mut self) -> Result<(), Error> {
        if self.phase != Phase::AwaitingBlockLabel {
            return Err(Error::invalid_state("write_trailer requires an awaited block label"));
        }
        self.write_bytes(&[0x3B])?;
        info!("wrote gif trailer");
        self.phase = Phase::Done;
        Ok(())
    }
}

/// Builds a [`LogicalScreenDescriptor`] suitable for a screen with a global
/// color table of `color_count` entries, or `None` for no global table.
pub fn logical_screen_descriptor(width: u16, height: u16, color_count: Option<usize>) -> Result<LogicalScreenDescriptor, Error> {
    let global_color_table_size = color_count
        .map(packed_size_for_count)
        .transpose()
        .map_err(Error::invalid_argument)?;
    Ok(LogicalScreenDescriptor {
        width,
        height,
        color_resolution: 0,
        sorted: false,
        global_color_table_size,
        background_color_index: 0,
        pixel_aspect_ratio: 0,
    })
}
