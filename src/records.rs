//! Fixed-width descriptor and extension records, byte-exact with the wire format.

use crate::color::packed_size_for_count;
use crate::error::Error;
use crate::version::Version;

/// The logical screen descriptor (7 bytes, following the header).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalScreenDescriptor {
    pub width: u16,
    pub height: u16,
    pub color_resolution: u8,
    pub sorted: bool,
    pub global_color_table_size: Option<u8>,
    pub background_color_index: u8,
    pub pixel_aspect_ratio: u8,
}

impl LogicalScreenDescriptor {
    pub(crate) fn parse(bytes: [u8; 7], version: Version) -> Result<Self, Error> {
        let width = u16::from_le_bytes([bytes[0], bytes[1]]);
        let height = u16::from_le_bytes([bytes[2], bytes[3]]);
        let packed = bytes[4];
        let has_gct = packed & 0b1000_0000 != 0;
        let color_resolution = (packed & 0b0111_0000) >> 4;
        let sorted = packed & 0b0000_1000 != 0;
        let size = packed & 0b0000_0111;

        if version < Version::V89A && (sorted || bytes[6] != 0) {
            return Err(Error::malformed("sorted flag and pixel aspect ratio require version 89a"));
        }

        Ok(LogicalScreenDescriptor {
            width,
            height,
            color_resolution,
            sorted,
            global_color_table_size: has_gct.then(|| size),
            background_color_index: bytes[5],
            pixel_aspect_ratio: bytes[6],
        })
    }

    pub(crate) fn encode(&self, version: Version) -> Result<[u8; 7], Error> {
        if version < Version::V89A && (self.sorted || self.pixel_aspect_ratio != 0) {
            return Err(Error::invalid_argument("sorted flag and pixel aspect ratio require version 89a"));
        }
        let mut packed = (self.color_resolution & 0b111) << 4;
        if self.sorted {
            packed |= 0b0000_1000;
        }
        if let Some(size) = self.global_color_table_size {
            packed |= 0b1000_0000 | (size & 0b111);
        }
        let [w0, w1] = self.width.to_le_bytes();
        let [h0, h1] = self.height.to_le_bytes();
        Ok([w0, w1, h0, h1, packed, self.background_color_index, self.pixel_aspect_ratio])
    }

    /// Global color table size encoded from an explicit entry count.
    pub fn with_global_color_table_count(mut self, count: usize) -> Result<Self, &'static str> {
        self.global_color_table_size = Some(packed_size_for_count(count)?);
        Ok(self)
    }
}

/// The image descriptor (9 bytes after the `0x2C` separator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub interlaced: bool,
    pub sorted: bool,
    pub local_color_table_size: Option<u8>,
}

impl ImageDescriptor {
    pub(crate) fn parse(bytes: [u8; 9], version: Version) -> Result<Self, Error> {
        let left = u16::from_le_bytes([bytes[0], bytes[1]]);
        let top = u16::from_le_bytes([bytes[2], bytes[3]]);
        let width = u16::from_le_bytes([bytes[4], bytes[5]]);
        let height = u16::from_le_bytes([bytes[6], bytes[7]]);
        let packed = bytes[8];
        let has_lct = packed & 0b1000_0000 != 0;
        let interlaced = packed & 0b0100_0000 != 0;
        let sorted = packed & 0b0010_0000 != 0;
        let reserved = (packed & 0b0001_1000) >> 3;
        let size = packed & 0b0000_0111;

        if version >= Version::V89A && reserved != 0 {
            return Err(Error::malformed("image descriptor reserved bits must be zero"));
        }

        Ok(ImageDescriptor {
            left,
            top,
            width,
            height,
            interlaced,
            sorted,
            local_color_table_size: has_lct.then(|| size),
        })
    }

    pub(crate) fn encode(&self) -> [u8; 9] {
        let mut packed = 0u8;
        if self.interlaced {
            packed |= 0b0100_0000;
        }
        if self.sorted {
            packed |= 0b0010_0000;
        }
        if let Some(size) = self.local_color_table_size {
            packed |= 0b1000_0000 | (size & 0b111);
        }
        let [l0, l1] = self.left.to_le_bytes();
        let [t0, t1] = self.top.to_le_bytes();
        let [w0, w1] = self.width.to_le_bytes();
        let [h0, h1] = self.height.to_le_bytes();
        [l0, l1, t0, t1, w0, w1, h0, h1, packed]
    }

    pub fn with_local_color_table_count(mut self, count: usize) -> Result<Self, &'static str> {
        self.local_color_table_size = Some(packed_size_for_count(count)?);
        Ok(self)
    }
}

/// How the previous frame should be handled before drawing the next.
///
/// Decoded for convenience; the codec itself only validates the raw field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisposalMethod {
    None,
    DoNotDispose,
    RestoreToBackground,
    RestoreToPrevious,
    Unknown(u8),
}

impl DisposalMethod {
    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => DisposalMethod::None,
            1 => DisposalMethod::DoNotDispose,
            2 => DisposalMethod::RestoreToBackground,
            3 => DisposalMethod::RestoreToPrevious,
            other => DisposalMethod::Unknown(other),
        }
    }

    fn to_bits(self) -> u8 {
        match self {
            DisposalMethod::None => 0,
            DisposalMethod::DoNotDispose => 1,
            DisposalMethod::RestoreToBackground => 2,
            DisposalMethod::RestoreToPrevious => 3,
            DisposalMethod::Unknown(bits) => bits,
        }
    }
}

/// Graphic control extension (label `0xF9`), one fixed sub-block, no trailing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphicControlExtension {
    pub disposal_method: DisposalMethod,
    pub user_input: bool,
    pub transparent_color_index: Option<u8>,
    pub delay_time: u16,
}

impl GraphicControlExtension {
    pub(crate) fn parse(bytes: [u8; 4], version: Version) -> Result<Self, Error> {
        let packed = bytes[0];
        let reserved = (packed & 0b1110_0000) >> 5;
        let disposal_bits = (packed & 0b0001_1100) >> 2;
        let user_input = packed & 0b0000_0010 != 0;
        let has_transparent = packed & 0b0000_0001 != 0;

        if version >= Version::V89A && reserved != 0 {
            return Err(Error::malformed("graphic control extension reserved bits must be zero"));
        }
        if version >= Version::V89A && disposal_bits > 3 {
            return Err(Error::malformed("disposal method greater than 3 requires a future version"));
        }

        let delay_time = u16::from_le_bytes([bytes[1], bytes[2]]);
        Ok(GraphicControlExtension {
            disposal_method: DisposalMethod::from_bits(disposal_bits),
            user_input,
            transparent_color_index: has_transparent.then(|| bytes[3]),
            delay_time,
        })
    }

    pub(crate) fn encode(&self) -> [u8; 4] {
        let mut packed = self.disposal_method.to_bits() << 2;
        if self.user_input {
            packed |= 0b0000_0010;
        }
        if self.transparent_color_index.is_some() {
            packed |= 0b0000_0001;
        }
        let [d0, d1] = self.delay_time.to_le_bytes();
        [packed, d0, d1, self.transparent_color_index.unwrap_or(0)]
    }
}

/// Plain text extension's fixed first sub-block (label `0x01`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlainTextExtension {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub cell_width: u8,
    pub cell_height: u8,
    pub foreground_color_index: u8,
    pub background_color_index: u8,
}

impl PlainTextExtension {
    pub(crate) fn parse(bytes: [u8; 12]) -> Self {
        PlainTextExtension {
            left: u16::from_le_bytes([bytes[0], bytes[1]]),
            top: u16::from_le_bytes([bytes[2], bytes[3]]),
            width: u16::from_le_bytes([bytes[4], bytes[5]]),
            height: u16::from_le_bytes([bytes[6], bytes[7]]),
            cell_width: bytes[8],
            cell_height: bytes[9],
            foreground_color_index: bytes[10],
            background_color_index: bytes[11],
        }
    }

    pub(crate) fn encode(&self) -> [u8; 12] {
        let [l0, l1] = self.left.to_le_bytes();
        let [t0, t1] = self.top.to_le_bytes();
        let [w0, w1] = self.width.to_le_bytes();
        let [h0, h1] = self.height.to_le_bytes();
        [l0, l1, t0, t1, w0, w1, h0, h1, self.cell_width, self.cell_height, self.foreground_color_index, self.background_color_index]
    }
}

/// Application extension's fixed first sub-block (label `0xFF`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationExtension {
    pub identifier: [u8; 8],
    pub authentication_code: [u8; 3],
}

impl ApplicationExtension {
    pub(crate) fn parse(bytes: [u8; 11]) -> Self {
        let mut identifier = [0u8; 8];
        identifier.copy_from_slice(&bytes[0..8]);
        let mut authentication_code = [0u8; 3];
        authentication_code.copy_from_slice(&bytes[8..11]);
        ApplicationExtension { identifier, authentication_code }
    }

    pub(crate) fn encode(&self) -> [u8; 11] {
        let mut out = [0u8; 11];
        out[0..8].copy_from_slice(&self.identifier);
        out[8..11].copy_from_slice(&self.authentication_code);
        out
    }

    pub fn is_netscape(&self) -> bool {
        &self.identifier == b"NETSCAPE" && &self.authentication_code == b"2.0"
    }
}

/// Extension introducer labels, decoded from the raw byte that follows `0x21`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionLabel {
    GraphicControl,
    PlainText,
    Application,
    Comment,
    Unknown(u8),
}

impl ExtensionLabel {
    pub(crate) fn from_byte(byte: u8, version: Version) -> Result<Self, Error> {
        let label = match byte {
            0xF9 => ExtensionLabel::GraphicControl,
            0x01 => ExtensionLabel::PlainText,
            0xFF => ExtensionLabel::Application,
            0xFE => ExtensionLabel::Comment,
            other => ExtensionLabel::Unknown(other),
        };
        if matches!(label, ExtensionLabel::Unknown(_)) && !version.is_future() {
            return Err(Error::malformed(format!("unknown extension label {byte:#04X}")));
        }
        Ok(label)
    }

    pub(crate) fn to_byte(self) -> u8 {
        match self {
            ExtensionLabel::GraphicControl => 0xF9,
            ExtensionLabel::PlainText => 0x01,
            ExtensionLabel::Application => 0xFF,
            ExtensionLabel::Comment => 0xFE,
            ExtensionLabel::Unknown(byte) => byte,
        }
    }
}
