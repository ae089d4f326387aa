//! The "NETSCAPE2.0" application extension sub-block, used for animation looping.

use crate::error::Error;

pub(crate) const NETSCAPE_IDENTIFIER: &[u8; 8] = b"NETSCAPE";
pub(crate) const NETSCAPE_AUTH_CODE: &[u8; 3] = b"2.0";

/// Number of times an animation repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Finite(u16),
    Infinite,
}

/// A decoded Netscape application sub-block (looping or buffering).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetscapeSubBlock {
    Looping(Repeat),
    Buffering(u32),
}

impl NetscapeSubBlock {
    pub(crate) fn parse(bytes: &[u8]) -> Result<Self, Error> {
        match bytes.first() {
            Some(0x01) if bytes.len() == 3 => {
                let count = u16::from_le_bytes([bytes[1], bytes[2]]);
                let repeat = if count == 0 { Repeat::Infinite } else { Repeat::Finite(count) };
                Ok(NetscapeSubBlock::Looping(repeat))
            }
            Some(0x02) if bytes.len() == 5 => {
                let len = u32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
                Ok(NetscapeSubBlock::Buffering(len))
            }
            Some(0x01) | Some(0x02) => Err(Error::malformed("wrong length for netscape sub-block identifier")),
            Some(other) => Err(Error::malformed(format!("unknown netscape sub-block identifier {other:#04X}"))),
            None => Err(Error::malformed("empty netscape sub-block")),
        }
    }

    pub(crate) fn encode(self) -> Vec<u8> {
        match self {
            NetscapeSubBlock::Looping(Repeat::Infinite) => vec![0x01, 0, 0],
            NetscapeSubBlock::Looping(Repeat::Finite(count)) => {
                let [c0, c1] = count.to_le_bytes();
                vec![0x01, c0, c1]
            }
            NetscapeSubBlock::Buffering(len) => {
                let [b0, b1, b2, b3] = len.to_le_bytes();
                vec![0x02, b0, b1, b2, b3]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_loop_round_trips() {
        let block = NetscapeSubBlock::Looping(Repeat::Infinite);
        assert_eq!(NetscapeSubBlock::parse(&block.encode()).unwrap(), block);
    }

    #[test]
    fn finite_loop_round_trips() {
        let block = NetscapeSubBlock::Looping(Repeat::Finite(7));
        assert_eq!(NetscapeSubBlock::parse(&block.encode()).unwrap(), block);
    }

    #[test]
    fn rejects_unknown_identifier() {
        assert!(NetscapeSubBlock::parse(&[0x03, 0, 0]).is_err());
    }
}
