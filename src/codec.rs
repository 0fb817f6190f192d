//! Encoding and decoding of the AD569x wire protocol.
//!
//! Everything here is a pure function of its arguments; nothing touches the bus.  The driver uses
//! these to build the bytes it hands to the I2C implementation, but they are public so that the
//! protocol can be driven over any other transport.
//!
//! Every write to the device is a command byte followed by two data bytes:
//!
//! ```text
//! || C3 C2 C1 C0 DD DC DB DA || D15 .. D8 || D7 .. D0 ||
//! ```
//!
//! `C3..C0` is the operation and `DD..DA` selects the channels.  Data is sent MSB first.

use crate::types::*;

/// Upper five bits of the 7-bit bus address; the A1 and A0 pins supply the lower two, giving
/// `0x08..=0x0B`.
pub const BASE_ADDRESS: u8 = 0b00010;

/// First byte of [`encode_power_command`].
pub const COMMAND_POWER_DOWN: u8 = 0b01000000;
/// First byte of [`encode_ldac_command`].
pub const COMMAND_LDAC_MASK: u8 = 0b01010000;
/// First byte of [`encode_reset_command`].
pub const COMMAND_SOFTWARE_RESET: u8 = 0b01100000;

/// Largest possible readback: two bytes for each of the four channels.
pub const MAX_READBACK_LEN: usize = 8;

/// A readback was decoded from a number of bytes other than [`response_len`] of its mask.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferLengthMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// Packs an operation and a channel selection into a command byte.
pub fn command_byte(operation: Operation, channels: ChannelMask) -> u8 {
    (u8::from(operation) & 0x0f) << 4 | (channels.bits() & 0x0f)
}

/// Command byte followed by the value, MSB first.
pub fn encode_write(operation: Operation, channels: ChannelMask, value: u16) -> [u8; 3] {
    let [msb, lsb] = value.to_be_bytes();
    [command_byte(operation, channels), msb, lsb]
}

/// The write phase of a readback: a lone command byte selecting the channels to read.
pub fn encode_read_request(operation: Operation, channels: ChannelMask) -> [u8; 1] {
    [command_byte(operation, channels)]
}

/// Number of bytes the device returns when `channels` is read back.
pub fn response_len(channels: ChannelMask) -> usize {
    2 * channels.count()
}

/// Splits a readback into one code per selected channel.
///
/// The device sends the selected channels in ascending order, so the first code always belongs to
/// the lowest selected channel.  `bytes` must hold exactly [`response_len`] bytes; anything else is
/// rejected without decoding.
///
/// ```
/// use ad569x::codec::decode_read_response;
/// use ad569x::{Channel, ChannelMask};
///
/// let readback = decode_read_response(Channel::D | Channel::B, &[0x00, 0x01, 0x12, 0x34]).unwrap();
/// assert_eq!(readback.as_slice(), &[0x0001, 0x1234]);
/// assert_eq!(readback.get(Channel::D), Some(0x1234));
/// ```
pub fn decode_read_response(
    channels: ChannelMask,
    bytes: &[u8],
) -> Result<Readback, TransferLengthMismatch> {
    let expected = response_len(channels);
    if bytes.len() != expected {
        return Err(TransferLengthMismatch {
            expected,
            actual: bytes.len(),
        });
    }
    let mut codes = [0; 4];
    for (code, pair) in codes.iter_mut().zip(bytes.chunks_exact(2)) {
        *code = u16::from_be_bytes([pair[0], pair[1]]);
    }
    Ok(Readback::new(channels, codes))
}

/// Power-down command with one mode per channel.
///
/// ```text
/// || 0 1 0 0 0 0 0 0 || X X X X X X X X || PD PD PC PC PB PB PA PA ||
/// ```
pub fn encode_power_command(
    mode_a: PowerDownMode,
    mode_b: PowerDownMode,
    mode_c: PowerDownMode,
    mode_d: PowerDownMode,
) -> [u8; 3] {
    let modes = (u8::from(mode_d) & 0b11) << 6
        | (u8::from(mode_c) & 0b11) << 4
        | (u8::from(mode_b) & 0b11) << 2
        | (u8::from(mode_a) & 0b11);
    [COMMAND_POWER_DOWN, 0x00, modes]
}

/// LDAC mask command.  A set bit makes that channel ignore the LDAC pin.
pub fn encode_ldac_command(channels: ChannelMask) -> [u8; 3] {
    [COMMAND_LDAC_MASK, 0x00, channels.bits() & 0x0f]
}

/// Software reset to the power-on state.
pub fn encode_reset_command() -> [u8; 3] {
    [COMMAND_SOFTWARE_RESET, 0x00, 0x00]
}
