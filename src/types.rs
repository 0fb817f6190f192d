use core::ops::BitOr;

use embedded_hal::i2c::ErrorKind;
use num_enum::{IntoPrimitive, TryFromPrimitive, TryFromPrimitiveError};

use crate::codec::{TransferLengthMismatch, BASE_ADDRESS};

// Error type.

/// Error type for the crate, which can represent either an error from this driver or an inner error
/// that comes from the I2C type.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<InnerError> {
    /// The addressed device did not acknowledge its address or a data byte.
    ///
    /// This is any inner error whose [`embedded_hal::i2c::Error::kind`] is
    /// [`ErrorKind::NoAcknowledge`].  It is reported as-is; the driver never retries.
    BusNack(InnerError),
    /// A readback did not contain exactly two bytes per selected channel.
    ///
    /// Nothing is decoded when this happens and the received bytes are discarded.
    TransferLengthMismatch {
        /// Number of bytes the channel mask calls for.
        expected: usize,
        /// Number of bytes that were actually received; 0 if the bus read itself failed.
        actual: usize,
    },
    /// A raw sub-address outside of `0..=3` was supplied.
    ///
    /// The AD569x only has the A1 and A0 pins, so there are four possible devices per bus.
    InvalidSubAddress(u8),
    /// Error representing any other error that came from the inner I2C driver.
    I2CError(InnerError),
}

impl<E: embedded_hal::i2c::Error> Error<E> {
    /// Sorts an error from the I2C driver into [`Error::BusNack`] or [`Error::I2CError`].
    pub(crate) fn from_bus(inner: E) -> Self {
        match inner.kind() {
            ErrorKind::NoAcknowledge(_) => Error::BusNack(inner),
            _ => Error::I2CError(inner),
        }
    }

    /// Sorts an error from the read phase of a readback.
    ///
    /// A NACK stays [`Error::BusNack`] and a bus fault or lost arbitration stays
    /// [`Error::I2CError`].  Anything else means the device did not deliver the `expected` bytes,
    /// which is reported as [`Error::TransferLengthMismatch`] with nothing received.
    pub(crate) fn from_read(inner: E, expected: usize) -> Self {
        match inner.kind() {
            ErrorKind::NoAcknowledge(_) => Error::BusNack(inner),
            ErrorKind::Bus | ErrorKind::ArbitrationLoss => Error::I2CError(inner),
            _ => Error::TransferLengthMismatch {
                expected,
                actual: 0,
            },
        }
    }
}

impl<E> From<TransferLengthMismatch> for Error<E> {
    fn from(mismatch: TransferLengthMismatch) -> Self {
        Error::TransferLengthMismatch {
            expected: mismatch.expected,
            actual: mismatch.actual,
        }
    }
}

impl<E> From<TryFromPrimitiveError<SubAddress>> for Error<E> {
    fn from(err: TryFromPrimitiveError<SubAddress>) -> Self {
        Error::InvalidSubAddress(err.number)
    }
}

// Enums for configuration.

/// The 2-bit sub-address selected by the A1 and A0 pins.
///
/// | Variant | A1  | A0  | Bus address |
/// |---------|-----|-----|-------------|
/// | `A0`    | GND | GND | `0x08`      |
/// | `A1`    | GND | VDD | `0x09`      |
/// | `A2`    | VDD | GND | `0x0A`      |
/// | `A3`    | VDD | VDD | `0x0B`      |
#[derive(IntoPrimitive, TryFromPrimitive, Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SubAddress {
    A0 = 0,
    A1 = 1,
    A2 = 2,
    A3 = 3,
}

impl SubAddress {
    /// The 7-bit I2C address of the device strapped to this sub-address.
    pub const fn bus_address(self) -> u8 {
        (BASE_ADDRESS & 0b11111) << 2 | (self as u8 & 0b11)
    }
}

/// Output channel selection.
#[derive(IntoPrimitive, TryFromPrimitive, Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Channel {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
}

impl Channel {
    /// All channels, in the order the device reports them.
    pub const ALL: [Channel; 4] = [Channel::A, Channel::B, Channel::C, Channel::D];

    /// The bit of this channel within a [`ChannelMask`].
    pub const fn mask(self) -> ChannelMask {
        ChannelMask(1 << self as u8)
    }
}

impl BitOr for Channel {
    type Output = ChannelMask;

    fn bitor(self, rhs: Channel) -> ChannelMask {
        self.mask() | rhs.mask()
    }
}

impl BitOr<Channel> for ChannelMask {
    type Output = ChannelMask;

    fn bitor(self, rhs: Channel) -> ChannelMask {
        self | rhs.mask()
    }
}

/// A set of channels, one bit per channel with channel A in bit 0 and channel D in bit 3.
///
/// Used both to select the channels a command applies to and as the LDAC mask.  Channels are
/// always reported in ascending order (A, B, C, D), regardless of how the mask was built.
///
/// ```
/// use ad569x::{Channel, ChannelMask};
///
/// let mask = Channel::D | Channel::B;
/// assert_eq!(mask.bits(), 0b1010);
/// assert_eq!(mask.count(), 2);
/// assert!(mask.iter().eq([Channel::B, Channel::D]));
/// ```
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelMask(u8);

impl ChannelMask {
    /// No channel selected.
    pub const NONE: ChannelMask = ChannelMask(0b0000);
    /// Channel A only.
    pub const A: ChannelMask = ChannelMask(0b0001);
    /// Channel B only.
    pub const B: ChannelMask = ChannelMask(0b0010);
    /// Channel C only.
    pub const C: ChannelMask = ChannelMask(0b0100);
    /// Channel D only.
    pub const D: ChannelMask = ChannelMask(0b1000);
    /// All four channels.
    pub const ALL: ChannelMask = ChannelMask(0b1111);

    /// Builds a mask from raw bits.  Anything above the low nibble is silently dropped, the same
    /// way the device ignores it.
    pub const fn from_bits_truncate(bits: u8) -> ChannelMask {
        ChannelMask(bits & 0b1111)
    }

    /// Raw bits of the mask, always within `0..=0xF`.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Number of selected channels.
    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// True if no channel is selected.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if `channel` is selected.
    pub const fn contains(self, channel: Channel) -> bool {
        self.0 & channel.mask().0 != 0
    }

    /// Iterates over the selected channels from A to D.
    pub fn iter(self) -> impl Iterator<Item = Channel> {
        Channel::ALL
            .into_iter()
            .filter(move |&channel| self.contains(channel))
    }
}

impl BitOr for ChannelMask {
    type Output = ChannelMask;

    fn bitor(self, rhs: ChannelMask) -> ChannelMask {
        ChannelMask(self.0 | rhs.0)
    }
}

impl From<Channel> for ChannelMask {
    fn from(channel: Channel) -> Self {
        channel.mask()
    }
}

/// The operation carried in the high nibble of a command byte.
#[derive(IntoPrimitive, TryFromPrimitive, Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Operation {
    /// The device does nothing with the value; still useful to select channels for a readback.
    NoOperation = 0b0000,
    /// Write to the input registers of the selected channels.
    ///
    /// The outputs follow once the LDAC pin is asserted, unless the channel is masked with
    /// [`AD569x::set_ldac_mask`](crate::AD569x::set_ldac_mask).
    WriteInputRegister = 0b0001,
    /// Copy the input registers of the selected channels into their DAC registers.
    UpdateDacFromInputRegister = 0b0010,
    /// Write to the input registers and update the DAC registers immediately.
    WriteAndUpdate = 0b0011,
}

/// Configuration bits for the powered-down state of a channel.
#[derive(IntoPrimitive, TryFromPrimitive, Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PowerDownMode {
    /// Channel is not powered down.
    Normal = 0,
    /// Channel is powered down and output pin is connected to ground through a 1K resistor.
    OneKToGround = 1,
    /// Channel is powered down and output pin is connected to ground through a 100K resistor.
    OneHundredKToGround = 2,
    /// Channel is powered down and output pin is left floating.
    ThreeState = 3,
}

// Container structs.

/// Values read back from the device.
///
/// Holds one code per channel in the requested [`ChannelMask`], in ascending channel order.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Readback {
    channels: ChannelMask,
    codes: [u16; 4],
}

impl Readback {
    pub(crate) const fn new(channels: ChannelMask, codes: [u16; 4]) -> Readback {
        Readback { channels, codes }
    }

    /// An empty readback, as returned for [`ChannelMask::NONE`].
    pub const fn empty() -> Readback {
        Readback::new(ChannelMask::NONE, [0; 4])
    }

    /// The channels this readback covers.
    pub const fn channels(&self) -> ChannelMask {
        self.channels
    }

    /// Number of codes, one per requested channel.
    pub const fn len(&self) -> usize {
        self.channels.count()
    }

    /// True if no channel was requested.
    pub const fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// The codes in the order the device sent them, which is ascending channel order.
    pub fn as_slice(&self) -> &[u16] {
        &self.codes[..self.len()]
    }

    /// The code read for `channel`, if it was part of the request.
    pub fn get(&self, channel: Channel) -> Option<u16> {
        self.iter()
            .find(|&(ch, _)| ch == channel)
            .map(|(_, code)| code)
    }

    /// Iterates over `(channel, code)` pairs from channel A to channel D.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, u16)> + '_ {
        self.channels.iter().zip(self.as_slice().iter().copied())
    }
}

impl Default for Readback {
    fn default() -> Self {
        Self::empty()
    }
}
