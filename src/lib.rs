//! # Rust driver for AD5696/AD5695/AD5694 4-channel I2C DACs
//!
//! This is a platform agnostic rust driver for the AD569x family of DACs using the [embedded-hal](https://github.com/rust-embedded/embedded-hal) traits.
//!
//! All three parts share one protocol and differ only in resolution.  The driver works on raw
//! 16-bit input codes and does not interpret them; on the 14-bit and 12-bit parts the code is left
//! justified, so the unused low bits are don't-cares.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(target_os = "linux")] {
//! use linux_embedded_hal::I2cdev;
//! use ad569x::{AD569x, Channel, Operation, SubAddress};
//!
//! let i2c = I2cdev::new("/dev/i2c-1").unwrap();
//! let mut dac = AD569x::new(i2c, SubAddress::A0);
//! dac.set_value(Operation::WriteAndUpdate, Channel::A.into(), 0x8000).unwrap();
//! let readback = dac.read_value(Operation::NoOperation, Channel::A.into()).unwrap();
//! assert_eq!(readback.get(Channel::A), Some(0x8000));
//! # }
//! ```
//!
//! # Features
//!
//!   - `sync` (default): [`AD569x`], built on [`embedded_hal::i2c::I2c`].
//!   - `async`: `AsyncAD569x`, built on `embedded_hal_async::i2c::I2c`, with the same methods.
//!   - `defmt`: derives `defmt::Format` for all public types and logs bus traffic through `defmt`.
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod codec;
mod types;

pub use crate::types::*;

#[cfg(feature = "sync")]
use embedded_hal::i2c::I2c;
#[cfg(feature = "async")]
use embedded_hal_async::i2c::I2c as AsyncI2c;

/// AD569x 4-channel 16-bit I2C DAC.
///
/// The driver keeps nothing but the bus and the device address, so every call is an independent
/// transaction and the output of a command never depends on earlier commands.
#[maybe_async_cfg::maybe(
    sync(feature = "sync", self = "AD569x"),
    async(feature = "async", keep_self)
)]
#[derive(Debug)]
pub struct AsyncAD569x<I> {
    i2c: I,
    address: u8,
}

/// Implementation of all commands given a generic I2C interface.
///
/// # Errors
///
/// Errors from the I2C device are wrapped in [`Error::BusNack`] if the device did not acknowledge,
/// and in [`Error::I2CError`] otherwise, except for the read phase of
/// [`read_value`](Self::read_value).  Nothing is retried.
#[maybe_async_cfg::maybe(
    sync(feature = "sync", self = "AD569x", idents(AsyncI2c(sync = "I2c"))),
    async(feature = "async", keep_self)
)]
impl<I: AsyncI2c> AsyncAD569x<I> {
    /// Creates a new driver for the device strapped to `sub_address`.
    pub fn new(i2c: I, sub_address: SubAddress) -> Self {
        Self {
            i2c,
            address: sub_address.bus_address(),
        }
    }

    /// Creates a new driver from a raw sub-address, as read from the A1 and A0 strapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSubAddress`] if `sub_address` is greater than 3.  The bus is dropped
    /// in that case; use [`SubAddress::try_from`] first to keep it.
    pub fn try_new(i2c: I, sub_address: u8) -> Result<Self, Error<I::Error>> {
        let sub_address = SubAddress::try_from(sub_address)?;
        Ok(Self::new(i2c, sub_address))
    }

    /// The 7-bit I2C address the driver talks to.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Destroy this instance and return the inner I2C bus.
    pub fn release(self) -> I {
        self.i2c
    }

    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error<I::Error>> {
        debug!("W @{:#x} {:#x}", self.address, bytes);
        self.i2c
            .write(self.address, bytes)
            .await
            .map_err(Error::from_bus)
    }

    /// Sends `operation` with `value` to every channel in `channels`.
    ///
    /// ```text
    /// || C3 C2 C1 C0 DD DC DB DA || D15 .. D8 || D7 .. D0 ||
    /// ```
    ///
    /// The command byte is sent as given; the device decides what to do with combinations such as
    /// [`Operation::UpdateDacFromInputRegister`] with a value, or an empty channel mask.
    pub async fn set_value(
        &mut self,
        operation: Operation,
        channels: ChannelMask,
        value: u16,
    ) -> Result<(), Error<I::Error>> {
        trace!("set_value");
        let bytes = codec::encode_write(operation, channels, value);
        self.write_bytes(&bytes).await
    }

    /// Writes `value` to the input registers of `channels`.
    ///
    /// # Updating the analog outputs
    ///
    /// This command writes to the input register but does not necessarily update the analog output.
    /// There are several ways to do so:
    ///
    ///   - If the LDAC pin is held low, the output is updated right away.
    ///   - If the LDAC pin is pulsed low, all channels not masked in the LDAC mask are updated.
    ///   - If the channel is set in the LDAC mask, the output is updated right away.
    ///   - [`update_from_input_register`](Self::update_from_input_register) updates the outputs.
    pub async fn write_input_register(
        &mut self,
        channels: ChannelMask,
        value: u16,
    ) -> Result<(), Error<I::Error>> {
        self.set_value(Operation::WriteInputRegister, channels, value)
            .await
    }

    /// Copies the input registers of `channels` into their DAC registers.
    pub async fn update_from_input_register(
        &mut self,
        channels: ChannelMask,
    ) -> Result<(), Error<I::Error>> {
        self.set_value(Operation::UpdateDacFromInputRegister, channels, 0)
            .await
    }

    /// Writes `value` to `channels` and updates their outputs immediately, regardless of LDAC.
    pub async fn write_and_update(
        &mut self,
        channels: ChannelMask,
        value: u16,
    ) -> Result<(), Error<I::Error>> {
        self.set_value(Operation::WriteAndUpdate, channels, value)
            .await
    }

    /// Reads back the input registers of `channels`.
    ///
    /// This is two separate transactions: a one byte command selecting the channels, then a read
    /// of two bytes per selected channel.  The result holds the codes in ascending channel order,
    /// so for `Channel::D | Channel::B` the code of channel B comes first.
    ///
    /// If no channel is selected the command is still sent, but nothing is read.
    ///
    /// # Errors
    ///
    /// If the command is not acknowledged the read is not attempted.  If the read fails, whatever
    /// was received is discarded.  A read the device cannot complete, other than a NACK or a bus
    /// fault, is reported as [`Error::TransferLengthMismatch`].
    pub async fn read_value(
        &mut self,
        operation: Operation,
        channels: ChannelMask,
    ) -> Result<Readback, Error<I::Error>> {
        trace!("read_value");
        let request = codec::encode_read_request(operation, channels);
        self.write_bytes(&request).await?;
        if channels.is_empty() {
            return Ok(Readback::empty());
        }

        let expected = codec::response_len(channels);
        let mut buffer = [0; codec::MAX_READBACK_LEN];
        let bytes = &mut buffer[..expected];
        self.i2c
            .read(self.address, bytes)
            .await
            .map_err(|e| Error::from_read(e, expected))?;
        debug!("R @{:#x} {:#x}", self.address, bytes);
        Ok(codec::decode_read_response(channels, bytes)?)
    }

    /// Writes the power down mode of all channels.
    ///
    /// In normal operation each channel draws about 0.59 mA at 5 V.  Powered down, the supply
    /// current falls to 4 µA.
    pub async fn set_power_down_mode(
        &mut self,
        mode_a: PowerDownMode,
        mode_b: PowerDownMode,
        mode_c: PowerDownMode,
        mode_d: PowerDownMode,
    ) -> Result<(), Error<I::Error>> {
        trace!("set_power_down_mode");
        let bytes = codec::encode_power_command(mode_a, mode_b, mode_c, mode_d);
        self.write_bytes(&bytes).await
    }

    /// Writes the LDAC mask register.
    ///
    /// Channels in `channels` ignore the LDAC pin and behave as if it were held low, so writes to
    /// their input registers update the outputs right away.  [`ChannelMask::NONE`] (the power-on
    /// default) hands every channel back to the pin.
    pub async fn set_ldac_mask(&mut self, channels: ChannelMask) -> Result<(), Error<I::Error>> {
        trace!("set_ldac_mask");
        let bytes = codec::encode_ldac_command(channels);
        self.write_bytes(&bytes).await
    }

    /// Issues a software reset.  The device returns to its power-on state and ignores LDAC while it
    /// does.
    pub async fn reset(&mut self) -> Result<(), Error<I::Error>> {
        trace!("reset");
        self.write_bytes(&codec::encode_reset_command()).await
    }
}

#[cfg(test)]
mod tests {
    mod codec;
    mod fake_i2c;

    #[cfg(feature = "async")]
    mod async_driver;

    #[cfg(feature = "sync")]
    mod sync_driver;
}
