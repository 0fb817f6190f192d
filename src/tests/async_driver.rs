use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use embedded_hal_mock::eh1::i2c::{Mock, Transaction};

use crate::*;

const NACK: ErrorKind = ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address);

#[tokio::test]
async fn set_value_async() {
    let mut i2c = Mock::new(&[Transaction::write(0x09, vec![0b00110100, 0x40, 0x00])]);
    let mut dac = AsyncAD569x::new(i2c.clone(), SubAddress::A1);
    assert_eq!(
        dac.set_value(Operation::WriteAndUpdate, ChannelMask::C, 0x4000)
            .await,
        Ok(())
    );
    i2c.done();
}

#[tokio::test]
async fn read_value_async() {
    let mut i2c = Mock::new(&[
        Transaction::write(0x08, vec![0b00001010]),
        Transaction::read(0x08, vec![0x00, 0x01, 0x12, 0x34]),
    ]);
    let mut dac = AsyncAD569x::new(i2c.clone(), SubAddress::A0);
    let readback = dac
        .read_value(Operation::NoOperation, Channel::B | Channel::D)
        .await
        .unwrap();
    assert_eq!(readback.as_slice(), &[0x0001, 0x1234]);
    i2c.done();
}

#[tokio::test]
async fn read_value_no_channels_async() {
    let mut i2c = Mock::new(&[Transaction::write(0x08, vec![0b00000000])]);
    let mut dac = AsyncAD569x::new(i2c.clone(), SubAddress::A0);
    let readback = dac
        .read_value(Operation::NoOperation, ChannelMask::NONE)
        .await
        .unwrap();
    assert!(readback.is_empty());
    i2c.done();
}

#[tokio::test]
async fn read_value_nack_async() {
    let mut i2c = Mock::new(&[Transaction::write(0x08, vec![0b00000001]).with_error(NACK)]);
    let mut dac = AsyncAD569x::new(i2c.clone(), SubAddress::A0);
    assert_eq!(
        dac.read_value(Operation::NoOperation, ChannelMask::A).await,
        Err(Error::BusNack(NACK))
    );
    i2c.done();
}

#[tokio::test]
async fn read_value_short_transfer_async() {
    let mut i2c = Mock::new(&[
        Transaction::write(0x08, vec![0b00000011]),
        Transaction::read(0x08, vec![0; 4]).with_error(ErrorKind::Other),
    ]);
    let mut dac = AsyncAD569x::new(i2c.clone(), SubAddress::A0);
    assert_eq!(
        dac.read_value(Operation::NoOperation, Channel::A | Channel::B)
            .await,
        Err(Error::TransferLengthMismatch {
            expected: 4,
            actual: 0
        })
    );
    i2c.done();
}

#[tokio::test]
async fn configuration_commands_async() {
    let mut i2c = Mock::new(&[
        Transaction::write(0x0a, vec![0b01000000, 0x00, 0b11100100]),
        Transaction::write(0x0a, vec![0b01010000, 0x00, 0b0101]),
        Transaction::write(0x0a, vec![0b01100000, 0x00, 0x00]),
    ]);
    let mut dac = AsyncAD569x::new(i2c.clone(), SubAddress::A2);
    assert_eq!(
        dac.set_power_down_mode(
            PowerDownMode::Normal,
            PowerDownMode::OneKToGround,
            PowerDownMode::OneHundredKToGround,
            PowerDownMode::ThreeState,
        )
        .await,
        Ok(())
    );
    assert_eq!(
        dac.set_ldac_mask(ChannelMask::from_bits_truncate(0b0101))
            .await,
        Ok(())
    );
    assert_eq!(dac.reset().await, Ok(()));
    i2c.done();
}

#[tokio::test]
async fn convenience_writes_async() {
    let mut i2c = Mock::new(&[
        Transaction::write(0x0b, vec![0b00011000, 0x00, 0x10]),
        Transaction::write(0x0b, vec![0b00101000, 0x00, 0x00]),
        Transaction::write(0x0b, vec![0b00111000, 0xff, 0x00]),
    ]);
    let mut dac = AsyncAD569x::try_new(i2c.clone(), 3).unwrap();
    assert_eq!(dac.write_input_register(ChannelMask::D, 0x0010).await, Ok(()));
    assert_eq!(dac.update_from_input_register(ChannelMask::D).await, Ok(()));
    assert_eq!(dac.write_and_update(ChannelMask::D, 0xff00).await, Ok(()));
    i2c.done();
}
