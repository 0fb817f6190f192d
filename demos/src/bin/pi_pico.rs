//! Ramps channels A and B of an AD569x in opposite directions and checks each step against the
//! readback. The on-board LED goes solid if a readback ever disagrees.
//!
//! Wiring: SDA on GP16, SCL on GP17, A1 and A0 tied to ground, LDAC tied high.
#![no_std]
#![no_main]

use ad569x::{AD569x, Channel, ChannelMask, Operation, PowerDownMode, SubAddress};
use embedded_hal::digital::OutputPin;
use fugit::RateExtU32;
use hal::pac;
use panic_halt as _;
use rp2040_hal as hal;
use rp2040_hal::Clock;
use rp_pico::entry;

const XTAL_FREQ_HZ: u32 = 12_000_000u32;
const RAMP_STEP: u16 = 0x1000;

#[entry]
fn main() -> ! {
    let mut pac = pac::Peripherals::take().unwrap();
    let core = pac::CorePeripherals::take().unwrap();
    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);
    let clocks = hal::clocks::init_clocks_and_plls(
        XTAL_FREQ_HZ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();
    let mut delay = cortex_m::delay::Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());

    let sio = hal::Sio::new(pac.SIO);
    let pins = rp_pico::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );
    let mut led = pins.led.into_push_pull_output();

    let i2c = hal::I2C::i2c0(
        pac.I2C0,
        pins.gpio16
            .into_function::<hal::gpio::FunctionI2C>()
            .into_pull_type::<hal::gpio::PullUp>(),
        pins.gpio17
            .into_function::<hal::gpio::FunctionI2C>()
            .into_pull_type::<hal::gpio::PullUp>(),
        400.kHz(),
        &mut pac.RESETS,
        &clocks.peripheral_clock,
    );

    let mut dac = AD569x::new(i2c, SubAddress::A0);
    dac.reset().unwrap();
    // C and D are unconnected.
    dac.set_power_down_mode(
        PowerDownMode::Normal,
        PowerDownMode::Normal,
        PowerDownMode::ThreeState,
        PowerDownMode::ThreeState,
    )
    .unwrap();

    let mut code: u16 = 0;
    loop {
        dac.write_input_register(ChannelMask::A, code).unwrap();
        dac.write_input_register(ChannelMask::B, !code).unwrap();
        dac.update_from_input_register(Channel::A | Channel::B)
            .unwrap();

        let readback = dac
            .read_value(Operation::NoOperation, Channel::A | Channel::B)
            .unwrap();
        if readback.as_slice() != [code, !code] {
            led.set_high().unwrap();
            loop {
                cortex_m::asm::wfi();
            }
        }

        led.set_high().unwrap();
        delay.delay_ms(50);
        led.set_low().unwrap();
        delay.delay_ms(200);
        code = code.wrapping_add(RAMP_STEP);
    }
}
