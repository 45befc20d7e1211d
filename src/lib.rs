//! # AFE4404 driver
//!
//! This crate provides a platform-agnostic driver for the TI AFE4404 optical biosensing
//! (photoplethysmography) analog front-end.
//! The [TI page](https://www.ti.com/product/AFE4404) provides all necessary information.
//! This driver was built using the [embedded-hal](https://docs.rs/embedded-hal/latest/embedded_hal/) traits.
//! Ensure that the hardware abstraction layer of your target implements the embedded-hal traits.
//!
//! The device is addressed over I2C at address 0x58. Each register access is one address
//! byte followed by three big-endian value bytes; ADC result registers carry 22-bit twos
//! complement codes that this driver sign extends on read.
//!
//! ## Instantiating
//!
//! Create an instance of the driver with the `new_i2c` associated function, by passing the
//! i2c bus, the enable pin and a delay provider, then bring the timing engine up with `init`.
//!
//! ### Setup:
//! ```rust,no_run
//! use afe4404::Afe4404;
//! use afe4404::consts::LED1VAL;
//!
//! let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! let enable_pin = embedded_hal_mock::eh1::digital::Mock::new(&[]);
//! let delay = embedded_hal_mock::eh1::delay::NoopDelay;
//!
//! let mut afe = Afe4404::new_i2c(i2c, enable_pin, delay).unwrap();
//! afe.init().unwrap();
//! ```
//!
//! ### Loop:
//! ```rust,no_run
//! # use afe4404::Afe4404;
//! # use afe4404::consts::LED1VAL;
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! # let enable_pin = embedded_hal_mock::eh1::digital::Mock::new(&[]);
//! # let delay = embedded_hal_mock::eh1::delay::NoopDelay;
//! # let mut afe = Afe4404::new_i2c(i2c, enable_pin, delay).unwrap();
//! loop {
//!     let _current = afe.read_current(LED1VAL).unwrap(); // Photodiode current in uA
//!     // Feed the sample into the pulse-detection stage
//! }
//! ```
//!
//! ## Timing profiles
//!
//! `init` programs the one fixed 512 Hz timing profile the driver ships. An alternate
//! window set can be supplied with `init_with_profile`; it is checked against the chip's
//! phase ordering rules before any register is written.

#![no_std]
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod accessors;
pub mod bus_operation;
pub mod calibration;
pub mod consts;
pub mod profile;

use accessors::*;
use bus_operation::*;
use calibration::*;
use consts::*;
use profile::*;

use embedded_hal::{
    delay::DelayNs,
    digital::OutputPin,
    i2c::{I2c, SevenBitAddress},
};

#[cfg(test)]
#[macro_use]
extern crate std;

pub struct Afe4404<B: BusOperation, EN: OutputPin, T: DelayNs> {
    pub(crate) enable_pin: EN,
    pub(crate) bus: B,
    pub(crate) tim: T,
    pub(crate) tia_gain_phase1: TiaGain,
    pub(crate) tia_gain_phase2: TiaGain,
    pub(crate) offset_dac: u32,
}

#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<B> {
    Bus(B),
    InvalidParam,
    UnknownRegister,
}

/// Transimpedance amplifier feedback resistance, codes 0-7 of the gain registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TiaGain {
    R500k = 0,
    R250k = 1,
    R100k = 2,
    R50k = 3,
    R25k = 4,
    R10k = 5,
    R1M = 6,
    R2M = 7,
}

impl TiaGain {
    /// Builds a gain from a raw register index. Indices above 7 fall back to
    /// `R500k` (code 0), matching the chip reset value.
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => TiaGain::R500k,
            1 => TiaGain::R250k,
            2 => TiaGain::R100k,
            3 => TiaGain::R50k,
            4 => TiaGain::R25k,
            5 => TiaGain::R10k,
            6 => TiaGain::R1M,
            7 => TiaGain::R2M,
            _ => TiaGain::R500k,
        }
    }

    pub(crate) fn code(self) -> u32 {
        self as u32
    }

    /// Feedback resistance in megaohms, used for the code-to-current conversion.
    pub(crate) fn megaohms(self) -> f32 {
        match self {
            TiaGain::R500k => 0.5,
            TiaGain::R250k => 0.25,
            TiaGain::R100k => 0.1,
            TiaGain::R50k => 0.05,
            TiaGain::R25k => 0.025,
            TiaGain::R10k => 0.01,
            TiaGain::R1M => 1.0,
            TiaGain::R2M => 2.0,
        }
    }
}

/// Receive-chain gain phase. LED1 and Ambient1 samples convert during phase 1,
/// LED2 and LED3 during phase 2.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TiaPhase {
    Phase1,
    Phase2,
}

/// Optical channel slot of the offset cancellation DAC register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OffsetChannel {
    Ambient1,
    Led1,
    Led2,
    Led3,
}

impl OffsetChannel {
    pub(crate) fn field_shift(self) -> u32 {
        match self {
            OffsetChannel::Led3 => 0,
            OffsetChannel::Led1 => 5,
            OffsetChannel::Ambient1 => 10,
            OffsetChannel::Led2 => 15,
        }
    }
}

/// Offset cancellation polarity. `Negative` sinks current away from the photodiode input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OffsetPolarity {
    Positive,
    Negative,
}

/// Builds the 4-byte write frame: address byte followed by the 24-bit value,
/// most significant byte first.
pub(crate) fn encode_write(reg: u8, value: u32) -> [u8; 4] {
    [reg, (value >> 16) as u8, (value >> 8) as u8, value as u8]
}

/// Reassembles a 3-byte read big-endian. Reads from the ADC result range are
/// sign extended: with bit 21 set the value is masked to 22 bits and extended
/// to a negative 32-bit twos complement value.
pub(crate) fn decode_read(reg: u8, rbuf: [u8; 3]) -> i32 {
    let raw: u32 = (rbuf[0] as u32) << 16 | (rbuf[1] as u32) << 8 | rbuf[2] as u32;

    if reg >= ADC_VALUE_FIRST && reg <= ADC_VALUE_LAST && raw & 0x00200000 != 0 {
        ((raw & 0x003FFFFF) ^ 0xFFC00000) as i32
    } else {
        raw as i32
    }
}

/// Reassembles a 3-byte read and truncates it to the chip's 16-bit read mode:
/// the 24-bit value shifted right by 6. No sign handling is applied; only the
/// 22-bit mode is sign extended.
pub(crate) fn decode_read16(rbuf: [u8; 3]) -> i16 {
    let raw: u32 = (rbuf[0] as u32) << 16 | (rbuf[1] as u32) << 8 | rbuf[2] as u32;

    ((raw >> 6) & 0xFFFF) as i16
}

impl<B: BusOperation, EN: OutputPin, T: DelayNs> Afe4404<B, EN, T> {
    pub(crate) fn write_register(&mut self, reg: u8, value: u32) -> Result<(), Error<B::Error>> {
        self.bus.write(&encode_write(reg, value)).map_err(Error::Bus)?;
        Ok(())
    }

    pub(crate) fn read_register(&mut self, reg: u8) -> Result<i32, Error<B::Error>> {
        let mut rbuf: [u8; 3] = [0; 3];
        self.bus.write_read(&[reg], &mut rbuf).map_err(Error::Bus)?;
        Ok(decode_read(reg, rbuf))
    }

    pub(crate) fn read_register16(&mut self, reg: u8) -> Result<i16, Error<B::Error>> {
        let mut rbuf: [u8; 3] = [0; 3];
        self.bus.write_read(&[reg], &mut rbuf).map_err(Error::Bus)?;
        Ok(decode_read16(rbuf))
    }

    /// Utility function to wait.
    ///
    /// # Arguments
    ///
    /// * `ms` : milliseconds to wait.
    pub(crate) fn delay(&mut self, ms: u32) {
        self.tim.delay_ms(ms);
    }

    /// Asserts the enable line and waits for the analog supplies to settle.
    pub fn enable(&mut self) -> Result<(), Error<B::Error>> {
        self.enable_pin.set_high().unwrap();
        self.delay(10);
        Ok(())
    }

    /// Deasserts the enable line. No register is rewritten; resuming requires a
    /// full `init` from reset.
    pub fn power_down(&mut self) -> Result<(), Error<B::Error>> {
        self.enable_pin.set_low().unwrap();
        Ok(())
    }

    /// This function is used to initialize the device with the shipped 512 Hz
    /// timing profile, then apply the default LED current, gain and offset
    /// cancellation settings.
    pub fn init(&mut self) -> Result<(), Error<B::Error>> {
        self.init_with_profile(&TimingProfile::default())
    }

    /// Initializes the device from a caller-supplied timing profile. The profile
    /// is checked against the chip's phase ordering rules before the enable line
    /// is touched; an incoherent profile fails with `InvalidParam`.
    ///
    /// The diagnosis reset is issued first; if any later write fails the device
    /// is left partially configured and `init` must be re-run from scratch.
    pub fn init_with_profile(&mut self, profile: &TimingProfile) -> Result<(), Error<B::Error>> {
        if !profile.is_valid() {
            return Err(Error::InvalidParam);
        }

        self.enable()?;

        self.write_register(DIAGNOSIS, SW_RESET)?;

        // The reset also clears the chip side of the session state
        self.tia_gain_phase1 = TiaGain::R500k;
        self.tia_gain_phase2 = TiaGain::R500k;
        self.offset_dac = 0;

        self.write_register(SETTINGS, SETTINGS_MAX_LED_100MA)?;

        self.write_register(PRPCT, profile.period as u32)?;

        // LED2, sampled as ambient in the shipped profile
        self.write_register(LED2_ST, profile.led2_drive.start as u32)?;
        self.write_register(LED2_END, profile.led2_drive.end as u32)?;
        self.write_register(SMPL_LED2_ST, profile.led2_sample.start as u32)?;
        self.write_register(SMPL_LED2_END, profile.led2_sample.end as u32)?;
        self.write_register(ADC_RST_P0_ST, profile.adc_reset[0].start as u32)?;
        self.write_register(ADC_RST_P0_END, profile.adc_reset[0].end as u32)?;
        self.write_register(LED2_CONV_ST, profile.led2_convert.start as u32)?;
        self.write_register(LED2_CONV_END, profile.led2_convert.end as u32)?;

        // LED3 / Ambient2
        self.write_register(LED3LEDSTC, profile.led3_drive.start as u32)?;
        self.write_register(LED3LEDENDC, profile.led3_drive.end as u32)?;
        self.write_register(SMPL_LED3_ST, profile.led3_sample.start as u32)?;
        self.write_register(SMPL_LED3_END, profile.led3_sample.end as u32)?;
        self.write_register(ADC_RST_P1_ST, profile.adc_reset[1].start as u32)?;
        self.write_register(ADC_RST_P1_END, profile.adc_reset[1].end as u32)?;
        self.write_register(LED3_CONV_ST, profile.led3_convert.start as u32)?;
        self.write_register(LED3_CONV_END, profile.led3_convert.end as u32)?;

        // LED1
        self.write_register(LED1_ST, profile.led1_drive.start as u32)?;
        self.write_register(LED1_END, profile.led1_drive.end as u32)?;
        self.write_register(SMPL_LED1_ST, profile.led1_sample.start as u32)?;
        self.write_register(SMPL_LED1_END, profile.led1_sample.end as u32)?;
        self.write_register(ADC_RST_P2_ST, profile.adc_reset[2].start as u32)?;
        self.write_register(ADC_RST_P2_END, profile.adc_reset[2].end as u32)?;
        self.write_register(LED1_CONV_ST, profile.led1_convert.start as u32)?;
        self.write_register(LED1_CONV_END, profile.led1_convert.end as u32)?;

        // Ambient1
        self.write_register(SMPL_AMB1_ST, profile.amb1_sample.start as u32)?;
        self.write_register(SMPL_AMB1_END, profile.amb1_sample.end as u32)?;
        self.write_register(ADC_RST_P3_ST, profile.adc_reset[3].start as u32)?;
        self.write_register(ADC_RST_P3_END, profile.adc_reset[3].end as u32)?;
        self.write_register(AMB1_CONV_ST, profile.amb1_convert.start as u32)?;
        self.write_register(AMB1_CONV_END, profile.amb1_convert.end as u32)?;

        self.write_register(PDNCYCLESTC, profile.powerdown_cycle.start as u32)?;
        self.write_register(PDNCYCLEENDC, profile.powerdown_cycle.end as u32)?;

        self.write_register(TIM_NUMAV, TIMEREN | profile.average_count as u32)?;
        self.write_register(CLKDIV_PRF, profile.clock_divider as u32)?;

        self.set_led_current(5, 0, 30)?;

        self.set_tia_gain(TiaPhase::Phase1, TiaGain::R100k)?;
        self.set_tia_gain(TiaPhase::Phase2, TiaGain::R10k)?;

        self.set_offset_dac(OffsetChannel::Led1, OffsetPolarity::Negative, 10)?;
        self.set_offset_dac(OffsetChannel::Led2, OffsetPolarity::Positive, 10)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    use std::vec::Vec;

    fn write_frame(reg: u8, value: u32) -> I2cTransaction {
        I2cTransaction::write(AFE4404_DEFAULT_I2C_ADDRESS, Vec::from(encode_write(reg, value)))
    }

    fn init_writes() -> Vec<I2cTransaction> {
        let seq: [(u8, u32); 42] = [
            (DIAGNOSIS, 0x08),
            (SETTINGS, 0x124218),
            (PRPCT, 7812),
            (LED2_ST, 0),
            (LED2_END, 0),
            (SMPL_LED2_ST, 100),
            (SMPL_LED2_END, 398),
            (ADC_RST_P0_ST, 5600),
            (ADC_RST_P0_END, 5606),
            (LED2_CONV_ST, 5608),
            (LED2_CONV_END, 6067),
            (LED3LEDSTC, 400),
            (LED3LEDENDC, 798),
            (SMPL_LED3_ST, 500),
            (SMPL_LED3_END, 798),
            (ADC_RST_P1_ST, 6069),
            (ADC_RST_P1_END, 6075),
            (LED3_CONV_ST, 6077),
            (LED3_CONV_END, 6536),
            (LED1_ST, 800),
            (LED1_END, 1198),
            (SMPL_LED1_ST, 900),
            (SMPL_LED1_END, 1198),
            (ADC_RST_P2_ST, 6538),
            (ADC_RST_P2_END, 6544),
            (LED1_CONV_ST, 6546),
            (LED1_CONV_END, 7006),
            (SMPL_AMB1_ST, 1300),
            (SMPL_AMB1_END, 1598),
            (ADC_RST_P3_ST, 7008),
            (ADC_RST_P3_END, 7014),
            (AMB1_CONV_ST, 7016),
            (AMB1_CONV_END, 7475),
            (PDNCYCLESTC, 7675),
            (PDNCYCLEENDC, 7811),
            (TIM_NUMAV, 0x103),
            (CLKDIV_PRF, 0),
            (LED_CONFIG, 0x01E005),
            (TIA_GAINS1, 0x12),
            (TIA_GAINS2, 0x8015),
            (DAC_SETTING, 0x540),
            (DAC_SETTING, 0x50540),
        ];
        seq.iter().map(|&(reg, value)| write_frame(reg, value)).collect()
    }

    #[test]
    fn write_frame_is_big_endian() {
        assert_eq!(encode_write(SETTINGS, 0x124218), [0x23, 0x12, 0x42, 0x18]);
    }

    #[test]
    fn write_frame_drops_bits_above_24() {
        assert_eq!(encode_write(PRPCT, 0xAB001E84), [0x1D, 0x00, 0x1E, 0x84]);
    }

    #[test]
    fn adc_code_with_bit21_set_is_negative() {
        assert_eq!(decode_read(LED1VAL, [0x20, 0x00, 0x00]), -2097152);
    }

    #[test]
    fn adc_code_with_bit21_clear_is_unchanged() {
        assert_eq!(decode_read(LED1VAL, [0x00, 0x27, 0x10]), 10000);
    }

    #[test]
    fn config_register_is_never_sign_extended() {
        assert_eq!(decode_read(SETTINGS, [0x20, 0x00, 0x00]), 0x200000);
    }

    #[test]
    fn read16_shifts_out_the_low_bits() {
        assert_eq!(decode_read16([0x12, 0x34, 0x56]), 0x48D1);
    }

    #[test]
    fn read_register_reassembles_big_endian() {
        let mut i2c = I2cMock::new(&[I2cTransaction::write_read(
            AFE4404_DEFAULT_I2C_ADDRESS,
            vec![LED1VAL],
            vec![0x00, 0x27, 0x10],
        )]);
        let mut pin = PinMock::new(&[]);

        let mut afe = Afe4404::new_i2c(i2c.clone(), pin.clone(), NoopDelay).unwrap();
        assert_eq!(afe.read_register(LED1VAL).unwrap(), 10000);

        i2c.done();
        pin.done();
    }

    #[test]
    fn init_twice_repeats_the_identical_sequence() {
        let mut expected = init_writes();
        expected.extend(init_writes());
        let mut i2c = I2cMock::new(&expected);
        let mut pin = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::High),
        ]);

        let mut afe = Afe4404::new_i2c(i2c.clone(), pin.clone(), NoopDelay).unwrap();
        afe.init().unwrap();
        afe.init().unwrap();

        assert_eq!(afe.tia_gain_phase1, TiaGain::R100k);
        assert_eq!(afe.tia_gain_phase2, TiaGain::R10k);
        assert_eq!(afe.offset_dac, 0x50540);

        i2c.done();
        pin.done();
    }

    #[test]
    fn power_down_only_releases_the_enable_line() {
        let mut i2c = I2cMock::new(&[]);
        let mut pin = PinMock::new(&[PinTransaction::set(PinState::Low)]);

        let mut afe = Afe4404::new_i2c(i2c.clone(), pin.clone(), NoopDelay).unwrap();
        afe.power_down().unwrap();

        i2c.done();
        pin.done();
    }
}
