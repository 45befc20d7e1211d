use consts::*;

use crate::{consts, Afe4404, BusOperation, DelayNs, Error, OutputPin, TiaGain};

// 2.4 V full scale over the 16-bit equivalent resolution.
const ADC_VOLTS_PER_CODE: f32 = 2.4 / 65536.0;

impl<B: BusOperation, EN: OutputPin, T: DelayNs> Afe4404<B, EN, T> {
    /// This function reads one raw ADC sample. Each call is a fresh bus
    /// transaction; nothing is cached. Reads from the ADC result range
    /// (`LED2VAL` through `LED1_ALED1VAL`) are sign extended from the chip's
    /// 22-bit twos complement encoding.
    pub fn read_adc(&mut self, reg: u8) -> Result<i32, Error<B::Error>> {
        self.read_register(reg)
    }

    /// This function reads a sample through the chip's coarser 16-bit read mode:
    /// the 24-bit word shifted right by 6. Unlike `read_adc` no sign extension is
    /// applied; the chip only defines the sign bit for the 22-bit mode.
    pub fn read_adc16(&mut self, reg: u8) -> Result<i16, Error<B::Error>> {
        self.read_register16(reg)
    }

    /// This function reads one channel and converts the code to photodiode
    /// current in microamps, using the transimpedance gain recorded for the
    /// phase the register converts in: `LED1VAL` and `ALED1VAL` belong to
    /// phase 1, `LED2VAL` and `LED3VAL` to phase 2.
    ///
    /// The difference registers (`LED1_ALED1VAL`, `LED2_ALED2VAL`) mix both
    /// phases, so no single recorded gain applies; reading them through this
    /// function fails with `UnknownRegister`.
    pub fn read_current(&mut self, reg: u8) -> Result<f32, Error<B::Error>> {
        let val = self.read_adc(reg)?;

        let gain = match reg {
            LED1VAL | ALED1VAL => self.tia_gain_phase1,
            LED2VAL | LED3VAL => self.tia_gain_phase2,
            _ => return Err(Error::UnknownRegister),
        };

        let adc_voltage = val as f32 * ADC_VOLTS_PER_CODE;

        Ok(adc_voltage / (gain.megaohms() * 2.0))
    }
}
