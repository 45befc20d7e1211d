use consts::*;

use crate::{
    consts, Afe4404, BusOperation, DelayNs, Error, OffsetChannel, OffsetPolarity, OutputPin,
    TiaGain, TiaPhase,
};

impl<B: BusOperation, EN: OutputPin, T: DelayNs> Afe4404<B, EN, T> {
    /// This function programs the three LED drive currents. Each value is a 6-bit
    /// step count at 0.8 mA per step (0 to 50 mA); the three fields are packed into
    /// one register write so the triple always applies atomically.
    ///
    /// # Arguments
    ///
    /// * `led1` : LED1 drive current steps, 0-63.
    /// * `led2` : LED2 drive current steps, 0-63.
    /// * `led3` : LED3 drive current steps, 0-63.
    pub fn set_led_current(&mut self, led1: u8, led2: u8, led3: u8) -> Result<(), Error<B::Error>> {
        if led1 > 63 || led2 > 63 || led3 > 63 {
            return Err(Error::InvalidParam);
        }

        let mut val: u32 = 0;
        val |= (led1 as u32) << 0; // LED1 address space -> bits 0-5
        val |= (led2 as u32) << 6; // LED2 address space -> bits 6-11
        val |= (led3 as u32) << 12; // LED3 address space -> bits 12-17
        self.write_register(LED_CONFIG, val)?;

        Ok(())
    }

    /// This function programs the transimpedance gain for one phase of the receive
    /// chain and records it for the code-to-current conversion. The feedback
    /// capacitor field is held at the 10 pF code; phase 2 additionally carries the
    /// separate-gain bit of its register.
    ///
    /// The recorded per-phase gain only updates once the register write went
    /// through.
    pub fn set_tia_gain(&mut self, phase: TiaPhase, gain: TiaGain) -> Result<(), Error<B::Error>> {
        let mut val: u32 = (TIA_CAP_10PF << 3) | gain.code();

        #[cfg(feature = "defmt")]
        defmt::debug!("tia gain set: {} {}", phase, gain);

        match phase {
            TiaPhase::Phase1 => {
                self.write_register(TIA_GAINS1, val)?;
                self.tia_gain_phase1 = gain;
            }
            TiaPhase::Phase2 => {
                val |= 1 << 15;
                self.write_register(TIA_GAINS2, val)?;
                self.tia_gain_phase2 = gain;
            }
        }

        Ok(())
    }

    /// This function programs the offset cancellation DAC for one optical channel,
    /// about 0.47 mA per magnitude step, `Negative` polarity sinking current. The
    /// other channels' slots of the shared register are preserved: the 24-bit
    /// shadow word is read-modify-written and rewritten in full on every call.
    ///
    /// A magnitude above 15 is clamped to 15. Use `set_offset_dac_checked` to fail
    /// on out-of-range input instead.
    pub fn set_offset_dac(
        &mut self,
        channel: OffsetChannel,
        polarity: OffsetPolarity,
        magnitude: u8,
    ) -> Result<(), Error<B::Error>> {
        let magnitude = if magnitude > OFFDAC_MAG_MAX { OFFDAC_MAG_MAX } else { magnitude };

        let mut field: u32 = magnitude as u32;
        if polarity == OffsetPolarity::Negative {
            field |= 1 << 5;
        }

        let shift = channel.field_shift();
        let val = (self.offset_dac & !(OFFDAC_FIELD_MASK << shift)) | (field << shift);
        self.write_register(DAC_SETTING, val)?;
        self.offset_dac = val;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "offset dac set: {} {} mag {} reg {=u32:x}",
            channel,
            polarity,
            magnitude,
            val
        );

        Ok(())
    }

    /// Strict variant of `set_offset_dac`: an out-of-range magnitude fails with
    /// `InvalidParam` instead of being clamped.
    pub fn set_offset_dac_checked(
        &mut self,
        channel: OffsetChannel,
        polarity: OffsetPolarity,
        magnitude: u8,
    ) -> Result<(), Error<B::Error>> {
        if magnitude > OFFDAC_MAG_MAX {
            return Err(Error::InvalidParam);
        }
        self.set_offset_dac(channel, polarity, magnitude)
    }

    /// This function reads the photodiode diagnostic flag. It reports true when the
    /// chip detected a short across the photodiode inputs.
    pub fn pd_short_flag(&mut self) -> Result<bool, Error<B::Error>> {
        let flag = self.read_register(PD_SHORT_FLAG)?;

        Ok(flag & 1 == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::Mock as PinMock;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    fn afe_with(
        i2c: &I2cMock,
        pin: &PinMock,
    ) -> crate::Afe4404<crate::Afe4404I2c<I2cMock>, PinMock, NoopDelay> {
        crate::Afe4404::new_i2c(i2c.clone(), pin.clone(), NoopDelay).unwrap()
    }

    #[test]
    fn led_current_packs_three_fields() {
        let mut i2c = I2cMock::new(&[I2cTransaction::write(
            AFE4404_DEFAULT_I2C_ADDRESS,
            vec![LED_CONFIG, 0x01, 0xE0, 0x05],
        )]);
        let mut pin = PinMock::new(&[]);

        let mut afe = afe_with(&i2c, &pin);
        afe.set_led_current(5, 0, 30).unwrap();

        i2c.done();
        pin.done();
    }

    #[test]
    fn led_current_out_of_range_is_rejected() {
        let mut i2c = I2cMock::new(&[]);
        let mut pin = PinMock::new(&[]);

        let mut afe = afe_with(&i2c, &pin);
        assert!(matches!(
            afe.set_led_current(64, 0, 0),
            Err(Error::InvalidParam)
        ));

        i2c.done();
        pin.done();
    }

    #[test]
    fn gain_index_above_seven_clamps_to_code_zero() {
        let mut i2c = I2cMock::new(&[I2cTransaction::write(
            AFE4404_DEFAULT_I2C_ADDRESS,
            vec![TIA_GAINS1, 0x00, 0x00, 0x10],
        )]);
        let mut pin = PinMock::new(&[]);

        let mut afe = afe_with(&i2c, &pin);
        afe.set_tia_gain(TiaPhase::Phase1, TiaGain::from_index(9)).unwrap();
        assert_eq!(afe.tia_gain_phase1, TiaGain::R500k);

        i2c.done();
        pin.done();
    }

    #[test]
    fn phase2_gain_carries_the_separate_gain_bit() {
        let mut i2c = I2cMock::new(&[I2cTransaction::write(
            AFE4404_DEFAULT_I2C_ADDRESS,
            vec![TIA_GAINS2, 0x00, 0x80, 0x15],
        )]);
        let mut pin = PinMock::new(&[]);

        let mut afe = afe_with(&i2c, &pin);
        afe.set_tia_gain(TiaPhase::Phase2, TiaGain::R10k).unwrap();
        assert_eq!(afe.tia_gain_phase2, TiaGain::R10k);

        i2c.done();
        pin.done();
    }

    #[test]
    fn offset_dac_slots_survive_other_channels() {
        let mut i2c = I2cMock::new(&[
            I2cTransaction::write(
                AFE4404_DEFAULT_I2C_ADDRESS,
                vec![DAC_SETTING, 0x15, 0x00, 0x00],
            ),
            I2cTransaction::write(
                AFE4404_DEFAULT_I2C_ADDRESS,
                vec![DAC_SETTING, 0x15, 0x00, 0x03],
            ),
        ]);
        let mut pin = PinMock::new(&[]);

        let mut afe = afe_with(&i2c, &pin);
        afe.set_offset_dac(OffsetChannel::Led2, OffsetPolarity::Negative, 10).unwrap();
        assert_eq!(afe.offset_dac, 0x150000);
        afe.set_offset_dac(OffsetChannel::Led3, OffsetPolarity::Positive, 3).unwrap();
        assert_eq!(afe.offset_dac, 0x150003);

        i2c.done();
        pin.done();
    }

    #[test]
    fn offset_dac_magnitude_clamps_to_fifteen() {
        let mut i2c = I2cMock::new(&[I2cTransaction::write(
            AFE4404_DEFAULT_I2C_ADDRESS,
            vec![DAC_SETTING, 0x00, 0x00, 0x0F],
        )]);
        let mut pin = PinMock::new(&[]);

        let mut afe = afe_with(&i2c, &pin);
        afe.set_offset_dac(OffsetChannel::Led3, OffsetPolarity::Positive, 99).unwrap();

        i2c.done();
        pin.done();
    }

    #[test]
    fn checked_offset_dac_rejects_out_of_range_magnitude() {
        let mut i2c = I2cMock::new(&[]);
        let mut pin = PinMock::new(&[]);

        let mut afe = afe_with(&i2c, &pin);
        assert!(matches!(
            afe.set_offset_dac_checked(OffsetChannel::Led1, OffsetPolarity::Positive, 16),
            Err(Error::InvalidParam)
        ));

        i2c.done();
        pin.done();
    }

    #[test]
    fn pd_short_flag_reads_bit_zero() {
        let mut i2c = I2cMock::new(&[I2cTransaction::write_read(
            AFE4404_DEFAULT_I2C_ADDRESS,
            vec![PD_SHORT_FLAG],
            vec![0x00, 0x00, 0x01],
        )]);
        let mut pin = PinMock::new(&[]);

        let mut afe = afe_with(&i2c, &pin);
        assert!(afe.pd_short_flag().unwrap());

        i2c.done();
        pin.done();
    }
}
