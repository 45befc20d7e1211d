use consts::*;
use crate::{consts, Afe4404, DelayNs, Error, I2c, OutputPin, SevenBitAddress, TiaGain};

pub trait BusOperation {
    type Error;
    fn read(&mut self, rbuf: &mut [u8]) -> Result<(), Self::Error>;
    fn write(&mut self, wbuf: &[u8]) -> Result<(), Self::Error>;
    fn write_read(&mut self, wbuf: &[u8], rbuf: &mut [u8]) -> Result<(), Self::Error>;
}

pub struct Afe4404I2c<P> {
    i2c: P,
    address: SevenBitAddress,
}

impl<P: I2c> Afe4404I2c<P> {
    pub(crate) fn new(i2c: P) -> Self {
        Afe4404I2c { i2c: i2c, address: AFE4404_DEFAULT_I2C_ADDRESS }
    }
}

impl<P: I2c> BusOperation for Afe4404I2c<P> {
    type Error = P::Error;

    #[inline]
    fn read(&mut self, rbuf: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.read(self.address, rbuf)?;

        Ok(())
    }

    #[inline]
    fn write(&mut self, wbuf: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(self.address, wbuf)?;

        Ok(())
    }

    // Address write without a stop condition, then the read: the register
    // reads of this chip rely on the repeated start in between.
    #[inline]
    fn write_read(&mut self, wbuf: &[u8], rbuf: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, wbuf, rbuf)?;

        Ok(())
    }
}

impl<P, EN, T> Afe4404<Afe4404I2c<P>, EN, T>
where
    P: I2c,
    EN: OutputPin,
    T: DelayNs,
{
    pub fn new_i2c(i2c: P, enable_pin: EN, tim: T) -> Result<Self, Error<P::Error>> {
        Ok(Afe4404 {
            enable_pin: enable_pin,
            bus: Afe4404I2c::new(i2c),
            tim: tim,
            tia_gain_phase1: TiaGain::R500k,
            tia_gain_phase2: TiaGain::R500k,
            offset_dac: 0,
        })
    }
}
