//! Timing engine profiles.
//!
//! The AFE4404 timer engine runs one PRF period of PRPCT ticks and latches a set
//! of drive, sample, ADC reset and conversion windows inside it. The driver
//! ships the one profile the reference design uses (512 Hz pulse rate at the
//! 4 MHz internal clock); alternate window sets can be passed to
//! `init_with_profile` after they pass `is_valid`.

/// One timer-engine window, in PRF tick units.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    pub start: u16,
    pub end: u16,
}

impl Window {
    pub const fn new(start: u16, end: u16) -> Self {
        Window { start: start, end: end }
    }

    fn fits(&self, period: u16) -> bool {
        self.start <= self.end && self.end < period
    }
}

/// A full timing configuration for the acquisition engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingProfile {
    /// PRF period in tick units (PRPCT). 7812 gives 512 Hz at the 4 MHz clock.
    pub period: u16,
    pub led1_drive: Window,
    pub led1_sample: Window,
    pub led1_convert: Window,
    pub led2_drive: Window,
    pub led2_sample: Window,
    pub led2_convert: Window,
    pub led3_drive: Window,
    pub led3_sample: Window,
    pub led3_convert: Window,
    pub amb1_sample: Window,
    pub amb1_convert: Window,
    /// ADC reset phases 0-3, settling before the LED2, LED3, LED1 and Ambient1
    /// conversions respectively.
    pub adc_reset: [Window; 4],
    pub powerdown_cycle: Window,
    /// Number of samples averaged per conversion (NUMAV, 0-15).
    pub average_count: u8,
    /// PRF clock divider code (CLKDIV_PRF). Codes 1-3 are reserved.
    pub clock_divider: u8,
}

impl Default for TimingProfile {
    fn default() -> Self {
        TimingProfile {
            period: 7812,
            led1_drive: Window::new(800, 1198),
            led1_sample: Window::new(900, 1198),
            led1_convert: Window::new(6546, 7006),
            led2_drive: Window::new(0, 0),
            led2_sample: Window::new(100, 398),
            led2_convert: Window::new(5608, 6067),
            led3_drive: Window::new(400, 798),
            led3_sample: Window::new(500, 798),
            led3_convert: Window::new(6077, 6536),
            amb1_sample: Window::new(1300, 1598),
            amb1_convert: Window::new(7016, 7475),
            adc_reset: [
                Window::new(5600, 5606),
                Window::new(6069, 6075),
                Window::new(6538, 6544),
                Window::new(7008, 7014),
            ],
            powerdown_cycle: Window::new(7675, 7811),
            average_count: 3,
            clock_divider: 0,
        }
    }
}

impl TimingProfile {
    /// Checks the profile against the chip's phase rules: every window must sit
    /// inside the period, each ADC reset must settle before its conversion
    /// starts, and the averaging count and clock divider must hold encodable
    /// values.
    pub fn is_valid(&self) -> bool {
        let windows = [
            self.led1_drive,
            self.led1_sample,
            self.led1_convert,
            self.led2_drive,
            self.led2_sample,
            self.led2_convert,
            self.led3_drive,
            self.led3_sample,
            self.led3_convert,
            self.amb1_sample,
            self.amb1_convert,
            self.adc_reset[0],
            self.adc_reset[1],
            self.adc_reset[2],
            self.adc_reset[3],
            self.powerdown_cycle,
        ];
        if !windows.iter().all(|w| w.fits(self.period)) {
            return false;
        }

        let conversions = [
            self.led2_convert,
            self.led3_convert,
            self.led1_convert,
            self.amb1_convert,
        ];
        for (reset, convert) in self.adc_reset.iter().zip(conversions.iter()) {
            if reset.end >= convert.start {
                return false;
            }
        }

        if self.average_count > 15 {
            return false;
        }

        matches!(self.clock_divider, 0 | 4..=7)
    }
}
