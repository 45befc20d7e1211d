use embedded_hal::i2c::SevenBitAddress;

pub const AFE4404_DEFAULT_I2C_ADDRESS: SevenBitAddress = 0x58;

// Diagnosis / software reset
pub(crate) const DIAGNOSIS: u8 = 0x00;
pub(crate) const SW_RESET: u32 = 0x08;

// PRPCT ( timer counter ), bits 0-15 hold the PRF period in tick units
pub(crate) const PRPCT: u8 = 0x1D;

// Timer module enable / NUMAV ( # of times to sample and average )
pub(crate) const TIM_NUMAV: u8 = 0x1E;
pub(crate) const TIMEREN: u32 = 0x100;

// TIA gain, phase 2 ( LED2 / LED3 ) and phase 1 ( LED1 / Ambient1 )
pub(crate) const TIA_GAINS2: u8 = 0x20;
pub(crate) const TIA_GAINS1: u8 = 0x21;

// TIA feedback capacitor select, bits 3-5 of the gain registers.
// Code 2 selects 10 pF; codes 0-7 cover 5-25 pF.
pub(crate) const TIA_CAP_10PF: u32 = 2;

// LED1 drive start / end
pub(crate) const LED1_ST: u8 = 0x03;
pub(crate) const LED1_END: u8 = 0x04;

// Sample LED1 start / end
pub(crate) const SMPL_LED1_ST: u8 = 0x07;
pub(crate) const SMPL_LED1_END: u8 = 0x08;

// LED1 convert start / end
pub(crate) const LED1_CONV_ST: u8 = 0x11;
pub(crate) const LED1_CONV_END: u8 = 0x12;

// Sample Ambient1 start / end
pub(crate) const SMPL_AMB1_ST: u8 = 0x0B;
pub(crate) const SMPL_AMB1_END: u8 = 0x0C;

// Ambient1 convert start / end
pub(crate) const AMB1_CONV_ST: u8 = 0x13;
pub(crate) const AMB1_CONV_END: u8 = 0x14;

// LED2 drive start / end
pub(crate) const LED2_ST: u8 = 0x09;
pub(crate) const LED2_END: u8 = 0x0A;

// Sample LED2 start / end
pub(crate) const SMPL_LED2_ST: u8 = 0x01;
pub(crate) const SMPL_LED2_END: u8 = 0x02;

// LED2 convert start / end
pub(crate) const LED2_CONV_ST: u8 = 0x0D;
pub(crate) const LED2_CONV_END: u8 = 0x0E;

// Sample LED3 ( or Ambient2 ) start / end
pub(crate) const SMPL_LED3_ST: u8 = 0x05;
pub(crate) const SMPL_LED3_END: u8 = 0x06;

// LED3 ( or Ambient2 ) convert start / end
pub(crate) const LED3_CONV_ST: u8 = 0x0F;
pub(crate) const LED3_CONV_END: u8 = 0x10;

// LED3 drive start / end, set to 0 when LED3 is unused
pub(crate) const LED3LEDSTC: u8 = 0x36;
pub(crate) const LED3LEDENDC: u8 = 0x37;

// ADC reset phases 0-3 start / end
pub(crate) const ADC_RST_P0_ST: u8 = 0x15;
pub(crate) const ADC_RST_P0_END: u8 = 0x16;
pub(crate) const ADC_RST_P1_ST: u8 = 0x17;
pub(crate) const ADC_RST_P1_END: u8 = 0x18;
pub(crate) const ADC_RST_P2_ST: u8 = 0x19;
pub(crate) const ADC_RST_P2_END: u8 = 0x1A;
pub(crate) const ADC_RST_P3_ST: u8 = 0x1B;
pub(crate) const ADC_RST_P3_END: u8 = 0x1C;

// LED current control. 24-bit register, LED1 bits 0-5, LED2 bits 6-11,
// LED3 bits 12-17, 0.8 mA per step up to 50 mA at code 63.
pub(crate) const LED_CONFIG: u8 = 0x22;

// Global settings. The canned values below select the maximum LED current range.
pub(crate) const SETTINGS: u8 = 0x23;
pub(crate) const SETTINGS_MAX_LED_100MA: u32 = 0x124218;
pub(crate) const SETTINGS_MAX_LED_50MA: u32 = 0x104218;

// Clockout division
pub(crate) const CLKOUT: u8 = 0x29;

// Diagnostics flag, bit 0 reports a short across the photodiode
pub(crate) const PD_SHORT_FLAG: u8 = 0x30;

// PD disconnect / INP, INN settings / external clock division
pub(crate) const PD_INP_EXT: u8 = 0x31;

// PDN_CYCLE start / end, bits 0-15
pub(crate) const PDNCYCLESTC: u8 = 0x32;
pub(crate) const PDNCYCLEENDC: u8 = 0x33;

// Programmable start / end time for the ADC_RDY replacement trigger
pub(crate) const PROG_TG_STC: u8 = 0x34;
pub(crate) const PROG_TG_ENDC: u8 = 0x35;

// PRF clock division for the timing engine. Codes 1-3 are reserved,
// 0 runs at 4 MHz, 4-7 divide down to 2, 1, 0.5 and 0.25 MHz.
pub(crate) const CLKDIV_PRF: u8 = 0x39;

// Offset cancellation DAC. Four 6-bit channel slots in one 24-bit register,
// bit 5 of each slot is the polarity, bits 0-4 the magnitude (~0.47 mA/step).
pub(crate) const DAC_SETTING: u8 = 0x3A;
pub(crate) const OFFDAC_FIELD_MASK: u32 = 0x3F;
pub(crate) const OFFDAC_MAG_MAX: u8 = 15;

/// LED1 output code in twos complement.
pub const LED1VAL: u8 = 0x2C;

/// LED2 output code in twos complement.
pub const LED2VAL: u8 = 0x2A;

/// LED3 / Ambient2 output code in twos complement.
pub const LED3VAL: u8 = 0x2B;

/// Ambient1 output code in twos complement.
pub const ALED1VAL: u8 = 0x2D;

/// LED2 - Ambient2 difference in twos complement.
pub const LED2_ALED2VAL: u8 = 0x2E;

/// LED1 - Ambient1 difference in twos complement.
pub const LED1_ALED1VAL: u8 = 0x2F;

// ADC result address range; reads in this range are sign extended from 22 bits
pub(crate) const ADC_VALUE_FIRST: u8 = 0x2A;
pub(crate) const ADC_VALUE_LAST: u8 = 0x2F;
