//! Board adapters over `embedded-hal` and `embedded-io`.
//!
//! [`GpioChannel`] renders tokens with nothing more than two output
//! pins, a delay source, and a serial writer: the tone is a bit-banged
//! square wave on the speaker pin. [`PushButton`] samples an active-low
//! key wired with a pull-up.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_io::Write;

use super::{KeyInput, OutputChannel};

/// Output channel driving real pins.
pub struct GpioChannel<SPK, LED, D, W> {
    speaker: SPK,
    led: LED,
    delay: D,
    serial: W,
}

impl<SPK, LED, D, W> GpioChannel<SPK, LED, D, W>
where
    SPK: OutputPin,
    LED: OutputPin,
    D: DelayNs,
    W: Write,
{
    pub fn new(speaker: SPK, led: LED, delay: D, serial: W) -> Self {
        Self {
            speaker,
            led,
            delay,
            serial,
        }
    }
}

impl<SPK, LED, D, W> OutputChannel for GpioChannel<SPK, LED, D, W>
where
    SPK: OutputPin,
    LED: OutputPin,
    D: DelayNs,
    W: Write,
{
    fn emit_tone(&mut self, freq_hz: u32, duration_ms: u32) {
        if freq_hz == 0 {
            self.delay.delay_ms(duration_ms);
            return;
        }

        let period_us = 1_000_000 / freq_hz;
        if period_us == 0 {
            self.delay.delay_ms(duration_ms);
            return;
        }

        let cycles = duration_ms.saturating_mul(1_000) / period_us;
        for _ in 0..cycles {
            let _ = self.speaker.set_high();
            self.delay.delay_us(period_us / 2);
            let _ = self.speaker.set_low();
            self.delay.delay_us(period_us / 2);
        }
    }

    fn emit_level(&mut self, on: bool) {
        if on {
            let _ = self.led.set_high();
        } else {
            let _ = self.led.set_low();
        }
    }

    fn emit_symbol_byte(&mut self, byte: u8) {
        let _ = self.serial.write_all(&[byte]);
    }

    fn pace(&mut self, duration_ms: u32) {
        self.delay.delay_ms(duration_ms);
    }
}

/// Active-low key input (pressed pulls the pin to ground).
pub struct PushButton<P> {
    pin: P,
}

impl<P: InputPin> PushButton<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> KeyInput for PushButton<P> {
    fn level(&mut self, _now_ms: u64) -> bool {
        // A read fault reads as released; the debouncer absorbs glitches
        self.pin.is_low().unwrap_or(false)
    }
}
