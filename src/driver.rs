//! MCU-side ADS1x18 sampling
//!
//! The converter runs continuously. Every exchange writes the configuration of the next
//! conversion and shifts out the result of the conversion that just completed, so the result
//! returned by one [Sampler::poll] belongs to the channel started by the previous one.
//!
//! The bus must be configured for SPI mode 1 ([spi::MODE_1]).
use embedded_hal::spi::{self, SpiDevice};

use crate::{
    convert::AdcCode,
    mcu::Response,
    register::{Config, DataRate, Input},
    ConfigError,
};

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("SPI")]
    Bus(spi::ErrorKind),
}

impl<E: spi::Error> From<E> for Error {
    fn from(value: E) -> Self {
        Self::Bus(value.kind())
    }
}

#[derive(Clone, Debug)]
pub struct Ads1x18<B> {
    bus: B,
}

impl<B: SpiDevice<u8>> Ads1x18<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Write `config` and read back the previous conversion result and the config readback.
    ///
    /// The 32-bit transaction repeats the config word, the second half shifts out the
    /// register contents.
    pub fn exchange(&mut self, config: Config) -> Result<(AdcCode, Config), Error> {
        let [hi, lo] = config.raw_value().to_be_bytes();
        let mut msg = [hi, lo, hi, lo];
        self.bus.transfer_in_place(&mut msg)?;
        Ok((
            AdcCode(u16::from_be_bytes([msg[0], msg[1]])),
            Config::new_with_raw_value(u16::from_be_bytes([msg[2], msg[3]])),
        ))
    }

    pub fn release(self) -> B {
        self.bus
    }
}

/// Round-robin scheduler over the die temperature and the thermocouple inputs.
///
/// Sensor index 0 is the die temperature, index `i` the `i`-th added input, matching the order
/// of the `add_sensor_ads1x18` commands.
pub struct Sampler<const N: usize = 9> {
    configs: heapless::Vec<Config, N>,
    next: usize,
    pending: Option<usize>,
    temperature: u16,
}

impl<const N: usize> Sampler<N> {
    pub fn new(data_rate: DataRate) -> Self {
        let mut configs = heapless::Vec::new();
        // N > 0
        configs.push(Config::temperature_sensor(data_rate)).ok();
        Self {
            configs,
            next: 0,
            pending: None,
            temperature: 0,
        }
    }

    /// Append an input. Returns its sensor index.
    pub fn add_sensor(&mut self, input: Input) -> Result<u8, ConfigError> {
        self.configs
            .push(input.config())
            .map_err(|_| ConfigError::Capacity("thermocouple channel"))?;
        Ok(self.configs.len() as u8 - 1)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Start the next conversion and collect the one that completed.
    ///
    /// Returns `None` on the first call. The die temperature code carried in each response is
    /// the latest one seen.
    pub fn poll<B: SpiDevice<u8>>(
        &mut self,
        adc: &mut Ads1x18<B>,
    ) -> Result<Option<Response>, Error> {
        let Some(&config) = self.configs.get(self.next) else {
            return Ok(None);
        };
        let (code, _readback) = adc.exchange(config)?;
        let started = self.next;
        self.next = (self.next + 1) % self.configs.len();
        let Some(sensor) = self.pending.replace(started) else {
            return Ok(None);
        };
        if sensor == 0 {
            self.temperature = code.0;
        }
        // Runs on the MCU, which installs the global logger.
        log::trace!("ads1x18 sensor {sensor}: {:#06x}", code.0);
        Ok(Some(Response {
            sensor: sensor as u8,
            value: code.0,
            temperature: self.temperature,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::{Mux, Pga};
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorType, Operation};

    /// Continuous-mode converter model: inputs read `100 * mux`, the die reads 25 °C.
    #[derive(Default)]
    struct Fake {
        config: u16,
        result: u16,
        written: std::vec::Vec<u16>,
    }

    impl ErrorType for Fake {
        type Error = Infallible;
    }

    impl SpiDevice<u8> for Fake {
        fn transaction(
            &mut self,
            operations: &mut [Operation<'_, u8>],
        ) -> Result<(), Infallible> {
            for op in operations {
                if let Operation::TransferInPlace(buf) = op {
                    assert_eq!(buf.len(), 4);
                    assert_eq!(buf[..2], buf[2..]);
                    let config = u16::from_be_bytes([buf[0], buf[1]]);
                    let [r0, r1] = self.result.to_be_bytes();
                    let [c0, c1] = self.config.to_be_bytes();
                    buf.copy_from_slice(&[r0, r1, c0, c1]);
                    self.written.push(config);
                    self.config = config;
                    let config = Config::new_with_raw_value(config);
                    self.result = if config.temperature() {
                        800 << 2
                    } else {
                        config.mux().raw_value().value() as u16 * 100
                    };
                }
            }
            Ok(())
        }
    }

    fn input(mux: Mux) -> Input {
        Input {
            mux,
            pga: Pga::Fs0v256,
            data_rate: DataRate::Dr4,
        }
    }

    #[test]
    fn exchange() {
        let mut adc = Ads1x18::new(Fake {
            config: 0x058b,
            result: 0x8000,
            ..Default::default()
        });
        let (code, readback) =
            adc.exchange(Config::temperature_sensor(DataRate::Dr4)).unwrap();
        assert_eq!(code, AdcCode(0x8000));
        assert_eq!(readback, Config::default());
        assert_eq!(adc.release().written, [0x049b]);
    }

    #[test]
    fn pipeline() {
        let mut sampler: Sampler = Sampler::new(DataRate::Dr4);
        assert_eq!(sampler.add_sensor(input(Mux::Ain2Ain3)), Ok(1));
        assert_eq!(sampler.add_sensor(input(Mux::Ain0Ain1)), Ok(2));
        assert_eq!(sampler.len(), 3);
        let mut adc = Ads1x18::new(Fake::default());

        assert_eq!(sampler.poll(&mut adc), Ok(None));
        let responses: std::vec::Vec<_> = (0..4)
            .map(|_| sampler.poll(&mut adc).unwrap().unwrap())
            .collect();
        let r = |sensor, value| Response {
            sensor,
            value,
            temperature: 0x0c80,
        };
        assert_eq!(responses, [r(0, 0x0c80), r(1, 300), r(2, 0), r(0, 0x0c80)]);
        assert_eq!(
            adc.release().written[..3],
            [0x049b, 0x3a8b, 0x0a8b]
        );
    }

    #[test]
    fn capacity() {
        let mut sampler = Sampler::<2>::new(DataRate::Dr0);
        assert_eq!(sampler.add_sensor(input(Mux::Ain0)), Ok(1));
        assert_eq!(
            sampler.add_sensor(input(Mux::Ain1)),
            Err(ConfigError::Capacity("thermocouple channel"))
        );
    }
}
