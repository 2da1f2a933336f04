//! Channel registry and response router
//!
//! A [Device] collects the thermocouple channels and internal sensor subscribers configured for
//! one ADS1x18, emits the MCU configuration once all objects exist and then routes each
//! `ads1x18_result` response to the sensor that owns the reported index.
//!
//! Index 0 is the die temperature stream shared by all internal sensors. Thermocouple channel
//! `i` is the `i`-th registered channel, starting at 1.
use core::fmt::Write;

use crate::{
    config::{device_name, ChannelConfig, ConfigSection, DeviceConfig},
    convert::{AdcCode, TemperatureCode},
    mcu::{
        Clock, Command, Factory, Mcu, Oid, Response, SensorFactories, Spi,
        RESPONSE, RESPONSE_INTERVAL,
    },
    register::{Chip, DataRate, Input, Pga},
    sensor::{
        ColdJunction, Internal, Reading, Report, Sensor, ThermocoupleK,
        REPORT_TIME,
    },
    sink::GlobalLogger,
    ConfigError, Error,
};

/// Default number of thermocouple channels per device, one per MUX setting.
pub const MAX_CHANNELS: usize = 8;

/// Default number of internal temperature subscribers per device.
pub const MAX_SUBSCRIBERS: usize = 4;

pub type Name = heapless::String<32>;

/// Handle of a sensor owned by a [Device].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SensorId {
    /// Subscriber slot of the die temperature stream.
    Internal(usize),
    /// Thermocouple channel index (1-based).
    Thermocouple(u8),
}

/// A registered thermocouple channel.
pub struct Channel<R> {
    index: u8,
    input: Input,
    sensor: Sensor<R>,
}

impl<R> Channel<R> {
    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn input(&self) -> Input {
        self.input
    }

    pub fn sensor(&self) -> &Sensor<R> {
        &self.sensor
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Unconfigured,
    Configured { report_clock: u64 },
}

/// One ADS1x18 with up to `N` thermocouple channels and `S` internal temperature subscribers.
pub struct Device<
    M,
    C,
    R,
    L = GlobalLogger,
    const N: usize = MAX_CHANNELS,
    const S: usize = MAX_SUBSCRIBERS,
> {
    name: Name,
    chip: Chip,
    data_rate: DataRate,
    cold_junction: ColdJunction,
    oid: Oid,
    spi: Spi,
    mcu: M,
    clock: C,
    log: L,
    die: heapless::Vec<Sensor<R>, S>,
    channels: heapless::Vec<Channel<R>, N>,
    state: State,
}

impl<M: Mcu, C: Clock, R, L: log::Log, const N: usize, const S: usize>
    Device<M, C, R, L, N, S>
{
    /// Create a device and register it with the MCU.
    ///
    /// Allocates the device oid, subscribes to [RESPONSE] for it and requests the
    /// [Device::build_config] callback.
    pub fn new(
        name: &str,
        config: DeviceConfig,
        spi: Spi,
        mut mcu: M,
        clock: C,
        logger: L,
    ) -> Result<Self, Error> {
        let name = Name::try_from(name).map_err(|_| ConfigError::Name)?;
        if name.is_empty() {
            return Err(ConfigError::Name.into());
        }
        let data_rate = config.data_rate()?;
        let chip = *config.chip;
        let oid = mcu.create_oid();
        mcu.register_response(RESPONSE, oid);
        mcu.register_config_callback(oid);
        log::debug!(
            logger: logger,
            "{name}: {chip:?} ({} bit) oid={oid} spi_oid={}",
            chip.precision(),
            spi.oid()
        );
        Ok(Self {
            name,
            chip,
            data_rate,
            cold_junction: *config.cold_junction,
            oid,
            spi,
            mcu,
            clock,
            log: logger,
            die: heapless::Vec::new(),
            channels: heapless::Vec::new(),
            state: State::Unconfigured,
        })
    }

    /// Create a device from its `ads1x18 <name>` configuration section.
    pub fn from_section(
        section: &impl ConfigSection,
        spi: Spi,
        mcu: M,
        clock: C,
        logger: L,
    ) -> Result<Self, Error> {
        let name = device_name(section)?;
        let config = DeviceConfig::from_section(section)?;
        Self::new(name, config, spi, mcu, clock, logger)
    }

    /// Register the thermocouple (`<name>`) and internal (`<name>_temp`) sensor factories.
    pub fn register_factories(
        &self,
        factories: &mut impl SensorFactories,
    ) -> Result<(), Error> {
        factories.add_sensor_factory(&self.name, Factory::Thermocouple)?;
        let mut temp = heapless::String::<40>::new();
        write!(temp, "{}_temp", self.name)?;
        factories.add_sensor_factory(&temp, Factory::Internal)
    }

    /// Create a sensor for a section requesting one of this device's factories.
    pub fn create_sensor(
        &mut self,
        factory: Factory,
        section: &impl ConfigSection,
    ) -> Result<SensorId, Error> {
        Ok(match factory {
            Factory::Thermocouple => self.add_sensor(section)?,
            Factory::Internal => self.add_temp_sensor()?,
        })
    }

    /// Create a thermocouple sensor from the channel options of `section`.
    pub fn add_sensor(
        &mut self,
        section: &impl ConfigSection,
    ) -> Result<SensorId, ConfigError> {
        let channel = ChannelConfig::from_section(section)?;
        self.register_thermocouple(channel.mux, channel.pga, channel.dr)
    }

    /// Allocate the next channel index for a Type K thermocouple on the given raw register
    /// fields.
    pub fn register_thermocouple(
        &mut self,
        mux: u32,
        pga: u32,
        dr: u32,
    ) -> Result<SensorId, ConfigError> {
        if self.is_configured() {
            return Err(ConfigError::Locked);
        }
        let input = ChannelConfig { mux, pga, dr }.validate(self.chip)?;
        let index = u8::try_from(self.channels.len() + 1)
            .map_err(|_| ConfigError::Capacity("thermocouple channel"))?;
        self.channels
            .push(Channel {
                index,
                input,
                sensor: Sensor::ThermocoupleK(ThermocoupleK::new(
                    self.cold_junction,
                )),
            })
            .map_err(|_| ConfigError::Capacity("thermocouple channel"))?;
        log::debug!(
            logger: self.log,
            "{}: channel {index} {:?} {:?} {:?}",
            self.name,
            input.mux,
            input.pga,
            input.data_rate
        );
        Ok(SensorId::Thermocouple(index))
    }

    /// Subscribe another internal temperature sensor to the die temperature stream.
    ///
    /// Subscribing does not change the MCU configuration and is allowed at any time.
    pub fn add_temp_sensor(&mut self) -> Result<SensorId, ConfigError> {
        let slot = self.die.len();
        self.die
            .push(Sensor::Internal(Internal::default()))
            .map_err(|_| ConfigError::Capacity("internal sensor"))?;
        log::debug!(logger: self.log, "{}: internal sensor {slot}", self.name);
        Ok(SensorId::Internal(slot))
    }

    pub fn sensor(&self, id: SensorId) -> Option<&Sensor<R>> {
        match id {
            SensorId::Internal(slot) => self.die.get(slot),
            SensorId::Thermocouple(index) => {
                self.channel(index).map(|c| &c.sensor)
            }
        }
    }

    /// The sensor behind `id`, to set its range and callback.
    pub fn sensor_mut(&mut self, id: SensorId) -> Option<&mut Sensor<R>> {
        match id {
            SensorId::Internal(slot) => self.die.get_mut(slot),
            SensorId::Thermocouple(index) => {
                self.channel_mut(index).map(|c| &mut c.sensor)
            }
        }
    }

    /// Configuration command `n`: the device first, then one per channel.
    fn command(&self, n: usize) -> Option<Command> {
        match n {
            0 => Some(Command::Config {
                oid: self.oid,
                spi_oid: self.spi.oid(),
                chip: self.chip,
                data_rate: self.data_rate,
                response_interval: RESPONSE_INTERVAL,
            }),
            n => self.channels.get(n - 1).map(|channel| Command::AddSensor {
                oid: self.oid,
                input: channel.input,
            }),
        }
    }

    /// Emit the device and channel configuration and lock the channel registry.
    ///
    /// Nothing is emitted if any command fails to format.
    ///
    /// # Panics
    /// If called a second time.
    pub fn build_config(&mut self) -> Result<(), Error> {
        assert!(!self.is_configured(), "configuration already built");
        let count = self.channels.len() + 1;
        for cmd in (0..count).filter_map(|n| self.command(n)) {
            cmd.format()?;
        }
        for n in 0..count {
            let Some(cmd) = self.command(n) else {
                continue;
            };
            let cmd = cmd.format()?;
            self.mcu.add_config_cmd(&cmd);
            log::info!(logger: self.log, "{}: {cmd}", self.name);
        }
        self.state = State::Configured {
            report_clock: self.mcu.seconds_to_clock(REPORT_TIME),
        };
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn oid(&self) -> Oid {
        self.oid
    }

    pub fn chip(&self) -> Chip {
        self.chip
    }

    pub fn mcu(&self) -> &M {
        &self.mcu
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.state, State::Configured { .. })
    }

    /// The report interval in MCU clock ticks, once configured.
    pub fn report_clock(&self) -> Option<u64> {
        match self.state {
            State::Unconfigured => None,
            State::Configured { report_clock } => Some(report_clock),
        }
    }

    /// The registered thermocouple channels in index order.
    pub fn channels(&self) -> &[Channel<R>] {
        &self.channels
    }

    pub fn channel(&self, index: u8) -> Option<&Channel<R>> {
        self.channels.get((index as usize).checked_sub(1)?)
    }

    fn channel_mut(&mut self, index: u8) -> Option<&mut Channel<R>> {
        self.channels.get_mut((index as usize).checked_sub(1)?)
    }
}

impl<M: Mcu, C: Clock, R: Report, L: log::Log, const N: usize, const S: usize>
    Device<M, C, R, L, N, S>
{
    /// Route one response to its sensors.
    ///
    /// Index 0 reports the die temperature to every internal subscriber. Any other index reports
    /// the compensated thermocouple temperature of that channel. An index without a channel is a
    /// [Error::Protocol] and reaches no sensor.
    pub fn handle_response(&mut self, response: &Response) -> Result<(), Error> {
        if !self.is_configured() {
            return Err(Error::NotConfigured);
        }
        let die = TemperatureCode(response.temperature);
        let code = AdcCode(response.value);

        if response.sensor == 0 {
            let time = self.mcu.estimated_print_time(self.clock.monotonic());
            let reading = Reading::new(time, code, Pga::default(), die);
            for sensor in self.die.iter_mut() {
                sensor.update(&reading);
            }
            log::trace!(
                logger: self.log,
                "{}: die {:.2} °C at {time:.3}",
                self.name,
                reading.die
            );
            return Ok(());
        }

        let Some(channel) = self
            .channels
            .get_mut(response.sensor as usize - 1)
        else {
            return Err(Error::Protocol(response.sensor));
        };
        let time = self.mcu.estimated_print_time(self.clock.monotonic());
        let reading = Reading::new(time, code, channel.input.pga, die);
        let celsius = channel.sensor.update(&reading);
        log::trace!(
            logger: self.log,
            "{}: channel {} raw {:#06x} signed {} {:.4} mV die {:.2} °C -> {celsius:.2} °C",
            self.name,
            channel.index,
            response.value,
            code.signed(),
            code.millivolt(reading.pga),
            reading.die
        );
        if channel.sensor.out_of_range(celsius) {
            log::warn!(
                logger: self.log,
                "{}: channel {} reads {celsius:.2} °C outside {:?}",
                self.name,
                channel.index,
                channel.sensor.range()
            );
        }
        Ok(())
    }
}
