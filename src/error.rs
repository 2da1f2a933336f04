/// Setup errors. Fatal to the sensor or device being configured.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Channels are locked once the configuration is built")]
    Locked,
    #[error("Register field `{field}` out of range: {value}")]
    Range { field: &'static str, value: u32 },
    #[error("Missing option `{0}`")]
    Missing(&'static str),
    #[error("Invalid value for option `{0}`")]
    Invalid(&'static str),
    #[error("No room for another {0}")]
    Capacity(&'static str),
    #[error("Sensor factory name already registered")]
    Duplicate,
    #[error("Invalid device name")]
    Name,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Configuration: {0}")]
    Configuration(#[from] ConfigError),
    /// The response references a sensor index that was never registered.
    /// Host and MCU disagree about the channel layout.
    #[error("Response for unregistered sensor {0}")]
    Protocol(u8),
    #[error("Response before configuration was built")]
    NotConfigured,
    #[error("Command exceeds buffer")]
    Command,
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Self::Command
    }
}
