//! User-controlled environment inputs.
//!
//! The three inputs are bounded integers. Construction and every setter clamp
//! into range, so a [`SimulationParameters`] value is always valid.

use std::ops::RangeInclusive;

/// Air temperature bounds in °C.
pub const TEMPERATURE_RANGE: RangeInclusive<i32> = 15..=35;
/// Relative humidity bounds in percent.
pub const HUMIDITY_RANGE: RangeInclusive<i32> = 0..=100;
/// Light intensity bounds in percent.
pub const LIGHT_RANGE: RangeInclusive<i32> = 0..=100;

/// One of the three adjustable inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Parameter {
    Temperature,
    Humidity,
    Light,
}

impl Parameter {
    pub const ALL: [Parameter; 3] = [Self::Temperature, Self::Humidity, Self::Light];

    pub fn range(self) -> RangeInclusive<i32> {
        match self {
            Self::Temperature => TEMPERATURE_RANGE,
            Self::Humidity => HUMIDITY_RANGE,
            Self::Light => LIGHT_RANGE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
            Self::Light => "Light",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Humidity | Self::Light => "%",
        }
    }

    /// Clamps `value` into this parameter's range.
    pub fn clamp(self, value: i32) -> i32 {
        let range = self.range();
        value.clamp(*range.start(), *range.end())
    }
}

/// Current temperature, humidity and light.
///
/// Fields are private so the bounds cannot be bypassed; use the setters,
/// which report whether the stored value actually changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationParameters {
    temperature: i32,
    humidity: i32,
    light: i32,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            temperature: 25,
            humidity: 50,
            light: 50,
        }
    }
}

impl SimulationParameters {
    pub fn new(temperature: i32, humidity: i32, light: i32) -> Self {
        Self {
            temperature: Parameter::Temperature.clamp(temperature),
            humidity: Parameter::Humidity.clamp(humidity),
            light: Parameter::Light.clamp(light),
        }
    }

    pub fn temperature(&self) -> i32 {
        self.temperature
    }

    pub fn humidity(&self) -> i32 {
        self.humidity
    }

    pub fn light(&self) -> i32 {
        self.light
    }

    pub fn get(&self, param: Parameter) -> i32 {
        match param {
            Parameter::Temperature => self.temperature,
            Parameter::Humidity => self.humidity,
            Parameter::Light => self.light,
        }
    }

    /// Stores `value` (clamped) for `param`.
    ///
    /// ### Returns
    /// `true` if the stored value changed.
    pub fn set(&mut self, param: Parameter, value: i32) -> bool {
        let value = param.clamp(value);
        let slot = match param {
            Parameter::Temperature => &mut self.temperature,
            Parameter::Humidity => &mut self.humidity,
            Parameter::Light => &mut self.light,
        };
        let changed = *slot != value;
        *slot = value;
        changed
    }

    pub fn set_temperature(&mut self, value: i32) -> bool {
        self.set(Parameter::Temperature, value)
    }

    pub fn set_humidity(&mut self, value: i32) -> bool {
        self.set(Parameter::Humidity, value)
    }

    pub fn set_light(&mut self, value: i32) -> bool {
        self.set(Parameter::Light, value)
    }
}
