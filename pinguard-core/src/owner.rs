//! Pin owner identities
//!
//! Every subsystem that claims pins identifies itself with a [`PinOwner`].
//! Built-in subsystems have the high bit set in their wire value; plugin
//! extensions use ids `0x01..=0x7F`. The zero value is [`PinOwner::None`],
//! so default-initialized owner storage reads as "unallocated".

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identity of a plugin extension (`0x01..=0x7F`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PluginId(u8);

impl PluginId {
    /// Plugin that did not register an id of its own
    pub const UNSPECIFIED: Self = Self(0x01);
    /// Example plugin shipped with the firmware
    pub const EXAMPLE: Self = Self(0x02);
    /// Temperature sensor (one-wire)
    pub const TEMPERATURE: Self = Self(0x03);
    /// PIR motion switch
    pub const PIR_SWITCH: Self = Self(0x05);
    /// Four line character display
    pub const FOUR_LINE_DISPLAY: Self = Self(0x07);
    /// Rotary encoder user interface
    pub const ROTARY_ENCODER_UI: Self = Self(0x08);
    /// Multi relay controller
    pub const MULTI_RELAY: Self = Self(0x0D);
    /// Animated staircase (two PIR/ultrasonic sensors)
    pub const ANIMATED_STAIRCASE: Self = Self(0x0E);

    /// Highest plugin id; the high bit is kept for built-in owners
    pub const MAX: u8 = 0x7F;

    /// Create a plugin id, rejecting 0 and values with the high bit set
    pub const fn new(id: u8) -> Option<Self> {
        if id == 0 || id > Self::MAX {
            None
        } else {
            Some(Self(id))
        }
    }

    /// Raw id
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Subsystem owning (or requesting) a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinOwner {
    /// Unspecified owner; the tag of every free pin
    #[default]
    None,
    /// Ethernet PHY
    Ethernet,
    /// First digital LED bus
    BusDigital,
    /// Second digital LED bus
    BusDigital2,
    /// PWM driven LED output
    BusPwm,
    /// Configured push button
    Button,
    /// Infrared receiver
    Ir,
    /// Relay output
    Relay,
    /// SPI RAM
    SpiRam,
    /// Debug serial output
    DebugOut,
    /// DMX output
    Dmx,
    /// Plugin extension
    Plugin(PluginId),
}

impl PinOwner {
    /// Encode as the stable one-byte wire value
    pub const fn to_u8(self) -> u8 {
        match self {
            PinOwner::None => 0x00,
            PinOwner::Ethernet => 0x81,
            PinOwner::BusDigital => 0x82,
            PinOwner::BusDigital2 => 0x83,
            PinOwner::BusPwm => 0x84,
            PinOwner::Button => 0x85,
            PinOwner::Ir => 0x86,
            PinOwner::Relay => 0x87,
            PinOwner::SpiRam => 0x88,
            PinOwner::DebugOut => 0x89,
            PinOwner::Dmx => 0x8A,
            PinOwner::Plugin(id) => id.get(),
        }
    }

    /// Decode a wire value; unknown built-in values return `None`
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(PinOwner::None),
            0x81 => Some(PinOwner::Ethernet),
            0x82 => Some(PinOwner::BusDigital),
            0x83 => Some(PinOwner::BusDigital2),
            0x84 => Some(PinOwner::BusPwm),
            0x85 => Some(PinOwner::Button),
            0x86 => Some(PinOwner::Ir),
            0x87 => Some(PinOwner::Relay),
            0x88 => Some(PinOwner::SpiRam),
            0x89 => Some(PinOwner::DebugOut),
            0x8A => Some(PinOwner::Dmx),
            v => match PluginId::new(v) {
                Some(id) => Some(PinOwner::Plugin(id)),
                None => None,
            },
        }
    }

    /// Check if this is the unspecified owner
    pub const fn is_none(self) -> bool {
        matches!(self, PinOwner::None)
    }

    /// Check if this is a plugin extension
    pub const fn is_plugin(self) -> bool {
        matches!(self, PinOwner::Plugin(_))
    }

    /// Short label used in pin usage tables
    pub const fn label(self) -> &'static str {
        match self {
            PinOwner::None => "",
            PinOwner::Ethernet => "Eth",
            PinOwner::BusDigital => "BusD",
            PinOwner::BusDigital2 => "BusD2",
            PinOwner::BusPwm => "BusP",
            PinOwner::Button => "Butn",
            PinOwner::Ir => "IR",
            PinOwner::Relay => "Rly",
            PinOwner::SpiRam => "SpiR",
            PinOwner::DebugOut => "Dbg",
            PinOwner::Dmx => "DMX",
            PinOwner::Plugin(_) => "UM",
        }
    }

    /// Parse a configuration name ("relay", "bus_pwm", "plugin:3", ...)
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(id) = s.strip_prefix("plugin:") {
            return PluginId::new(id.trim().parse().ok()?).map(PinOwner::Plugin);
        }
        match s {
            "ethernet" => Some(PinOwner::Ethernet),
            "bus_digital" => Some(PinOwner::BusDigital),
            "bus_digital2" => Some(PinOwner::BusDigital2),
            "bus_pwm" => Some(PinOwner::BusPwm),
            "button" => Some(PinOwner::Button),
            "ir" => Some(PinOwner::Ir),
            "relay" => Some(PinOwner::Relay),
            "spi_ram" => Some(PinOwner::SpiRam),
            "debug_out" => Some(PinOwner::DebugOut),
            "dmx" => Some(PinOwner::Dmx),
            _ => None,
        }
    }
}

impl From<PluginId> for PinOwner {
    fn from(id: PluginId) -> Self {
        PinOwner::Plugin(id)
    }
}

// Owners travel as their one-byte wire value so status consumers can
// render them without knowing the enum layout.
#[cfg(feature = "serde")]
impl Serialize for PinOwner {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.to_u8())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for PinOwner {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u8::deserialize(deserializer)?;
        PinOwner::from_u8(raw)
            .ok_or_else(|| serde::de::Error::custom("unknown pin owner"))
    }
}
