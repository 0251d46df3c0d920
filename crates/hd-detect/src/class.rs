//! Detector class taxonomies.
//!
//! Two label sets are in use: the traffic-light state classifier and the
//! general road-scene detector.  Both map a numeric class id from the model
//! output to a typed variant and a human-readable label.

/// A detector class enum.
pub trait ObjectClass: Copy + Eq + std::fmt::Debug + Send + Sync + 'static {
    /// Map a raw model class id; unknown ids map to the "unknown" variant.
    fn from_id(id: u32) -> Self;

    fn id(self) -> u32;

    fn label(self) -> &'static str;
}

/// Traffic-light state as reported by the light classifier.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrafficLightClass {
    LeftRed,
    Red,
    RightRed,
    LeftGreen,
    Green,
    RightGreen,
    Yellow,
    Off,
    #[default]
    Unknown,
}

impl TrafficLightClass {
    /// `true` for any state that requires stopping at the stop line.
    pub fn is_stop(self) -> bool {
        matches!(
            self,
            TrafficLightClass::LeftRed
                | TrafficLightClass::Red
                | TrafficLightClass::RightRed
                | TrafficLightClass::Yellow
        )
    }
}

impl ObjectClass for TrafficLightClass {
    fn from_id(id: u32) -> Self {
        match id {
            0 => TrafficLightClass::LeftRed,
            1 => TrafficLightClass::Red,
            2 => TrafficLightClass::RightRed,
            3 => TrafficLightClass::LeftGreen,
            4 => TrafficLightClass::Green,
            5 => TrafficLightClass::RightGreen,
            6 => TrafficLightClass::Yellow,
            7 => TrafficLightClass::Off,
            _ => TrafficLightClass::Unknown,
        }
    }

    fn id(self) -> u32 {
        self as u32
    }

    fn label(self) -> &'static str {
        match self {
            TrafficLightClass::LeftRed    => "Left Red",
            TrafficLightClass::Red        => "Red",
            TrafficLightClass::RightRed   => "Right Red",
            TrafficLightClass::LeftGreen  => "Left Green",
            TrafficLightClass::Green      => "Green",
            TrafficLightClass::RightGreen => "Right Green",
            TrafficLightClass::Yellow     => "Yellow",
            TrafficLightClass::Off        => "Off",
            TrafficLightClass::Unknown    => "Unknown",
        }
    }
}

/// Road-scene classes.  Discriminants are the model's class ids.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum MapClass {
    #[default]
    Unknown               = 0,
    Person                = 1,
    Bicycle               = 2,
    Car                   = 3,
    Motorbike             = 4,
    Bus                   = 6,
    Truck                 = 8,
    TrafficLight          = 10,
    StopSign              = 12,
    StopLine              = 101,
    Crossing              = 102,
    ForwardArrow          = 103,
    RightOnlyArrow        = 104,
    LeftOnlyArrow         = 105,
    RightForwardArrow     = 106,
    LeftForwardArrow      = 107,
    LeftRightArrow        = 108,
    LeftRightForwardArrow = 109,
    NoUTurn               = 110,
    IntersectionBox       = 111,
}

impl MapClass {
    /// `true` for classes that correspond to static map entities (signals,
    /// signs, surface markings) rather than road users.
    pub fn is_map_feature(self) -> bool {
        matches!(self, MapClass::TrafficLight | MapClass::StopSign) || self.id() > 100
    }
}

impl ObjectClass for MapClass {
    fn from_id(id: u32) -> Self {
        match id {
            1   => MapClass::Person,
            2   => MapClass::Bicycle,
            3   => MapClass::Car,
            4   => MapClass::Motorbike,
            6   => MapClass::Bus,
            8   => MapClass::Truck,
            10  => MapClass::TrafficLight,
            12  => MapClass::StopSign,
            101 => MapClass::StopLine,
            102 => MapClass::Crossing,
            103 => MapClass::ForwardArrow,
            104 => MapClass::RightOnlyArrow,
            105 => MapClass::LeftOnlyArrow,
            106 => MapClass::RightForwardArrow,
            107 => MapClass::LeftForwardArrow,
            108 => MapClass::LeftRightArrow,
            109 => MapClass::LeftRightForwardArrow,
            110 => MapClass::NoUTurn,
            111 => MapClass::IntersectionBox,
            _   => MapClass::Unknown,
        }
    }

    fn id(self) -> u32 {
        self as u32
    }

    fn label(self) -> &'static str {
        match self {
            MapClass::Unknown               => "Unknown",
            MapClass::Person                => "Person",
            MapClass::Bicycle               => "Bicycle",
            MapClass::Car                   => "Car",
            MapClass::Motorbike             => "Motorbike",
            MapClass::Bus                   => "Bus",
            MapClass::Truck                 => "Truck",
            MapClass::TrafficLight          => "Traffic Light",
            MapClass::StopSign              => "Stop Sign",
            MapClass::StopLine              => "Stop Line",
            MapClass::Crossing              => "Crossing",
            MapClass::ForwardArrow          => "Arrow Forward",
            MapClass::RightOnlyArrow        => "Arrow Only Right",
            MapClass::LeftOnlyArrow         => "Arrow Only Left",
            MapClass::RightForwardArrow     => "Arrow Right",
            MapClass::LeftForwardArrow      => "Arrow Left",
            MapClass::LeftRightArrow        => "Arrow Left Right",
            MapClass::LeftRightForwardArrow => "Arrow All",
            MapClass::NoUTurn               => "No U Turn",
            MapClass::IntersectionBox       => "Intersection",
        }
    }
}
