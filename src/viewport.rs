use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Phone,
    Tablet,
    Desktop,
}

impl DeviceClass {
    /// Share of the terminal width given to the item column.
    pub fn column_percent(self) -> u16 {
        match self {
            DeviceClass::Phone => 100,
            DeviceClass::Tablet => 80,
            DeviceClass::Desktop => 60,
        }
    }

    /// Rows from the bottom at which the next page is requested.
    pub fn proximity(self, client_height: usize) -> usize {
        match self {
            DeviceClass::Phone => client_height,
            DeviceClass::Tablet | DeviceClass::Desktop => client_height / 2,
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceClass::Phone => write!(f, "phone"),
            DeviceClass::Tablet => write!(f, "tablet"),
            DeviceClass::Desktop => write!(f, "desktop"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "portrait"),
            Orientation::Landscape => write!(f, "landscape"),
        }
    }
}

pub fn classify(width: u32, height: u32) -> (DeviceClass, Orientation) {
    let class = if width <= 500 {
        DeviceClass::Phone
    } else if width < 980 {
        DeviceClass::Tablet
    } else {
        DeviceClass::Desktop
    };

    let orientation = if width < height {
        Orientation::Portrait
    } else {
        Orientation::Landscape
    };

    (class, orientation)
}

/// Window size in pixels. Class and orientation are derived on construction
/// and cannot be set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportGeometry {
    width: u32,
    height: u32,
    class: DeviceClass,
    orientation: Orientation,
}

impl ViewportGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        let (class, orientation) = classify(width, height);
        Self {
            width,
            height,
            class,
            orientation,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn class(&self) -> DeviceClass {
        self.class
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
}
