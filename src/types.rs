//! Core types for spark-yoga.
//!
//! The enumerations here cross the engine boundary as integers, so every
//! ordinal matches the Yoga definition exactly. Reordering a variant is a
//! silent layout bug, not a compile error.

use crate::error::Error;

// =============================================================================
// Undefined
// =============================================================================

/// Sentinel for "no value", matching Yoga's `YGUndefined`.
pub const UNDEFINED: f32 = f32::NAN;

/// Check whether a float carries the undefined sentinel.
#[inline]
pub fn is_undefined(value: f32) -> bool {
    value.is_nan()
}

// =============================================================================
// Enumerations
// =============================================================================

/// Declares a `#[repr(u8)]` enumeration with a fixed ordinal per variant,
/// its kebab-case name, and a checked conversion from the raw ordinal.
macro_rules! yoga_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $ordinal:literal => $css:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $ordinal ),+
        }

        impl $name {
            /// Every variant in ordinal order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant ),+ ];

            /// The kebab-case name used in debug output.
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $css ),+
                }
            }
        }

        impl TryFrom<u8> for $name {
            type Error = Error;

            fn try_from(value: u8) -> Result<Self, Error> {
                match value {
                    $( $ordinal => Ok(Self::$variant), )+
                    _ => Err(Error::InvalidOrdinal {
                        enumeration: stringify!($name),
                        value,
                    }),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value as u8
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

yoga_enum! {
    /// Cross-axis alignment for `align-items`, `align-self` and `align-content`.
    Align {
        Auto = 0 => "auto",
        FlexStart = 1 => "flex-start",
        Center = 2 => "center",
        FlexEnd = 3 => "flex-end",
        Stretch = 4 => "stretch",
        Baseline = 5 => "baseline",
        SpaceBetween = 6 => "space-between",
        SpaceAround = 7 => "space-around",
    }
}

yoga_enum! {
    /// Axis selector.
    Dimension {
        Width = 0 => "width",
        Height = 1 => "height",
    }
}

yoga_enum! {
    /// Layout direction. `Inherit` resolves from the parent at layout time.
    Direction {
        Inherit = 0 => "inherit",
        Ltr = 1 => "ltr",
        Rtl = 2 => "rtl",
    }
}

yoga_enum! {
    Display {
        Flex = 0 => "flex",
        None = 1 => "none",
    }
}

yoga_enum! {
    /// Edge keyword for spacing and position properties.
    ///
    /// `Start`/`End` are direction-relative; `Horizontal`, `Vertical` and
    /// `All` are multi-edge shorthands that only exist on the style side.
    Edge {
        Left = 0 => "left",
        Top = 1 => "top",
        Right = 2 => "right",
        Bottom = 3 => "bottom",
        Start = 4 => "start",
        End = 5 => "end",
        Horizontal = 6 => "horizontal",
        Vertical = 7 => "vertical",
        All = 8 => "all",
    }
}

yoga_enum! {
    ExperimentalFeature {
        WebFlexBasis = 0 => "web-flex-basis",
    }
}

yoga_enum! {
    FlexDirection {
        Column = 0 => "column",
        ColumnReverse = 1 => "column-reverse",
        Row = 2 => "row",
        RowReverse = 3 => "row-reverse",
    }
}

yoga_enum! {
    /// Main-axis alignment for `justify-content`.
    Justify {
        FlexStart = 0 => "flex-start",
        Center = 1 => "center",
        FlexEnd = 2 => "flex-end",
        SpaceBetween = 3 => "space-between",
        SpaceAround = 4 => "space-around",
    }
}

yoga_enum! {
    LogLevel {
        Error = 0 => "error",
        Warn = 1 => "warn",
        Info = 2 => "info",
        Debug = 3 => "debug",
        Verbose = 4 => "verbose",
        Fatal = 5 => "fatal",
    }
}

yoga_enum! {
    /// Constraint mode handed to measure functions alongside each dimension.
    MeasureMode {
        /// No constraint; the dimension is `UNDEFINED`.
        Undefined = 0 => "undefined",
        /// The node must be exactly this size.
        Exactly = 1 => "exactly",
        /// The node may be at most this size.
        AtMost = 2 => "at-most",
    }
}

yoga_enum! {
    NodeType {
        Default = 0 => "default",
        Text = 1 => "text",
    }
}

yoga_enum! {
    Overflow {
        Visible = 0 => "visible",
        Hidden = 1 => "hidden",
        Scroll = 2 => "scroll",
    }
}

yoga_enum! {
    PositionType {
        Relative = 0 => "relative",
        Absolute = 1 => "absolute",
    }
}

yoga_enum! {
    Unit {
        Undefined = 0 => "undefined",
        Point = 1 => "point",
        Percent = 2 => "percent",
        Auto = 3 => "auto",
    }
}

yoga_enum! {
    Wrap {
        NoWrap = 0 => "no-wrap",
        Wrap = 1 => "wrap",
        WrapReverse = 2 => "wrap-reverse",
    }
}

impl Edge {
    /// The physical and direction-relative edges a computed layout reports.
    pub const LAYOUT: &'static [Self] = &[
        Self::Left,
        Self::Top,
        Self::Right,
        Self::Bottom,
        Self::Start,
        Self::End,
    ];

    /// Whether this keyword names several edges at once.
    pub const fn is_shorthand(self) -> bool {
        matches!(self, Self::Horizontal | Self::Vertical | Self::All)
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error | LogLevel::Fatal => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Verbose => log::Level::Trace,
        }
    }
}

// =============================================================================
// Print Options (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Sections to include when printing a node.
    ///
    /// Combine with bitwise OR: `PrintOptions::LAYOUT | PrintOptions::CHILDREN`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PrintOptions: u32 {
        const LAYOUT = 1;
        const STYLE = 2;
        const CHILDREN = 4;
    }
}

// =============================================================================
// Value - A length with a unit
// =============================================================================

/// A style length: `YGValue` with the unit folded into the variant.
///
/// Percentages are in the 0-100 range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Point(f32),
    Percent(f32),
    Auto,
}

impl Value {
    /// Percentage length (0-100).
    pub const fn percent(value: f32) -> Self {
        Self::Percent(value)
    }

    /// The unit of this value.
    pub const fn unit(&self) -> Unit {
        match self {
            Self::Undefined => Unit::Undefined,
            Self::Point(_) => Unit::Point,
            Self::Percent(_) => Unit::Percent,
            Self::Auto => Unit::Auto,
        }
    }

    /// The numeric part, `UNDEFINED` for `Undefined` and `Auto`.
    pub const fn value(&self) -> f32 {
        match self {
            Self::Point(v) | Self::Percent(v) => *v,
            Self::Undefined | Self::Auto => UNDEFINED,
        }
    }

    /// Whether a value has been set.
    pub const fn is_defined(&self) -> bool {
        !matches!(self, Self::Undefined)
    }

    /// Build from a raw `(value, unit)` pair as it crosses the engine boundary.
    ///
    /// A NaN numeric part collapses to `Undefined` regardless of unit.
    pub fn from_raw(value: f32, unit: Unit) -> Self {
        match unit {
            Unit::Auto => Self::Auto,
            _ if value.is_nan() => Self::Undefined,
            Unit::Undefined => Self::Undefined,
            Unit::Point => Self::Point(value),
            Unit::Percent => Self::Percent(value),
        }
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        if value.is_nan() {
            Self::Undefined
        } else {
            Self::Point(value)
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Point(v) => write!(f, "{v}px"),
            Self::Percent(v) => write!(f, "{v}%"),
            Self::Auto => f.write_str("auto"),
        }
    }
}

// =============================================================================
// Size
// =============================================================================

/// Width and height pair returned by measure functions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}
