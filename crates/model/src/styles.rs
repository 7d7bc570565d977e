//! Style value types.
//!
//! These are the value domains of the style vocabulary declared in
//! [`crate::properties`]. Temporal arithmetic is exact; length values are
//! plain numbers whose units are resolved during ISD generation.

/// Units a length can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LengthUnit {
    /// Cell (relative to the document cell resolution).
    C,
    /// Font size of the element.
    Em,
    /// Percentage of a context-dependent reference.
    Pct,
    /// Pixel (relative to the document pixel resolution).
    Px,
    /// Percentage of the root container height.
    Rh,
    /// Percentage of the root container width.
    Rw,
}

impl LengthUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            LengthUnit::C => "c",
            LengthUnit::Em => "em",
            LengthUnit::Pct => "%",
            LengthUnit::Px => "px",
            LengthUnit::Rh => "rh",
            LengthUnit::Rw => "rw",
        }
    }
}

/// A dimension with a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub const fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub const fn cells(value: f64) -> Self {
        Self::new(value, LengthUnit::C)
    }

    pub const fn pct(value: f64) -> Self {
        Self::new(value, LengthUnit::Pct)
    }

    pub const fn rh(value: f64) -> Self {
        Self::new(value, LengthUnit::Rh)
    }

    pub const fn rw(value: f64) -> Self {
        Self::new(value, LengthUnit::Rw)
    }
}

/// An RGBA color, each component in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 0xFF)
    }
}

/// TTML named colors.
pub mod named {
    use super::Color;

    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const SILVER: Color = Color::rgb(0xC0, 0xC0, 0xC0);
    pub const GRAY: Color = Color::rgb(0x80, 0x80, 0x80);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const MAROON: Color = Color::rgb(0x80, 0, 0);
    pub const RED: Color = Color::rgb(0xFF, 0, 0);
    pub const PURPLE: Color = Color::rgb(0x80, 0, 0x80);
    pub const MAGENTA: Color = Color::rgb(0xFF, 0, 0xFF);
    pub const GREEN: Color = Color::rgb(0, 0x80, 0);
    pub const LIME: Color = Color::rgb(0, 0xFF, 0);
    pub const OLIVE: Color = Color::rgb(0x80, 0x80, 0);
    pub const YELLOW: Color = Color::rgb(0xFF, 0xFF, 0);
    pub const NAVY: Color = Color::rgb(0, 0, 0x80);
    pub const BLUE: Color = Color::rgb(0, 0, 0xFF);
    pub const TEAL: Color = Color::rgb(0, 0x80, 0x80);
    pub const CYAN: Color = Color::rgb(0, 0xFF, 0xFF);

    /// Resolves a TTML named color or `#rrggbb[aa]` specification.
    pub fn parse(text: &str) -> Option<Color> {
        if let Some(hex) = text.strip_prefix('#') {
            if !hex.is_ascii() {
                return None;
            }
            let parse2 = |s: &str| u8::from_str_radix(s, 16).ok();
            return match hex.len() {
                6 => Some(Color::rgb(parse2(&hex[0..2])?, parse2(&hex[2..4])?, parse2(&hex[4..6])?)),
                8 => Some(Color::rgba(
                    parse2(&hex[0..2])?,
                    parse2(&hex[2..4])?,
                    parse2(&hex[4..6])?,
                    parse2(&hex[6..8])?,
                )),
                _ => None,
            };
        }

        match text.to_ascii_lowercase().as_str() {
            "transparent" => Some(TRANSPARENT),
            "black" => Some(BLACK),
            "silver" => Some(SILVER),
            "gray" => Some(GRAY),
            "white" => Some(WHITE),
            "maroon" => Some(MAROON),
            "red" => Some(RED),
            "purple" => Some(PURPLE),
            "fuchsia" | "magenta" => Some(MAGENTA),
            "green" => Some(GREEN),
            "lime" => Some(LIME),
            "olive" => Some(OLIVE),
            "yellow" => Some(YELLOW),
            "navy" => Some(NAVY),
            "blue" => Some(BLUE),
            "teal" => Some(TEAL),
            "aqua" | "cyan" => Some(CYAN),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Auto,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayAlign {
    Before,
    Center,
    After,
}

/// `tts:extent`: width and height of a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub width: Length,
    pub height: Length,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Italic,
    Oblique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericFontFamily {
    Default,
    Monospace,
    SansSerif,
    Serif,
    MonospaceSansSerif,
    MonospaceSerif,
    ProportionalSansSerif,
    ProportionalSerif,
}

/// One entry of an ordered `tts:fontFamily` stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontFamily {
    Named(String),
    Generic(GenericFontFamily),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineHeight {
    Normal,
    Length(Length),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiRowAlign {
    Start,
    Center,
    End,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    Visible,
    Hidden,
}

/// `tts:padding` in before/end/after/start order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub before: Length,
    pub end: Length,
    pub after: Length,
    pub start: Length,
}

/// A coordinate pair in the root container region, measured from its
/// top-left corner. Doubles as the value of `tts:origin` and the alignment
/// point of `tts:position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: Length,
    pub y: Length,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RubyAlign {
    Center,
    SpaceAround,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RubyPosition {
    Before,
    After,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RubyReservePosition {
    Both,
    Before,
    After,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RubyReserve {
    None,
    Reserve { position: RubyReservePosition, length: Option<Length> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowBackground {
    Always,
    WhenActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCombine {
    None,
    All,
}

/// `tts:textDecoration`. An unset field inherits the parent's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextDecoration {
    pub underline: Option<bool>,
    pub line_through: Option<bool>,
    pub overline: Option<bool>,
}

impl TextDecoration {
    pub const NONE: TextDecoration = TextDecoration {
        underline: Some(false),
        line_through: Some(false),
        overline: Some(false),
    };

    pub fn underlined() -> Self {
        TextDecoration { underline: Some(true), ..Default::default() }
    }

    pub fn is_underlined(&self) -> bool {
        self.underline == Some(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEmphasisStyle {
    None,
    Auto,
    Filled,
    Open,
    FilledCircle,
    FilledSesame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEmphasisSymbol {
    Circle,
    Dot,
    Sesame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEmphasisPosition {
    Outside,
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextEmphasis {
    pub style: TextEmphasisStyle,
    pub symbol: Option<TextEmphasisSymbol>,
    pub color: Option<Color>,
    pub position: Option<TextEmphasisPosition>,
}

impl TextEmphasis {
    pub const NONE: TextEmphasis =
        TextEmphasis { style: TextEmphasisStyle::None, symbol: None, color: None, position: None };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextOutline {
    None,
    Outline { color: Option<Color>, thickness: Length },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub x_offset: Length,
    pub y_offset: Length,
    pub blur_radius: Option<Length>,
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextShadow {
    None,
    Shadows(Vec<Shadow>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnicodeBidi {
    Normal,
    Embed,
    BidiOverride,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapOption {
    Wrap,
    NoWrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritingMode {
    Lrtb,
    Rltb,
    Tbrl,
    Tblr,
}

impl WritingMode {
    pub fn is_vertical(self) -> bool {
        matches!(self, WritingMode::Tbrl | WritingMode::Tblr)
    }
}

/// Strategy for handling white space in text nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhiteSpaceHandling {
    #[default]
    Default,
    Preserve,
}
