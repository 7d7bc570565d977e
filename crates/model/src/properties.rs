//! The style vocabulary.
//!
//! Every property is declared exactly once in the [`style_properties!`]
//! table below: its value domain (a [`StyleValue`] variant), its initial
//! value, and its inheritance and animatability flags. Everything else —
//! validation, initial-value construction, the `ALL` inventory — derives
//! from the table.

use crate::styles::*;

/// A style property value.
///
/// One variant per value domain; [`StyleProperty::validates`] ties each
/// property to the variant it accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Color(Color),
    Length(Length),
    Number(f64),
    Boolean(bool),
    Extent(Extent),
    Position(Position),
    Padding(Padding),
    FontFamilies(Vec<FontFamily>),
    Direction(Direction),
    Display(Display),
    DisplayAlign(DisplayAlign),
    FontStyle(FontStyle),
    FontWeight(FontWeight),
    LineHeight(LineHeight),
    MultiRowAlign(MultiRowAlign),
    Overflow(Overflow),
    RubyAlign(RubyAlign),
    RubyPosition(RubyPosition),
    RubyReserve(RubyReserve),
    ShowBackground(ShowBackground),
    TextAlign(TextAlign),
    TextCombine(TextCombine),
    TextDecoration(TextDecoration),
    TextEmphasis(TextEmphasis),
    TextOutline(TextOutline),
    TextShadow(TextShadow),
    UnicodeBidi(UnicodeBidi),
    Visibility(Visibility),
    WrapOption(WrapOption),
    WritingMode(WritingMode),
}

impl StyleValue {
    pub fn as_length(&self) -> Option<Length> {
        match self {
            StyleValue::Length(l) => Some(*l),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            StyleValue::Color(c) => Some(*c),
            _ => None,
        }
    }
}

macro_rules! style_properties {
    ( $( $(#[$attr:meta])* $name:ident {
            inherited: $inherited:expr,
            animatable: $animatable:expr,
            domain: $variant:ident,
            initial: $initial:expr,
        } )+ ) => {
        /// A style property, as constrained by IMSC 1.1 Text Profile.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum StyleProperty {
            $( $(#[$attr])* $name, )+
        }

        impl StyleProperty {
            /// Every declared property, in a fixed order.
            pub const ALL: &'static [StyleProperty] = &[
                $( StyleProperty::$name, )+
            ];

            /// Whether the computed value propagates to children.
            pub fn is_inherited(self) -> bool {
                match self {
                    $( StyleProperty::$name => $inherited, )+
                }
            }

            /// Whether discrete animation steps may target the property.
            pub fn is_animatable(self) -> bool {
                match self {
                    $( StyleProperty::$name => $animatable, )+
                }
            }

            /// The property's specified initial value.
            pub fn initial_value(self) -> StyleValue {
                match self {
                    $( StyleProperty::$name => $initial, )+
                }
            }

            /// Whether `value` lies in the property's declared domain.
            pub fn validates(self, value: &StyleValue) -> bool {
                match self {
                    $( StyleProperty::$name => matches!(value, StyleValue::$variant(..)), )+
                }
            }
        }
    };
}

style_properties! {
    /// tts:backgroundColor
    BackgroundColor {
        inherited: false,
        animatable: true,
        domain: Color,
        initial: StyleValue::Color(named::TRANSPARENT),
    }
    /// tts:color
    Color {
        inherited: true,
        animatable: true,
        domain: Color,
        initial: StyleValue::Color(named::WHITE),
    }
    /// tts:direction
    Direction {
        inherited: true,
        animatable: true,
        domain: Direction,
        initial: StyleValue::Direction(Direction::Ltr),
    }
    /// tts:display
    Display {
        inherited: false,
        animatable: true,
        domain: Display,
        initial: StyleValue::Display(Display::Auto),
    }
    /// tts:displayAlign
    DisplayAlign {
        inherited: false,
        animatable: true,
        domain: DisplayAlign,
        initial: StyleValue::DisplayAlign(DisplayAlign::Before),
    }
    /// tts:extent
    Extent {
        inherited: false,
        animatable: true,
        domain: Extent,
        initial: StyleValue::Extent(Extent {
            width: Length::new(100.0, LengthUnit::Rw),
            height: Length::new(100.0, LengthUnit::Rh),
        }),
    }
    /// itts:fillLineGap
    FillLineGap {
        inherited: true,
        animatable: true,
        domain: Boolean,
        initial: StyleValue::Boolean(false),
    }
    /// tts:fontFamily
    FontFamily {
        inherited: true,
        animatable: true,
        domain: FontFamilies,
        initial: StyleValue::FontFamilies(vec![FontFamily::Generic(GenericFontFamily::Default)]),
    }
    /// tts:fontSize
    FontSize {
        inherited: true,
        animatable: true,
        domain: Length,
        initial: StyleValue::Length(Length::cells(1.0)),
    }
    /// tts:fontStyle
    FontStyle {
        inherited: true,
        animatable: true,
        domain: FontStyle,
        initial: StyleValue::FontStyle(FontStyle::Normal),
    }
    /// tts:fontWeight
    FontWeight {
        inherited: true,
        animatable: true,
        domain: FontWeight,
        initial: StyleValue::FontWeight(FontWeight::Normal),
    }
    /// tts:lineHeight
    LineHeight {
        inherited: true,
        animatable: true,
        domain: LineHeight,
        initial: StyleValue::LineHeight(LineHeight::Normal),
    }
    /// ebutts:linePadding
    LinePadding {
        inherited: true,
        animatable: true,
        domain: Length,
        initial: StyleValue::Length(Length::cells(0.0)),
    }
    /// ebutts:multiRowAlign
    MultiRowAlign {
        inherited: true,
        animatable: true,
        domain: MultiRowAlign,
        initial: StyleValue::MultiRowAlign(MultiRowAlign::Auto),
    }
    /// tts:opacity
    Opacity {
        inherited: false,
        animatable: true,
        domain: Number,
        initial: StyleValue::Number(1.0),
    }
    /// tts:origin
    Origin {
        inherited: false,
        animatable: true,
        domain: Position,
        initial: StyleValue::Position(Position { x: Length::pct(0.0), y: Length::pct(0.0) }),
    }
    /// tts:overflow
    Overflow {
        inherited: false,
        animatable: true,
        domain: Overflow,
        initial: StyleValue::Overflow(Overflow::Hidden),
    }
    /// tts:padding
    Padding {
        inherited: false,
        animatable: true,
        domain: Padding,
        initial: StyleValue::Padding(Padding {
            before: Length::rh(0.0),
            end: Length::rh(0.0),
            after: Length::rh(0.0),
            start: Length::rh(0.0),
        }),
    }
    /// tts:position; folded into tts:origin during ISD generation.
    Position {
        inherited: false,
        animatable: true,
        domain: Position,
        initial: StyleValue::Position(Position { x: Length::pct(50.0), y: Length::pct(50.0) }),
    }
    /// tts:rubyAlign
    RubyAlign {
        inherited: true,
        animatable: true,
        domain: RubyAlign,
        initial: StyleValue::RubyAlign(RubyAlign::Center),
    }
    /// tts:rubyPosition
    RubyPosition {
        inherited: true,
        animatable: true,
        domain: RubyPosition,
        initial: StyleValue::RubyPosition(RubyPosition::Outside),
    }
    /// tts:rubyReserve
    RubyReserve {
        inherited: true,
        animatable: true,
        domain: RubyReserve,
        initial: StyleValue::RubyReserve(RubyReserve::None),
    }
    /// tts:shear
    Shear {
        inherited: true,
        animatable: true,
        domain: Number,
        initial: StyleValue::Number(0.0),
    }
    /// tts:showBackground
    ShowBackground {
        inherited: false,
        animatable: true,
        domain: ShowBackground,
        initial: StyleValue::ShowBackground(ShowBackground::Always),
    }
    /// tts:textAlign
    TextAlign {
        inherited: true,
        animatable: true,
        domain: TextAlign,
        initial: StyleValue::TextAlign(TextAlign::Start),
    }
    /// tts:textCombine
    TextCombine {
        inherited: true,
        animatable: true,
        domain: TextCombine,
        initial: StyleValue::TextCombine(TextCombine::None),
    }
    /// tts:textDecoration
    TextDecoration {
        inherited: true,
        animatable: true,
        domain: TextDecoration,
        initial: StyleValue::TextDecoration(TextDecoration::NONE),
    }
    /// tts:textEmphasis
    TextEmphasis {
        inherited: true,
        animatable: true,
        domain: TextEmphasis,
        initial: StyleValue::TextEmphasis(TextEmphasis::NONE),
    }
    /// tts:textOutline
    TextOutline {
        inherited: true,
        animatable: true,
        domain: TextOutline,
        initial: StyleValue::TextOutline(TextOutline::None),
    }
    /// tts:textShadow
    TextShadow {
        inherited: true,
        animatable: true,
        domain: TextShadow,
        initial: StyleValue::TextShadow(TextShadow::None),
    }
    /// tts:unicodeBidi
    UnicodeBidi {
        inherited: false,
        animatable: true,
        domain: UnicodeBidi,
        initial: StyleValue::UnicodeBidi(UnicodeBidi::Normal),
    }
    /// tts:visibility
    Visibility {
        inherited: true,
        animatable: true,
        domain: Visibility,
        initial: StyleValue::Visibility(Visibility::Visible),
    }
    /// tts:wrapOption
    WrapOption {
        inherited: true,
        animatable: true,
        domain: WrapOption,
        initial: StyleValue::WrapOption(WrapOption::Wrap),
    }
    /// tts:writingMode
    WritingMode {
        inherited: false,
        animatable: true,
        domain: WritingMode,
        initial: StyleValue::WritingMode(WritingMode::Lrtb),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_property_has_a_valid_initial_value() {
        for &prop in StyleProperty::ALL {
            assert!(
                prop.validates(&prop.initial_value()),
                "{prop:?} initial value outside its domain"
            );
        }
    }

    #[test]
    fn domains_reject_foreign_variants() {
        assert!(!StyleProperty::Color.validates(&StyleValue::Number(1.0)));
        assert!(StyleProperty::Color.validates(&StyleValue::Color(named::RED)));
        assert!(!StyleProperty::LineHeight.validates(&StyleValue::Length(Length::cells(1.0))));
        assert!(StyleProperty::LineHeight
            .validates(&StyleValue::LineHeight(LineHeight::Length(Length::cells(1.0)))));
    }
}
