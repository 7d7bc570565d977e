//! Content element kinds and the grammar that binds them.

use smallvec::SmallVec;
use std::collections::BTreeMap;

use crate::properties::{StyleProperty, StyleValue};
use crate::styles::WhiteSpaceHandling;
use crate::times::TimeOffset;

/// The closed set of content element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Region,
    Body,
    Div,
    P,
    Span,
    Ruby,
    Rb,
    Rt,
    Rp,
    Rbc,
    Rtc,
    Br,
    Text,
}

impl ElementKind {
    /// Whether `child` may appear under an element of this kind when pushed
    /// one at a time. Ruby containers only accept batch insertion.
    pub(crate) fn accepts_child(self, child: ElementKind) -> bool {
        use ElementKind::*;
        match self {
            Body => matches!(child, Div),
            Div => matches!(child, Div | P),
            P => matches!(child, Span | Br | Ruby),
            Span => matches!(child, Span | Br | Text),
            Rb | Rt | Rp => matches!(child, Span),
            Rbc => matches!(child, Rb),
            Ruby | Rtc | Br | Text | Region => false,
        }
    }

    /// Whether the kind carries temporal attributes.
    pub(crate) fn is_timed(self) -> bool {
        !matches!(self, ElementKind::Br | ElementKind::Text)
    }

    /// Style properties that survive on an ISD element of this kind.
    ///
    /// Styling may be *specified* on any non-text element; this set only
    /// controls which computed values are retained in the ISD.
    pub fn applicable_styles(self) -> &'static [StyleProperty] {
        use StyleProperty::*;
        match self {
            ElementKind::Region => &[
                BackgroundColor,
                Display,
                DisplayAlign,
                Extent,
                Opacity,
                Origin,
                Overflow,
                Padding,
                ShowBackground,
                Visibility,
                WritingMode,
            ],
            ElementKind::Body => &[Display, Opacity, Visibility],
            ElementKind::Div => &[BackgroundColor, Display, Opacity, Visibility],
            ElementKind::P => &[
                BackgroundColor,
                Direction,
                Display,
                FillLineGap,
                LineHeight,
                LinePadding,
                MultiRowAlign,
                Opacity,
                RubyReserve,
                Shear,
                TextAlign,
                UnicodeBidi,
                Visibility,
            ],
            ElementKind::Span | ElementKind::Rb | ElementKind::Rp => &[
                BackgroundColor,
                Color,
                Direction,
                Display,
                FontFamily,
                FontSize,
                FontStyle,
                FontWeight,
                Opacity,
                TextCombine,
                TextDecoration,
                TextEmphasis,
                TextOutline,
                TextShadow,
                UnicodeBidi,
                Visibility,
                WrapOption,
            ],
            ElementKind::Rt => &[
                BackgroundColor,
                Color,
                Direction,
                Display,
                FontFamily,
                FontSize,
                FontStyle,
                FontWeight,
                Opacity,
                RubyPosition,
                TextCombine,
                TextDecoration,
                TextEmphasis,
                TextOutline,
                TextShadow,
                UnicodeBidi,
                Visibility,
                WrapOption,
            ],
            ElementKind::Ruby => {
                &[BackgroundColor, Direction, Display, Opacity, RubyAlign, Visibility]
            }
            ElementKind::Rbc => &[BackgroundColor, Direction, Display, Opacity, Visibility],
            ElementKind::Rtc => {
                &[BackgroundColor, Direction, Display, Opacity, RubyPosition, Visibility]
            }
            ElementKind::Br | ElementKind::Text => &[],
        }
    }
}

/// A discrete change of one style property over an interval, in the
/// element's own parallel time coordinate (TTML `set`).
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationStep {
    pub property: StyleProperty,
    pub begin: Option<TimeOffset>,
    pub end: Option<TimeOffset>,
    pub value: StyleValue,
}

/// Per-node payload stored in the document arena.
#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    pub(crate) kind: ElementKind,
    pub(crate) id: Option<String>,
    pub(crate) styles: BTreeMap<StyleProperty, StyleValue>,
    pub(crate) begin: Option<TimeOffset>,
    pub(crate) end: Option<TimeOffset>,
    pub(crate) animations: SmallVec<[AnimationStep; 2]>,
    pub(crate) region: Option<String>,
    pub(crate) lang: String,
    pub(crate) space: WhiteSpaceHandling,
    pub(crate) text: String,
}

impl ElementData {
    pub(crate) fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            id: None,
            styles: BTreeMap::new(),
            begin: None,
            end: None,
            animations: SmallVec::new(),
            region: None,
            lang: String::new(),
            space: WhiteSpaceHandling::Default,
            text: String::new(),
        }
    }
}

/// Validates an `xml:id` value.
pub(crate) fn is_valid_xml_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// The ruby child patterns allowed by TTML2.
pub(crate) fn is_valid_ruby_children(kinds: &[ElementKind]) -> bool {
    use ElementKind::*;
    matches!(
        kinds,
        [Rb, Rt] | [Rb, Rp, Rt, Rp] | [Rbc, Rtc] | [Rbc, Rtc, Rtc]
    )
}

/// `rtc` children: `rt` elements, optionally wrapped in a leading and a
/// trailing `rp`.
pub(crate) fn is_valid_rtc_children(kinds: &[ElementKind]) -> bool {
    use ElementKind::*;
    let inner = if kinds.len() > 2 && kinds.first() == Some(&Rp) && kinds.last() == Some(&Rp) {
        &kinds[1..kinds.len() - 1]
    } else {
        kinds
    };
    !inner.is_empty() && inner.iter().all(|k| *k == Rt)
}
