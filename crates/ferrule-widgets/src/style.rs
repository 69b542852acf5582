//! Construction style bits.

use bitflags::bitflags;

bitflags! {
    /// Style bits a widget is created with.
    ///
    /// The value reported by [`Widget::style`](crate::Widget::style) may differ
    /// from the one passed at construction: mutually exclusive groups are
    /// normalized by [`check_bits`] and orientation is inherited from the
    /// parent.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Style: u32 {
        const NONE          = 0;

        const BORDER        = 1 << 11;
        const CLIP_CHILDREN = 1 << 12;
        const CLIP_SIBLINGS = 1 << 13;
        const NO_FOCUS      = 1 << 19;
        const H_SCROLL      = 1 << 8;
        const V_SCROLL      = 1 << 9;

        // Orientation (bits 25-27)

        const LEFT_TO_RIGHT = 1 << 25;
        const RIGHT_TO_LEFT = 1 << 26;
        /// Set by the platform when the native widget mirrors its parent.
        const MIRRORED      = 1 << 27;
    }
}

impl Style {
    /// Orientation flags group.
    pub const ORIENTATION: Self = Self::LEFT_TO_RIGHT.union(Self::RIGHT_TO_LEFT);

    #[inline]
    pub fn is_right_to_left(&self) -> bool {
        self.contains(Self::RIGHT_TO_LEFT)
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::NONE
    }
}

/// Collapse a group of mutually exclusive bits to exactly one.
///
/// The first choice present in `style` wins; when none is present the first
/// choice is used. Bits outside the group are left untouched.
pub fn check_bits(style: Style, choices: &[Style]) -> Style {
    let mask = choices.iter().fold(Style::empty(), |acc, bits| acc | *bits);
    let Some(&fallback) = choices.first() else {
        return style;
    };
    let chosen = choices
        .iter()
        .copied()
        .find(|bits| !bits.is_empty() && style.intersects(*bits))
        .unwrap_or(fallback);
    style.difference(mask) | chosen
}

/// Resolve orientation bits for a widget created under `parent`.
pub fn check_orientation(style: Style, parent: Option<Style>) -> Style {
    let mut style = style.difference(Style::MIRRORED);
    if !style.intersects(Style::ORIENTATION) {
        if let Some(parent) = parent {
            style |= parent & Style::ORIENTATION;
        }
    }
    check_bits(style, &[Style::LEFT_TO_RIGHT, Style::RIGHT_TO_LEFT])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_bits_defaults_to_first() {
        let style = check_bits(Style::BORDER, &[Style::H_SCROLL, Style::V_SCROLL]);
        assert_eq!(style, Style::BORDER | Style::H_SCROLL);
    }

    #[test]
    fn test_check_bits_first_present_wins() {
        let style = check_bits(
            Style::H_SCROLL | Style::V_SCROLL,
            &[Style::H_SCROLL, Style::V_SCROLL],
        );
        assert_eq!(style, Style::H_SCROLL);

        let style = check_bits(Style::V_SCROLL, &[Style::H_SCROLL, Style::V_SCROLL]);
        assert_eq!(style, Style::V_SCROLL);
    }

    #[test]
    fn test_check_bits_empty_choices() {
        assert_eq!(check_bits(Style::BORDER, &[]), Style::BORDER);
    }

    #[test]
    fn test_orientation_inherited_from_parent() {
        let style = check_orientation(Style::BORDER, Some(Style::RIGHT_TO_LEFT));
        assert!(style.is_right_to_left());
        assert!(style.contains(Style::BORDER));
    }

    #[test]
    fn test_orientation_explicit_and_mirrored_cleared() {
        let style = check_orientation(
            Style::LEFT_TO_RIGHT | Style::MIRRORED,
            Some(Style::RIGHT_TO_LEFT),
        );
        assert_eq!(style, Style::LEFT_TO_RIGHT);
    }

    #[test]
    fn test_orientation_defaults_left_to_right() {
        assert_eq!(check_orientation(Style::NONE, None), Style::LEFT_TO_RIGHT);
    }
}
