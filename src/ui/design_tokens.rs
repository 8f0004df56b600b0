// SPDX-License-Identifier: MPL-2.0
//! Design tokens: the palette, spacing, sizing and typography scales shared
//! by every view.
//!
//! ```
//! use backpack_configurator::ui::design_tokens::{opacity, palette, spacing};
//! use iced::Color;
//!
//! let backdrop = Color {
//!     a: opacity::BACKDROP,
//!     ..palette::BLACK
//! };
//! let padding = spacing::MD; // 16px
//! ```

use iced::Color;

// ============================================================================
// Color Palette
// ============================================================================

pub mod palette {
    use super::Color;

    // Grayscale
    pub const BLACK: Color = Color::BLACK;
    pub const WHITE: Color = Color::WHITE;
    pub const GRAY_700: Color = Color::from_rgb(0.4, 0.4, 0.4); // #666
    pub const GRAY_400: Color = Color::from_rgb(0.6, 0.6, 0.6);
    pub const GRAY_100: Color = Color::from_rgb(0.973, 0.976, 0.98); // #f8f9fa

    /// Window background behind the panels.
    pub const BACKGROUND: Color = Color::from_rgb(0.961, 0.961, 0.961); // #f5f5f5
    pub const TITLE: Color = Color::from_rgb(0.2, 0.2, 0.2); // #333
    /// Backdrop of the 3D viewport.
    pub const VIEWPORT: Color = Color::WHITE;

    // Action colors
    pub const PRIMARY_500: Color = Color::from_rgb(0.0, 0.482, 1.0); // #007bff
    pub const PRIMARY_700: Color = Color::from_rgb(0.0, 0.337, 0.702); // #0056b3

    // Semantic colors
    pub const ERROR_500: Color = Color::from_rgb(0.898, 0.224, 0.208);
    pub const WARNING_500: Color = Color::from_rgb(0.945, 0.651, 0.125);
    pub const SUCCESS_500: Color = Color::from_rgb(0.263, 0.702, 0.404);
    pub const INFO_500: Color = Color::from_rgb(0.392, 0.588, 1.0);
}

// ============================================================================
// Opacity Scale
// ============================================================================

pub mod opacity {
    pub const OVERLAY_SUBTLE: f32 = 0.2;
    pub const OVERLAY_MEDIUM: f32 = 0.5;
    /// Modal backdrop dimming.
    pub const BACKDROP: f32 = 0.5;
}

// ============================================================================
// Spacing Scale (8px baseline grid)
// ============================================================================

pub mod spacing {
    pub const XXS: f32 = 4.0;
    pub const XS: f32 = 8.0;
    pub const SM: f32 = 12.0;
    pub const MD: f32 = 16.0;
    pub const LG: f32 = 24.0;
    pub const XL: f32 = 32.0;
}

// ============================================================================
// Sizing Scale
// ============================================================================

pub mod sizing {
    /// Maximum width of the viewer and the controls column.
    pub const CONTENT_MAX_WIDTH: f32 = 600.0;
    pub const VIEWER_HEIGHT: f32 = 400.0;
    pub const TOAST_WIDTH: f32 = 320.0;
    pub const POPUP_WIDTH: f32 = 400.0;
    /// Height of the inline AR preview inside the popup.
    pub const POPUP_VIEWER_HEIGHT: f32 = 400.0;
    pub const CLOSE_BUTTON: f32 = 32.0;
}

// ============================================================================
// Typography Scale
// ============================================================================

pub mod typography {
    pub const TITLE_LG: f32 = 28.0;
    pub const TITLE_MD: f32 = 22.0;
    pub const BODY_LG: f32 = 16.0;
    pub const BODY: f32 = 14.0;
    pub const CAPTION: f32 = 12.0;
}

pub mod border {
    pub const WIDTH_MD: f32 = 2.0;
}

pub mod radius {
    pub const SM: f32 = 4.0;
    pub const MD: f32 = 8.0;
}

pub mod shadow {
    use super::palette;
    use iced::{Shadow, Vector};

    pub const NONE: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector::ZERO,
        blur_radius: 0.0,
    };

    pub const MD: Shadow = Shadow {
        color: iced::Color::from_rgba(0.0, 0.0, 0.0, 0.1),
        offset: Vector { x: 0.0, y: 4.0 },
        blur_radius: 8.0,
    };
}

// ============================================================================
// Compile-time Validation
// ============================================================================

const _: () = {
    assert!(spacing::XS > 0.0);
    assert!(spacing::SM > spacing::XS);
    assert!(spacing::MD > spacing::SM);
    assert!(spacing::LG > spacing::MD);

    assert!(opacity::BACKDROP > 0.0 && opacity::BACKDROP < 1.0);

    assert!(typography::TITLE_LG > typography::TITLE_MD);
    assert!(typography::BODY_LG > typography::BODY);
    assert!(typography::BODY > typography::CAPTION);

    assert!(sizing::POPUP_WIDTH > sizing::TOAST_WIDTH);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_scale_is_consistent() {
        assert_eq!(spacing::MD, spacing::XS * 2.0);
        assert_eq!(spacing::XL, spacing::MD * 2.0);
    }

    #[test]
    fn hover_action_color_is_darker() {
        assert!(palette::PRIMARY_700.b < palette::PRIMARY_500.b);
    }
}
