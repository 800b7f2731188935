//! Page geometry, in PDF points.
//!
//! Coordinates produced by the layout are top-left based (y grows
//! downwards); the PDF writer flips them.

use serde::{Deserialize, Serialize};

use super::LayoutError;

/// A4 portrait.
pub const A4_WIDTH: f32 = 595.28;
pub const A4_HEIGHT: f32 = 841.89;

/// Page template tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub page_width: f32,
    pub page_height: f32,
    /// Margin on all four sides.
    pub padding: f32,

    pub header_height: f32,
    pub logo_width: f32,
    pub logo_height: f32,
    /// Space between the logo and the header text.
    pub logo_gap: f32,
    /// Space between the header and whatever follows it.
    pub header_gap: f32,
    pub header_bold_size: f32,
    pub header_regular_size: f32,

    pub title_size: f32,
    pub title_gap: f32,

    /// Photo box width as a fraction of the content width.
    pub photo_width_ratio: f32,
    pub photo_max_height: f32,
    pub caption_size: f32,
    /// Space between a photo and its caption.
    pub caption_gap: f32,
    /// Space after each photo block.
    pub block_gap: f32,
    pub photos_per_page: usize,
    /// Caption drawn when a photo has none.
    pub empty_caption: String,

    pub footer_size: f32,
    /// Distance from the page bottom to the footer's last line.
    pub footer_bottom: f32,

    /// Line box height as a multiple of the font size.
    pub line_height: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            padding: 20.0,
            header_height: 100.0,
            logo_width: 75.0,
            logo_height: 100.0,
            logo_gap: 15.0,
            header_gap: 20.0,
            header_bold_size: 14.0,
            header_regular_size: 12.0,
            title_size: 20.0,
            title_gap: 5.0,
            photo_width_ratio: 0.72,
            photo_max_height: 300.0,
            caption_size: 12.0,
            caption_gap: 2.0,
            block_gap: 15.0,
            photos_per_page: 2,
            empty_caption: "Sem descrição".to_string(),
            footer_size: 10.0,
            footer_bottom: 10.0,
            line_height: 1.2,
        }
    }
}

impl PageLayout {
    pub fn content_left(&self) -> f32 {
        self.padding
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.padding
    }

    pub fn photo_box_width(&self) -> f32 {
        self.content_width() * self.photo_width_ratio
    }

    pub fn line_box(&self, font_size: f32) -> f32 {
        font_size * self.line_height
    }

    /// Reject templates that cannot hold a single photo.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let positive = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("photo_width_ratio", self.photo_width_ratio),
            ("photo_max_height", self.photo_max_height),
            ("line_height", self.line_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutError::InvalidTemplate(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.photos_per_page == 0 {
            return Err(LayoutError::InvalidTemplate(
                "photos_per_page must be at least 1".to_string(),
            ));
        }
        if self.content_width() <= 0.0 {
            return Err(LayoutError::InvalidTemplate(format!(
                "padding {} leaves no content width",
                self.padding
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_a4_portrait() {
        let layout = PageLayout::default();
        assert_eq!(layout.page_width, 595.28);
        assert_eq!(layout.page_height, 841.89);
        assert!((layout.content_width() - 555.28).abs() < 1e-3);
        assert!((layout.photo_box_width() - 399.80).abs() < 0.01);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let layout = PageLayout {
            photos_per_page: 0,
            ..PageLayout::default()
        };
        assert!(matches!(layout.validate(), Err(LayoutError::InvalidTemplate(_))));
    }

    #[test]
    fn test_validate_rejects_oversized_padding() {
        let layout = PageLayout {
            padding: 400.0,
            ..PageLayout::default()
        };
        assert!(layout.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let layout = PageLayout {
            photo_max_height: f32::NAN,
            ..PageLayout::default()
        };
        assert!(layout.validate().is_err());
    }
}
