//! Page layout: ordered photos into fixed-capacity pages.
//!
//! Every page is `header → [title] → content → footer`. The title appears on
//! the first page only. Photos are taken in position order and split into
//! contiguous groups of `photos_per_page`; the last group may be short.
//!
//! Layout is pure geometry. It never touches pixels, so the same input
//! always yields the same pages.

use crate::collection::PhotoId;

use super::assets::{AssetProvider, ReportHeader};
use super::fonts::{text_width, FontFace};
use super::layout::PageLayout;
use super::LayoutError;

/// Helvetica ascender, as a fraction of the font size.
const ASCENT: f32 = 0.718;

/// Space between the top of the header box and its first text line.
const HEADER_TEXT_INSET: f32 = 3.0;

/// An axis-aligned box, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// The largest box with the given aspect ratio that fits inside this
    /// one, centred. Nothing is cropped.
    pub fn fit_contain(&self, width: u32, height: u32) -> Rect {
        if width == 0 || height == 0 {
            return *self;
        }
        let scale = (self.width / width as f32).min(self.height / height as f32);
        let w = width as f32 * scale;
        let h = height as f32 * scale;
        Rect::new(
            self.x + (self.width - w) / 2.0,
            self.y + (self.height - h) / 2.0,
            w,
            h,
        )
    }

    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f32 = 1e-3;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }
}

/// A single line of text positioned on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub face: FontFace,
    pub size: f32,
    pub x: f32,
    /// Baseline, measured from the page top.
    pub baseline: f32,
}

/// What the layout needs to know about one resolved photo.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoSlot {
    pub id: PhotoId,
    pub position: u32,
    /// Display pixel dimensions, after rotation.
    pub width: u32,
    pub height: u32,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRegion {
    pub logo: Rect,
    pub lines: Vec<TextRun>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoBlock {
    pub photo: PhotoId,
    pub position: u32,
    /// Index of the slot this block was built from.
    pub source: usize,
    /// The fixed box reserved for the image.
    pub frame: Rect,
    /// Where the image is drawn, inside `frame`.
    pub image: Rect,
    pub caption: TextRun,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub index: usize,
    pub header: HeaderRegion,
    pub title: Option<TextRun>,
    pub blocks: Vec<PhotoBlock>,
    pub footer: Vec<TextRun>,
}

/// Lay out `slots` into pages.
///
/// Slots may arrive in any order; they are placed by `position`.
///
/// # Errors
///
/// `LayoutError::EmptyReport` for no slots, `InvalidTemplate` for an
/// unusable layout, `Overflow` when the template leaves no room for photos.
pub fn paginate(
    slots: &[PhotoSlot],
    header: &ReportHeader,
    assets: &dyn AssetProvider,
    layout: &PageLayout,
) -> Result<Vec<Page>, LayoutError> {
    if slots.is_empty() {
        return Err(LayoutError::EmptyReport);
    }
    layout.validate()?;

    let mut order: Vec<usize> = (0..slots.len()).collect();
    order.sort_by_key(|&idx| slots[idx].position);

    let header_region = header_region(header, assets, layout);
    let footer_top = footer_top(assets, layout);
    let footer = footer_lines(assets, footer_top, layout);

    let pages = order
        .chunks(layout.photos_per_page)
        .enumerate()
        .map(|(index, group)| {
            let mut cursor = layout.padding + layout.header_height + layout.header_gap;

            let title = (index == 0).then(|| {
                let run = centred_run(
                    assets.title(),
                    FontFace::Bold,
                    layout.title_size,
                    cursor,
                    layout,
                );
                cursor += layout.line_box(layout.title_size) + layout.title_gap;
                run
            });

            let blocks = photo_blocks(slots, group, cursor, footer_top, layout)?;

            Ok(Page {
                index,
                header: header_region.clone(),
                title,
                blocks,
                footer: footer.clone(),
            })
        })
        .collect::<Result<Vec<_>, LayoutError>>()?;

    Ok(pages)
}

fn photo_blocks(
    slots: &[PhotoSlot],
    group: &[usize],
    top: f32,
    bottom: f32,
    layout: &PageLayout,
) -> Result<Vec<PhotoBlock>, LayoutError> {
    let capacity = layout.photos_per_page as f32;
    let overhead = layout.caption_gap + layout.line_box(layout.caption_size) + layout.block_gap;
    let available = bottom - top;
    let frame_height = ((available - capacity * overhead) / capacity).min(layout.photo_max_height);

    if frame_height <= 0.0 {
        return Err(LayoutError::Overflow {
            available,
            required: capacity * overhead,
        });
    }

    let frame_width = layout.photo_box_width();
    let frame_x = layout.content_left() + (layout.content_width() - frame_width) / 2.0;

    let mut cursor = top;
    let blocks = group
        .iter()
        .map(|&source| {
            let slot = &slots[source];
            let frame = Rect::new(frame_x, cursor, frame_width, frame_height);
            let image = frame.fit_contain(slot.width, slot.height);

            let text = if slot.caption.is_empty() {
                layout.empty_caption.as_str()
            } else {
                slot.caption.as_str()
            };
            let caption_top = frame.bottom() + layout.caption_gap;
            let caption = centred_run(
                text,
                FontFace::Regular,
                layout.caption_size,
                caption_top,
                layout,
            );

            cursor += frame_height + overhead;
            PhotoBlock {
                photo: slot.id,
                position: slot.position,
                source,
                frame,
                image,
                caption,
            }
        })
        .collect();

    Ok(blocks)
}

fn header_region(
    header: &ReportHeader,
    assets: &dyn AssetProvider,
    layout: &PageLayout,
) -> HeaderRegion {
    let logo = Rect::new(
        layout.content_left(),
        layout.padding,
        layout.logo_width,
        layout.logo_height,
    );
    let x = logo.right() + layout.logo_gap;

    let mut top = layout.padding + HEADER_TEXT_INSET;
    let lines = assets
        .header_lines()
        .iter()
        .map(|line| {
            let (face, size) = if line.bold {
                (FontFace::Bold, layout.header_bold_size)
            } else {
                (FontFace::Regular, layout.header_regular_size)
            };
            let run = TextRun {
                text: line.render(header),
                face,
                size,
                x,
                baseline: baseline(top, size, layout),
            };
            top += layout.line_box(size);
            run
        })
        .collect();

    HeaderRegion { logo, lines }
}

fn footer_top(assets: &dyn AssetProvider, layout: &PageLayout) -> f32 {
    let count = assets.footer_lines().len() as f32;
    layout.page_height - layout.footer_bottom - count * layout.line_box(layout.footer_size)
}

fn footer_lines(assets: &dyn AssetProvider, top: f32, layout: &PageLayout) -> Vec<TextRun> {
    let size = layout.footer_size;
    let mut top = top;

    assets
        .footer_lines()
        .iter()
        .map(|text| {
            let run = centred_run(text, FontFace::Regular, size, top, layout);
            top += layout.line_box(size);
            run
        })
        .collect()
}

/// A run centred across the content width, shrunk if it would not fit.
fn centred_run(text: &str, face: FontFace, size: f32, top: f32, layout: &PageLayout) -> TextRun {
    let natural = text_width(text, face, size);
    let max = layout.content_width();
    let fitted = if natural > max { size * max / natural } else { size };
    let width = text_width(text, face, fitted);

    TextRun {
        text: text.to_string(),
        face,
        size: fitted,
        x: layout.content_left() + (max - width) / 2.0,
        baseline: baseline(top, size, layout),
    }
}

fn half_leading(size: f32, layout: &PageLayout) -> f32 {
    (layout.line_box(size) - size) / 2.0
}

fn baseline(top: f32, size: f32, layout: &PageLayout) -> f32 {
    top + half_leading(size, layout) + ASCENT * size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::assets::StaticAssets;

    fn header() -> ReportHeader {
        ReportHeader::new("AB1234/25", "1", "3").unwrap()
    }

    fn slots(n: u32) -> Vec<PhotoSlot> {
        (1..=n)
            .map(|p| PhotoSlot {
                id: PhotoId(u64::from(p) * 10),
                position: p,
                width: 1600,
                height: 1200,
                caption: format!("Foto {p}"),
            })
            .collect()
    }

    fn layout_of(n: u32) -> Vec<Page> {
        paginate(&slots(n), &header(), &StaticAssets::default(), &PageLayout::default()).unwrap()
    }

    #[test]
    fn test_five_photos_make_three_pages() {
        let pages = layout_of(5);
        let counts: Vec<usize> = pages.iter().map(|p| p.blocks.len()).collect();
        assert_eq!(counts, vec![2, 2, 1]);
    }

    #[test]
    fn test_title_only_on_first_page() {
        let pages = layout_of(5);
        assert!(pages[0].title.is_some());
        assert!(pages[1..].iter().all(|p| p.title.is_none()));
        assert_eq!(pages[0].title.as_ref().unwrap().text, "Relatório Fotográfico");
    }

    #[test]
    fn test_header_and_footer_on_every_page() {
        let pages = layout_of(5);
        for page in &pages {
            assert_eq!(page.header.lines.len(), 6);
            assert_eq!(page.footer.len(), 2);
            assert_eq!(page.header, pages[0].header);
            assert_eq!(page.footer, pages[0].footer);
        }
        assert_eq!(
            pages[0].header.lines[5].text,
            "Boletim de Ocorrência AB1234/25 Versão 1"
        );
    }

    #[test]
    fn test_pages_follow_position_not_input_order() {
        let mut input = slots(3);
        input.reverse();
        let pages =
            paginate(&input, &header(), &StaticAssets::default(), &PageLayout::default()).unwrap();
        let positions: Vec<u32> = pages
            .iter()
            .flat_map(|p| p.blocks.iter().map(|b| b.position))
            .collect();
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(pages[0].blocks[0].source, 2);
    }

    #[test]
    fn test_empty_is_rejected() {
        assert_eq!(
            paginate(&[], &header(), &StaticAssets::default(), &PageLayout::default()),
            Err(LayoutError::EmptyReport)
        );
    }

    #[test]
    fn test_image_keeps_aspect_inside_frame() {
        let mut input = slots(2);
        input[1].width = 900;
        input[1].height = 1600;
        let pages =
            paginate(&input, &header(), &StaticAssets::default(), &PageLayout::default()).unwrap();

        for block in &pages[0].blocks {
            assert!(block.frame.contains(&block.image));
            let slot = &input[block.source];
            let expected = slot.width as f32 / slot.height as f32;
            assert!((block.image.width / block.image.height - expected).abs() < 1e-3);
        }
        // Portrait fills the frame height, landscape the width.
        let portrait = &pages[0].blocks[1];
        assert!((portrait.image.height - portrait.frame.height).abs() < 1e-3);
        let landscape = &pages[0].blocks[0];
        assert!((landscape.image.width - landscape.frame.width).abs() < 1e-3);
    }

    #[test]
    fn test_blocks_stay_above_footer() {
        let pages = layout_of(4);
        let layout = PageLayout::default();
        for page in &pages {
            let footer_top = page.footer[0].baseline - ASCENT * layout.footer_size;
            let last = page.blocks.last().unwrap();
            assert!(last.caption.baseline < footer_top);
            assert!(last.frame.bottom() < footer_top);
            assert!(page.blocks[0].frame.y >= layout.padding + layout.header_height);
        }
    }

    #[test]
    fn test_frames_capped_at_max_height() {
        let pages = layout_of(4);
        assert!(pages[1].blocks[0].frame.height <= 300.0 + 1e-3);
        assert!(pages[0].blocks[0].frame.height <= pages[1].blocks[0].frame.height);
    }

    #[test]
    fn test_empty_caption_uses_placeholder() {
        let mut input = slots(1);
        input[0].caption = String::new();
        let pages =
            paginate(&input, &header(), &StaticAssets::default(), &PageLayout::default()).unwrap();
        assert_eq!(pages[0].blocks[0].caption.text, "Sem descrição");
    }

    #[test]
    fn test_whitespace_caption_is_drawn_verbatim() {
        let mut input = slots(1);
        input[0].caption = "   ".to_string();
        let pages =
            paginate(&input, &header(), &StaticAssets::default(), &PageLayout::default()).unwrap();
        assert_eq!(pages[0].blocks[0].caption.text, "   ");
    }

    #[test]
    fn test_caption_at_bound_is_kept_verbatim() {
        let mut input = slots(1);
        input[0].caption = "W".repeat(78);
        let layout = PageLayout::default();
        let pages = paginate(&input, &header(), &StaticAssets::default(), &layout).unwrap();
        let caption = &pages[0].blocks[0].caption;
        assert_eq!(caption.text, "W".repeat(78));
        let width = text_width(&caption.text, caption.face, caption.size);
        assert!(width <= layout.content_width() + 1e-3);
        assert!(caption.x >= layout.content_left() - 1e-3);
    }

    #[test]
    fn test_caption_is_centred() {
        let pages = layout_of(1);
        let layout = PageLayout::default();
        let caption = &pages[0].blocks[0].caption;
        let width = text_width(&caption.text, caption.face, caption.size);
        let centre = caption.x + width / 2.0;
        assert!((centre - layout.page_width / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_overflowing_template_is_an_error() {
        let layout = PageLayout {
            photos_per_page: 40,
            ..PageLayout::default()
        };
        assert!(matches!(
            paginate(&slots(1), &header(), &StaticAssets::default(), &layout),
            Err(LayoutError::Overflow { .. })
        ));
    }

    #[test]
    fn test_fit_contain_centres() {
        let frame = Rect::new(0.0, 0.0, 200.0, 100.0);
        let fitted = frame.fit_contain(100, 100);
        assert_eq!(fitted, Rect::new(50.0, 0.0, 100.0, 100.0));
        assert_eq!(frame.fit_contain(0, 10), frame);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::report::assets::StaticAssets;
    use proptest::prelude::*;

    proptest! {
        /// Pages hold ceil(n / k) groups, in position order, all on the page.
        #[test]
        fn prop_partition_is_contiguous_and_ordered(
            n in 1u32..30,
            k in 1usize..5,
            dims in prop::collection::vec((1u32..4000, 1u32..4000), 30),
        ) {
            let slots: Vec<PhotoSlot> = (1..=n)
                .map(|p| PhotoSlot {
                    id: PhotoId(u64::from(p)),
                    position: p,
                    width: dims[p as usize - 1].0,
                    height: dims[p as usize - 1].1,
                    caption: String::new(),
                })
                .collect();
            let layout = PageLayout { photos_per_page: k, ..PageLayout::default() };
            let header = ReportHeader::new("AB1234/25", "1", "3").unwrap();
            let pages = paginate(&slots, &header, &StaticAssets::default(), &layout).unwrap();

            prop_assert_eq!(pages.len(), (n as usize).div_ceil(k));
            let positions: Vec<u32> = pages
                .iter()
                .flat_map(|p| p.blocks.iter().map(|b| b.position))
                .collect();
            prop_assert_eq!(positions, (1..=n).collect::<Vec<_>>());

            let sheet = Rect::new(0.0, 0.0, layout.page_width, layout.page_height);
            for page in &pages {
                prop_assert!(page.blocks.len() <= k);
                prop_assert_eq!(page.title.is_some(), page.index == 0);
                for block in &page.blocks {
                    prop_assert!(sheet.contains(&block.frame));
                    prop_assert!(block.frame.contains(&block.image));
                }
            }
        }
    }
}
