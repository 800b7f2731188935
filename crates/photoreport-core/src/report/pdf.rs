//! PDF serialization of laid-out pages.
//!
//! Photos are embedded as their JPEG streams (DCTDecode) without
//! re-compression; the logo is decoded and stored Flate-compressed. Text
//! uses the standard Helvetica faces with WinAnsi encoding.

use std::borrow::Cow;
use std::io::Cursor;

use image::codecs::jpeg::JpegDecoder;
use image::{ColorType, ImageDecoder};
use log::debug;
use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect as PdfRect, Ref, Str, TextStr};

use super::assets::AssetProvider;
use super::fonts::{encode_win_ansi, FontFace};
use super::layout::PageLayout;
use super::paginate::{Page, Rect, TextRun};
use super::RenderError;
use crate::decode::{decode_image, decode_image_no_orientation};
use crate::display::ResolvedImage;
use crate::encode::{encode_image, Quality};

const LOGO_NAME: &[u8] = b"Logo";

/// zlib level for the logo stream.
const FLATE_LEVEL: u8 = 6;

/// An image ready to be written as an XObject.
struct Embedded<'a> {
    data: Cow<'a, [u8]>,
    filter: Filter,
    width: u32,
    height: u32,
    gray: bool,
}

/// Write `pages` as a PDF document.
///
/// `images[block.source]` must hold the resolved image for every block.
/// JPEGs that are neither RGB nor grayscale are re-encoded at `quality`.
pub fn render_pdf(
    pages: &[Page],
    images: &[ResolvedImage],
    assets: &dyn AssetProvider,
    layout: &PageLayout,
    quality: Quality,
) -> Result<Vec<u8>, RenderError> {
    let mut pdf = Pdf::new();
    let mut alloc = Ref::new(1);

    let catalog_id = alloc.bump();
    let pages_id = alloc.bump();
    let info_id = alloc.bump();
    let font_ids: Vec<(FontFace, Ref)> = FontFace::ALL.iter().map(|&f| (f, alloc.bump())).collect();

    let logo = assets
        .logo()
        .map(|bytes| embed_logo(bytes).map(|embedded| (alloc.bump(), embedded)))
        .transpose()?;

    let page_ids: Vec<(Ref, Ref)> = pages.iter().map(|_| (alloc.bump(), alloc.bump())).collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.document_info(info_id)
        .title(TextStr(assets.title()))
        .producer(TextStr(concat!("photoreport ", env!("CARGO_PKG_VERSION"))));
    pdf.pages(pages_id)
        .kids(page_ids.iter().map(|&(page_id, _)| page_id))
        .count(pages.len() as i32);

    for &(face, id) in &font_ids {
        pdf.type1_font(id)
            .base_font(Name(face.base_font()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    if let Some((id, embedded)) = &logo {
        write_image(&mut pdf, *id, embedded);
    }

    for (page, &(page_id, content_id)) in pages.iter().zip(&page_ids) {
        let mut xobjects: Vec<(Vec<u8>, Ref)> = Vec::with_capacity(page.blocks.len() + 1);
        let mut content = Content::new();

        if let Some((id, embedded)) = &logo {
            let area = page.header.logo.fit_contain(embedded.width, embedded.height);
            draw_image(&mut content, LOGO_NAME, &area, layout);
            xobjects.push((LOGO_NAME.to_vec(), *id));
        }

        for run in &page.header.lines {
            draw_text(&mut content, run, layout);
        }
        if let Some(title) = &page.title {
            draw_text(&mut content, title, layout);
        }

        for block in &page.blocks {
            let resolved = images
                .get(block.source)
                .ok_or(RenderError::MissingImage(block.source))?;
            let embedded = embed_jpeg(resolved, quality).map_err(|reason| RenderError::Image {
                index: block.source,
                reason,
            })?;

            let id = alloc.bump();
            write_image(&mut pdf, id, &embedded);

            let name = format!("Im{}", block.source).into_bytes();
            draw_image(&mut content, &name, &block.image, layout);
            draw_text(&mut content, &block.caption, layout);
            xobjects.push((name, id));
        }

        for run in &page.footer {
            draw_text(&mut content, run, layout);
        }

        let content_data = content.finish();
        pdf.stream(content_id, &content_data);

        let mut pdf_page = pdf.page(page_id);
        pdf_page.parent(pages_id);
        pdf_page.media_box(PdfRect::new(0.0, 0.0, layout.page_width, layout.page_height));
        pdf_page.contents(content_id);

        let mut resources = pdf_page.resources();
        let mut fonts = resources.fonts();
        for &(face, id) in &font_ids {
            fonts.pair(Name(face.resource_name()), id);
        }
        fonts.finish();
        let mut objects = resources.x_objects();
        for (name, id) in &xobjects {
            objects.pair(Name(name), *id);
        }
        objects.finish();
        resources.finish();
        pdf_page.finish();

        debug!("rendered page {} with {} photos", page.index + 1, page.blocks.len());
    }

    Ok(pdf.finish())
}

fn write_image(pdf: &mut Pdf, id: Ref, embedded: &Embedded<'_>) {
    let mut image = pdf.image_xobject(id, &embedded.data);
    image.filter(embedded.filter);
    image.width(embedded.width as i32);
    image.height(embedded.height as i32);
    if embedded.gray {
        image.color_space().device_gray();
    } else {
        image.color_space().device_rgb();
    }
    image.bits_per_component(8);
    image.finish();
}

/// Place an XObject over `area`, flipping to PDF's bottom-left origin.
fn draw_image(content: &mut Content, name: &[u8], area: &Rect, layout: &PageLayout) {
    let y = layout.page_height - area.y - area.height;
    content.save_state();
    content.transform([area.width, 0.0, 0.0, area.height, area.x, y]);
    content.x_object(Name(name));
    content.restore_state();
}

fn draw_text(content: &mut Content, run: &TextRun, layout: &PageLayout) {
    let encoded = encode_win_ansi(&run.text);
    content.begin_text();
    content.set_font(Name(run.face.resource_name()), run.size);
    content.next_line(run.x, layout.page_height - run.baseline);
    content.show(Str(&encoded));
    content.end_text();
}

/// Embed a resolved JPEG as-is when its color model allows it.
fn embed_jpeg(resolved: &ResolvedImage, quality: Quality) -> Result<Embedded<'_>, String> {
    let decoder = JpegDecoder::new(Cursor::new(&resolved.bytes[..])).map_err(|e| e.to_string())?;
    let (width, height) = decoder.dimensions();

    match decoder.color_type() {
        ColorType::Rgb8 | ColorType::L8 => Ok(Embedded {
            gray: decoder.color_type() == ColorType::L8,
            data: Cow::Borrowed(&resolved.bytes[..]),
            filter: Filter::DctDecode,
            width,
            height,
        }),
        other => {
            debug!("re-encoding {other:?} JPEG for embedding");
            let decoded = decode_image_no_orientation(&resolved.bytes).map_err(|e| e.to_string())?;
            let bytes = encode_image(&decoded, quality).map_err(|e| e.to_string())?;
            Ok(Embedded {
                data: Cow::Owned(bytes),
                filter: Filter::DctDecode,
                width: decoded.width,
                height: decoded.height,
                gray: false,
            })
        }
    }
}

fn embed_logo(bytes: &[u8]) -> Result<Embedded<'static>, RenderError> {
    let decoded = decode_image(bytes).map_err(RenderError::Logo)?;
    Ok(Embedded {
        data: Cow::Owned(compress_to_vec_zlib(&decoded.pixels, FLATE_LEVEL)),
        filter: Filter::FlateDecode,
        width: decoded.width,
        height: decoded.height,
        gray: false,
    })
}
