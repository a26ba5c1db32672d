//! Text-over-image captioning engine
//!
//! Decodes the source image, composites it onto a CPU raster surface, lays
//! out each wrapped caption line with Parley, draws a dark outline under a
//! white fill for legibility, and encodes the result as a JPEG data URL.

use std::sync::Arc;

use base64::Engine as _;

use crate::error::{MemeError, Result};
use crate::render::wrap::wrap_text;

/// Padding between the text blocks and the image edge, in pixels.
const PADDING: f32 = 10.0;
/// Width of the dark outline drawn under the white fill.
const OUTLINE_WIDTH: f64 = 3.0;
/// JPEG quality of the encoded output.
const JPEG_QUALITY: u8 = 90;
/// The image width is divided by this to obtain the caption font size.
const FONT_SIZE_DIVISOR: f32 = 15.0;
/// Line advance as a multiple of the font size.
const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BrushRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Default for BrushRgba8 {
    /// Caption fill color: opaque white.
    fn default() -> Self {
        Self {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        }
    }
}

/// Renders wrapped top/bottom captions onto images with a caller-supplied
/// font.
pub struct CaptionRenderer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<BrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl CaptionRenderer {
    /// Construct a renderer from raw font bytes (TTF/OTF).
    pub fn new(font_bytes: Vec<u8>) -> Result<Self> {
        let mut font_ctx = parley::FontContext::default();

        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| MemeError::ImageLoad("no font families in font bytes".to_string()))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| MemeError::ImageLoad("font family has no name".to_string()))?
            .to_string();

        let font =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    /// Caption `image_bytes` with wrapped top and bottom text and return the
    /// result as a `data:image/jpeg;base64,...` URL.
    pub fn render_caption(
        &mut self,
        image_bytes: &[u8],
        top_text: &str,
        bottom_text: &str,
    ) -> Result<String> {
        let source = image::load_from_memory(image_bytes)
            .map_err(|e| MemeError::ImageLoad(format!("decode image: {e}")))?;
        let rgba = source.to_rgba8();
        let (width, height) = rgba.dimensions();

        let width_u16: u16 = width
            .try_into()
            .map_err(|_| MemeError::ImageLoad("image width exceeds u16".to_string()))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| MemeError::ImageLoad("image height exceeds u16".to_string()))?;

        let mut base = rgba.into_raw();
        premultiply_rgba8_in_place(&mut base);
        let paint = rgba_premul_to_image(&base, width, height)?;

        let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            width as f64,
            height as f64,
        ));

        let font_size = (width as f32 / FONT_SIZE_DIVISOR).floor();
        let line_height = font_size * LINE_HEIGHT_FACTOR;
        let max_text_width = width as f32 - 2.0 * PADDING;

        let top_lines = self.wrap_block(top_text, font_size, max_text_width);
        let bottom_lines = self.wrap_block(bottom_text, font_size, max_text_width);

        let mut y = PADDING;
        for line in &top_lines {
            self.draw_line(&mut ctx, line, font_size, width as f32, y);
            y += line_height;
        }

        let mut y = bottom_block_start(height as f32, bottom_lines.len(), line_height);
        for line in &bottom_lines {
            self.draw_line(&mut ctx, line, font_size, width as f32, y);
            y += line_height;
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
        ctx.render_to_pixmap(&mut pixmap);

        encode_jpeg_data_url(pixmap.data_as_u8_slice(), width, height)
    }

    /// Wrap one text block against the Parley-measured line width.
    fn wrap_block(&mut self, text: &str, font_size: f32, max_width: f32) -> Vec<String> {
        wrap_text(text, max_width, |candidate: &str| {
            self.layout_line(candidate, font_size).width()
        })
    }

    /// Shape a single pre-wrapped line at the given size.
    fn layout_line(&mut self, text: &str, font_size: f32) -> parley::Layout<BrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font_size));
        builder.push_default(parley::style::StyleProperty::Brush(BrushRgba8::default()));

        let mut layout: parley::Layout<BrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Draw one line centered at vertical offset `y`: black outline first,
    /// then white fill.
    fn draw_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        font_size: f32,
        surface_width: f32,
        y: f32,
    ) {
        let layout = self.layout_line(text, font_size);
        let x = (surface_width - layout.width()) / 2.0;

        ctx.set_transform(vello_cpu::kurbo::Affine::translate((x as f64, y as f64)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                let glyphs: Vec<vello_cpu::Glyph> = run
                    .glyphs()
                    .map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    })
                    .collect();

                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(OUTLINE_WIDTH));
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .stroke_glyphs(glyphs.iter().copied());

                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs.iter().copied());
            }
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

/// Start of the bottom text block: its last line ends flush at
/// `surface_height - PADDING`.
fn bottom_block_start(surface_height: f32, line_count: usize, line_height: f32) -> f32 {
    surface_height - line_count as f32 * line_height - PADDING
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn rgba_premul_to_image(bytes: &[u8], width: u32, height: u32) -> Result<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| MemeError::ImageLoad("pixmap width exceeds u16".to_string()))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| MemeError::ImageLoad("pixmap height exceeds u16".to_string()))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(MemeError::ImageLoad("pixmap byte len mismatch".to_string()));
    }

    // Pixmap stores PremulRgba8; the bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);

    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Unpremultiply the rendered surface, drop alpha, and encode a JPEG data
/// URL at the configured quality.
fn encode_jpeg_data_url(premul_rgba: &[u8], width: u32, height: u32) -> Result<String> {
    let mut rgb = Vec::with_capacity((width as usize) * (height as usize) * 3);
    for px in premul_rgba.chunks_exact(4) {
        let a = px[3] as u16;
        if a == 0 {
            rgb.extend_from_slice(&[0, 0, 0]);
            continue;
        }
        rgb.push(((px[0] as u16 * 255 + a / 2) / a).min(255) as u8);
        rgb.push(((px[1] as u16 * 255 + a / 2) / a).min(255) as u8);
        rgb.push(((px[2] as u16 * 255 + a / 2) / a).min(255) as u8);
    }

    let mut jpeg = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
    encoder
        .encode(&rgb, width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| MemeError::ImageLoad(format!("encode jpeg: {e}")))?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(&jpeg);
    Ok(format!("data:image/jpeg;base64,{}", encoded))
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
