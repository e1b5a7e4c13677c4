use std::f64::consts::PI;

use cairo::{Context, Format, ImageSurface};
use indexmap::IndexMap;
use pango::FontDescription;

use crate::error::{DashboardError, DashboardResult};
use crate::render::{Color, RegionId, RenderFrame, Renderer, StrokeStyle, TextHAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub rects_drawn: usize,
    pub lines_drawn: usize,
    pub polylines_drawn: usize,
    pub circles_drawn: usize,
    pub texts_drawn: usize,
}

/// Cairo + Pango + PangoCairo renderer backend.
///
/// Keeps one offscreen image surface per dashboard region, recreated when a
/// frame arrives with a different viewport size.
pub struct CairoRenderer {
    surfaces: IndexMap<RegionId, ImageSurface>,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            surfaces: IndexMap::new(),
            clear_color: Color::rgb(1.0, 1.0, 1.0),
            last_stats: CairoRenderStats::default(),
        }
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    /// Offscreen surface for `region`, if a frame has been rendered into it.
    #[must_use]
    pub fn surface(&self, region: RegionId) -> Option<&ImageSurface> {
        self.surfaces.get(&region)
    }

    pub fn set_clear_color(&mut self, color: Color) -> DashboardResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn surface_for(&mut self, region: RegionId, frame: &RenderFrame) -> DashboardResult<ImageSurface> {
        let width = frame.viewport.width as i32;
        let height = frame.viewport.height as i32;
        let reusable = self
            .surfaces
            .get(&region)
            .filter(|surface| surface.width() == width && surface.height() == height)
            .cloned();
        if let Some(surface) = reusable {
            return Ok(surface);
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        self.surfaces.insert(region, surface.clone());
        Ok(surface)
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> DashboardResult<()> {
        frame.validate()?;

        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = CairoRenderStats::default();

        for rect in &frame.rects {
            context.rectangle(rect.x, rect.y, rect.width, rect.height);
            apply_color(context, rect.fill_color);
            if rect.border_width > 0.0 {
                context
                    .fill_preserve()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
                apply_color(context, rect.border_color);
                context.set_line_width(rect.border_width);
                context
                    .stroke()
                    .map_err(|err| map_backend_error("failed to stroke rectangle border", err))?;
            } else {
                context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
            }
            stats.rects_drawn += 1;
        }

        for line in &frame.lines {
            apply_color(context, line.color);
            apply_stroke_style(context, line.stroke_style);
            context.set_line_width(line.stroke_width);
            context.move_to(line.x1, line.y1);
            context.line_to(line.x2, line.y2);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke line", err))?;
            stats.lines_drawn += 1;
        }

        for polyline in &frame.polylines {
            apply_color(context, polyline.color);
            apply_stroke_style(context, polyline.stroke_style);
            context.set_line_width(polyline.stroke_width);
            let mut points = polyline.points.iter();
            if let Some((x, y)) = points.next() {
                context.move_to(*x, *y);
            }
            for (x, y) in points {
                context.line_to(*x, *y);
            }
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke polyline", err))?;
            stats.polylines_drawn += 1;
        }

        for circle in &frame.circles {
            context.arc(circle.cx, circle.cy, circle.radius, 0.0, 2.0 * PI);
            apply_color(context, circle.fill_color);
            if circle.stroke_width > 0.0 {
                context
                    .fill_preserve()
                    .map_err(|err| map_backend_error("failed to fill circle", err))?;
                apply_color(context, circle.stroke_color);
                context.set_line_width(circle.stroke_width);
                context
                    .stroke()
                    .map_err(|err| map_backend_error("failed to stroke circle", err))?;
            } else {
                context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill circle", err))?;
            }
            stats.circles_drawn += 1;
        }

        apply_stroke_style(context, StrokeStyle::Solid);
        for text in &frame.texts {
            let layout = pangocairo::functions::create_layout(context);
            let font_description =
                FontDescription::from_string(&format!("Sans {}", text.font_size_px));
            layout.set_font_description(Some(&font_description));
            layout.set_text(&text.text);

            let (text_width, _text_height) = layout.pixel_size();
            let x = match text.h_align {
                TextHAlign::Left => text.x,
                TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
                TextHAlign::Right => text.x - f64::from(text_width),
            };

            apply_color(context, text.color);
            context.move_to(x, text.y);
            pangocairo::functions::show_layout(context, &layout);
            stats.texts_drawn += 1;
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl Default for CairoRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, region: RegionId, frame: &RenderFrame) -> DashboardResult<()> {
        let surface = self.surface_for(region, frame)?;
        let context = Context::new(&surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn apply_stroke_style(context: &Context, stroke_style: StrokeStyle) {
    match stroke_style {
        StrokeStyle::Solid => context.set_dash(&[], 0.0),
        StrokeStyle::Dashed { on, off } => context.set_dash(&[on, off], 0.0),
    }
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> DashboardError {
    DashboardError::InvalidData(format!("{prefix}: {err}"))
}
