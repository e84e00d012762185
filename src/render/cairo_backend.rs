use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::core::ContainerSize;
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, RectPrimitive, RenderFrame, Renderer, TextHAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
}

/// Renderers that can draw into a Cairo context owned by the host toolkit.
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()>;
}

/// Cairo + Pango renderer drawing into an offscreen ARGB surface.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(size: ContainerSize) -> ChartResult<Self> {
        let size = size.validate()?;
        let surface = ImageSurface::create(
            Format::ARgb32,
            size.width.ceil() as i32,
            size.height.ceil() as i32,
        )
        .map_err(|err| backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            clear_color: Color::rgb(1.0, 1.0, 1.0),
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn set_clear_color(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn draw(&mut self, context: &Context, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;

        set_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| backend_error("failed to clear surface", err))?;

        self.last_stats = CairoRenderStats {
            rects_drawn: draw_rects(context, frame)?,
            lines_drawn: draw_lines(context, frame)?,
            texts_drawn: draw_texts(context, frame),
        };
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| backend_error("failed to create cairo context", err))?;
        self.draw(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()> {
        self.draw(context, frame)
    }
}

fn draw_rects(context: &Context, frame: &RenderFrame) -> ChartResult<usize> {
    for rect in &frame.rects {
        rect_path(context, *rect);
        set_color(context, rect.fill_color);
        if rect.border_width > 0.0 {
            context
                .fill_preserve()
                .map_err(|err| backend_error("failed to fill rectangle", err))?;
            set_color(context, rect.border_color);
            context.set_line_width(rect.border_width);
            context
                .stroke()
                .map_err(|err| backend_error("failed to stroke rectangle border", err))?;
        } else {
            context
                .fill()
                .map_err(|err| backend_error("failed to fill rectangle", err))?;
        }
    }
    Ok(frame.rects.len())
}

fn draw_lines(context: &Context, frame: &RenderFrame) -> ChartResult<usize> {
    for line in &frame.lines {
        set_color(context, line.color);
        context.set_line_width(line.stroke_width);
        context.move_to(line.x1, line.y1);
        context.line_to(line.x2, line.y2);
        context
            .stroke()
            .map_err(|err| backend_error("failed to stroke line", err))?;
    }
    Ok(frame.lines.len())
}

fn draw_texts(context: &Context, frame: &RenderFrame) -> usize {
    for text in &frame.texts {
        let layout = pangocairo::functions::create_layout(context);
        let font = FontDescription::from_string(&format!("Sans {}", text.font_size_px));
        layout.set_font_description(Some(&font));
        layout.set_text(&text.text);

        let (text_width, _) = layout.pixel_size();
        let x = match text.h_align {
            TextHAlign::Left => text.x,
            TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
            TextHAlign::Right => text.x - f64::from(text_width),
        };

        set_color(context, text.color);
        context.move_to(x, text.y);
        pangocairo::functions::show_layout(context, &layout);
    }
    frame.texts.len()
}

fn set_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn rect_path(context: &Context, rect: RectPrimitive) {
    if rect.corner_radius <= 0.0 {
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        return;
    }

    let radius = rect
        .corner_radius
        .min(rect.width * 0.5)
        .min(rect.height * 0.5);
    let (left, top) = (rect.x, rect.y);
    let (right, bottom) = (rect.x + rect.width, rect.y + rect.height);

    context.new_sub_path();
    context.arc(right - radius, top + radius, radius, -FRAC_PI_2, 0.0);
    context.arc(right - radius, bottom - radius, radius, 0.0, FRAC_PI_2);
    context.arc(left + radius, bottom - radius, radius, FRAC_PI_2, PI);
    context.arc(left + radius, top + radius, radius, PI, PI + FRAC_PI_2);
    context.close_path();
}

fn backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{prefix}: {err}"))
}
