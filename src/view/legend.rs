use crate::core::{LinearScale, Viewport};
use crate::error::DashboardResult;
use crate::render::{Color, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};
use crate::view::axis_color;

const LEGEND_BAR_WIDTH: f64 = 450.0;
const LEGEND_BAR_HEIGHT: f64 = 18.0;
const LEGEND_BAR_X: f64 = 60.0;
const LEGEND_BAR_Y: f64 = 10.0;
const GRADIENT_STOPS: usize = 25;
const TICK_COUNT: usize = 6;

/// Builds the color-gradient legend frame for the heatmap scale.
///
/// The legend carries no retained state: it is rebuilt from scratch on every
/// render so it always reflects the current color-scale domain. Tick values
/// are evenly spaced with both endpoints pinned, so the domain maximum is
/// always one of the displayed ticks.
pub fn build_gradient_legend(
    domain_max: f64,
    low: Color,
    high: Color,
) -> DashboardResult<RenderFrame> {
    let viewport = Viewport::new(
        (LEGEND_BAR_WIDTH + 80.0) as u32,
        (LEGEND_BAR_HEIGHT + 40.0) as u32,
    );
    let mut frame = RenderFrame::new(viewport);

    // Banded approximation of a continuous linear gradient.
    let band_width = LEGEND_BAR_WIDTH / GRADIENT_STOPS as f64;
    for stop in 0..GRADIENT_STOPS {
        let t = stop as f64 / (GRADIENT_STOPS - 1) as f64;
        frame = frame.with_rect(RectPrimitive::filled(
            LEGEND_BAR_X + band_width * stop as f64,
            LEGEND_BAR_Y,
            band_width,
            LEGEND_BAR_HEIGHT,
            low.lerp(high, t),
        ));
    }
    frame = frame.with_rect(
        RectPrimitive::filled(
            LEGEND_BAR_X,
            LEGEND_BAR_Y,
            LEGEND_BAR_WIDTH,
            LEGEND_BAR_HEIGHT,
            Color::rgba(0.0, 0.0, 0.0, 0.0),
        )
        .with_border(Color::from_rgb8(153, 153, 153), 0.6),
    );

    let scale = LinearScale::new(0.0, domain_max)?
        .with_range(LEGEND_BAR_X, LEGEND_BAR_X + LEGEND_BAR_WIDTH)?;
    let axis_y = LEGEND_BAR_Y + LEGEND_BAR_HEIGHT;
    for tick in scale.even_ticks(TICK_COUNT) {
        let x = scale.map(tick);
        frame = frame
            .with_line(LinePrimitive::new(x, axis_y, x, axis_y + 5.0, 1.0, axis_color()))
            .with_text(TextPrimitive::new(
                format!("{}", tick.round() as i64),
                x,
                axis_y + 7.0,
                11.0,
                axis_color(),
                TextHAlign::Center,
            ));
    }

    frame = frame.with_text(TextPrimitive::new(
        "Total Deaths per Month",
        LEGEND_BAR_X + LEGEND_BAR_WIDTH / 2.0,
        0.0,
        11.0,
        axis_color(),
        TextHAlign::Center,
    ));

    Ok(frame)
}
