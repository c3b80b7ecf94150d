use std::fmt::Write as _;

use waveview_core::{BezPath, Color, ResolvedFill, Size, StrokeStyle, Surface};

/// Surface that records draw calls as an SVG document.
#[derive(Debug)]
pub struct SvgSurface {
    size: Size,
    defs: String,
    body: String,
    gradients: usize,
}

impl SvgSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            defs: String::new(),
            body: String::new(),
            gradients: 0,
        }
    }

    pub fn finish(self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.size.width,
            h = self.size.height,
        );
        if !self.defs.is_empty() {
            let _ = writeln!(out, "<defs>\n{}</defs>", self.defs);
        }
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }
}

fn solid_fill(color: Color) -> String {
    format!(
        r#"fill="{}" fill-opacity="{:.3}""#,
        color.to_hex(),
        color.alpha()
    )
}

impl Surface for SvgSurface {
    fn size(&self) -> Option<Size> {
        Some(self.size)
    }

    fn fill_path(&mut self, path: &BezPath, fill: &ResolvedFill) {
        let fill_attrs = match *fill {
            ResolvedFill::Solid(color) => solid_fill(color),
            ResolvedFill::LinearGradient {
                from,
                to,
                start,
                end,
            } => {
                let id = format!("wave-gradient-{}", self.gradients);
                self.gradients += 1;
                let _ = writeln!(
                    self.defs,
                    r#"<linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}"><stop offset="0" stop-color="{}" stop-opacity="{:.3}"/><stop offset="1" stop-color="{}" stop-opacity="{:.3}"/></linearGradient>"#,
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    start.to_hex(),
                    start.alpha(),
                    end.to_hex(),
                    end.alpha(),
                );
                format!(r#"fill="url(#{id})""#)
            }
        };
        let _ = writeln!(self.body, r#"<path d="{}" {fill_attrs}/>"#, path.to_svg());
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &StrokeStyle) {
        let _ = writeln!(
            self.body,
            r#"<path d="{}" fill="none" stroke="{}" stroke-opacity="{:.3}" stroke-width="{}"/>"#,
            path.to_svg(),
            stroke.color.to_hex(),
            stroke.color.alpha(),
            stroke.width,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waveview_core::{ManualClock, ViewConfig, WaveView};

    #[test]
    fn renders_one_path_and_gradient_per_layer() {
        let mut view = WaveView::with_clock(ViewConfig::default(), ManualClock::new());
        view.add_default_waves(3, 0).unwrap();

        let mut surface = SvgSurface::new(Size::new(320.0, 480.0));
        assert!(view.render(&mut surface));
        let svg = surface.finish();

        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<path").count(), 3);
        assert_eq!(svg.matches("<linearGradient").count(), 3);
        assert!(svg.contains("url(#wave-gradient-2)"));
    }

    #[test]
    fn solid_fills_inline_their_colour() {
        let mut surface = SvgSurface::new(Size::new(10.0, 10.0));
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 10.0));
        surface.fill_path(&path, &ResolvedFill::Solid(Color::RED.with_opacity(0.5)));

        let svg = surface.finish();
        assert!(svg.contains(r##"fill="#ff0000" fill-opacity="0.502""##));
        assert!(!svg.contains("<defs>"));
    }
}
