//! SVG shape rendering

use std::f64::consts::PI;
use std::fmt::Write;

/// Fill and stroke colours, indexed by the `color` parameter
pub const PALETTE: [&str; 16] = [
    "#000000", "#ff0000", "#00aa00", "#0066ff", "#ffcc00", "#ff00aa", "#00cccc", "#ff6600",
    "#7a3fff", "#ff66cc", "#8b4513", "#008080", "#001f3f", "#808000", "#808080", "#c0c0c0",
];

/// Largest padding, in percent of each side
pub const MAX_PADDING: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Rectangle,
    Triangle,
    Star,
}

impl Shape {
    /// Shape for the numeric `shape` parameter
    pub fn from_id(id: i32) -> Option<Shape> {
        match id {
            1 => Some(Shape::Circle),
            2 => Some(Shape::Rectangle),
            3 => Some(Shape::Triangle),
            4 => Some(Shape::Star),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Rectangle => "rectangle",
            Shape::Triangle => "triangle",
            Shape::Star => "star",
        }
    }
}

/// Validated drawing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drawing {
    pub shape: Shape,
    /// Any integer; clamped into the palette when rendering
    pub color: i32,
    /// Positive
    pub width: i32,
    /// Positive
    pub height: i32,
    /// Non-negative; 0 draws no outline
    pub stroke: i32,
    /// Non-negative percent; clamped to [`MAX_PADDING`] when rendering
    pub padding: i32,
}

impl Drawing {
    pub fn color_hex(&self) -> &'static str {
        PALETTE[self.color.clamp(0, PALETTE.len() as i32 - 1) as usize]
    }

    /// Render the drawing as a standalone SVG document
    pub fn render(&self) -> String {
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let pad = f64::from(self.padding.clamp(0, MAX_PADDING)) / 100.0;
        let (pad_x, pad_y) = (w * pad, h * pad);
        let inner_w = (w - 2.0 * pad_x).max(0.0);
        let inner_h = (h - 2.0 * pad_y).max(0.0);
        let (cx, cy) = (w / 2.0, h / 2.0);

        let color = self.color_hex();
        let paint = if self.stroke > 0 {
            format!(
                "fill=\"{color}\" stroke=\"{color}\" stroke-width=\"{}\"",
                self.stroke
            )
        } else {
            format!("fill=\"{color}\"")
        };

        let element = match self.shape {
            Shape::Circle => {
                let r = inner_w.min(inner_h) / 2.0;
                format!(
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" {paint}/>",
                    num(cx),
                    num(cy),
                    num(r)
                )
            }
            Shape::Rectangle => format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" {paint}/>",
                num(pad_x),
                num(pad_y),
                num(inner_w),
                num(inner_h)
            ),
            Shape::Triangle => {
                let side = inner_w.min(inner_h);
                let half_height = side * 3f64.sqrt() / 4.0;
                let (top, bottom) = (cy - half_height, cy + half_height);
                let (left, right) = (cx - side / 2.0, cx + side / 2.0);
                format!(
                    "<polygon points=\"{},{} {},{} {},{}\" {paint}/>",
                    num(left),
                    num(bottom),
                    num(right),
                    num(bottom),
                    num(cx),
                    num(top)
                )
            }
            Shape::Star => {
                let outer = inner_w.min(inner_h) / 2.0;
                format!(
                    "<polygon points=\"{}\" {paint}/>",
                    star_points(cx, cy, outer, outer * 0.5, 5)
                )
            }
        };

        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">{element}</svg>",
            w = self.width,
            h = self.height
        )
    }
}

/// Alternating outer/inner vertices, first one pointing straight up
fn star_points(cx: f64, cy: f64, outer: f64, inner: f64, points: u32) -> String {
    let step = PI / f64::from(points);
    let mut angle = -PI / 2.0;
    let mut out = String::new();
    for _ in 0..points {
        for radius in [outer, inner] {
            if !out.is_empty() {
                out.push(' ');
            }
            let _ = write!(
                out,
                "{},{}",
                num(cx + angle.cos() * radius),
                num(cy + angle.sin() * radius)
            );
            angle += step;
        }
    }
    out
}

/// At most three decimals, trailing zeros dropped
fn num(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}
