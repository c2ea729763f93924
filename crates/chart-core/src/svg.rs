// File: crates/chart-core/src/svg.rs
// Summary: SVG serialization of a scene (groups, clip paths, style and font attributes).

use std::fmt::Write;

use crate::scene::{
    Font, FontStyle, FontWeight, GroupMark, LineCap, LineJoin, PathCommand, PathMark, Primitive, RectMark, Scene,
    Style, TextAnchor, TextMark,
};

impl Scene {
    /// Standalone SVG document. Clip paths get ids `clip-0`, `clip-1`, ... in
    /// document order, so equal scenes serialize identically.
    pub fn to_svg(&self) -> String {
        let mut w = SvgWriter::default();
        let [vx, vy, vw, vh] = self.view_box;
        let _ = write!(
            w.out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}""#,
            self.width, self.height, vx, vy, vw, vh
        );
        font_attrs(&mut w.out, &self.font);
        w.out.push_str(">\n");
        for p in &self.primitives {
            w.primitive(p, 1);
        }
        w.out.push_str("</svg>\n");
        w.out
    }
}

#[derive(Default)]
struct SvgWriter {
    out: String,
    clips: usize,
}

impl SvgWriter {
    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str("  ");
        }
    }

    fn primitive(&mut self, p: &Primitive, depth: usize) {
        match p {
            Primitive::Rect(r) => self.rect(r, depth),
            Primitive::Path(m) => self.path(m, depth),
            Primitive::Text(t) => self.text(t, depth),
            Primitive::Group(g) => self.group(g, depth),
        }
    }

    fn rect(&mut self, r: &RectMark, depth: usize) {
        self.indent(depth);
        let _ = write!(self.out, r#"<rect x="{}" y="{}" width="{}" height="{}""#, r.x, r.y, r.width, r.height);
        style_attrs(&mut self.out, &r.style);
        self.out.push_str("/>\n");
    }

    fn path(&mut self, m: &PathMark, depth: usize) {
        self.indent(depth);
        let _ = write!(self.out, r#"<path d="{}""#, path_data(&m.commands));
        style_attrs(&mut self.out, &m.style);
        self.out.push_str("/>\n");
    }

    fn text(&mut self, t: &TextMark, depth: usize) {
        self.indent(depth);
        let _ = write!(self.out, r#"<text x="{}" y="{}""#, t.x, t.y);
        if let Some(anchor) = t.anchor {
            let anchor = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let _ = write!(self.out, r#" text-anchor="{anchor}""#);
        }
        font_attrs(&mut self.out, &t.font);
        style_attrs(&mut self.out, &t.style);
        let _ = writeln!(self.out, ">{}</text>", escape(&t.text));
    }

    fn group(&mut self, g: &GroupMark, depth: usize) {
        let clip_id = g.clip.map(|c| {
            let id = format!("clip-{}", self.clips);
            self.clips += 1;
            self.indent(depth);
            let _ = writeln!(
                self.out,
                r#"<clipPath id="{id}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
                c.x0,
                c.y0,
                c.width(),
                c.height()
            );
            id
        });

        self.indent(depth);
        self.out.push_str("<g");
        if let Some(t) = g.translate {
            let _ = write!(self.out, r#" transform="translate({},{})""#, t.x, t.y);
        }
        if let Some(id) = &clip_id {
            let _ = write!(self.out, r#" clip-path="url(#{id})""#);
        }
        font_attrs(&mut self.out, &g.font);
        style_attrs(&mut self.out, &g.style);
        if g.children.is_empty() {
            self.out.push_str("/>\n");
            return;
        }
        self.out.push_str(">\n");
        for c in &g.children {
            self.primitive(c, depth + 1);
        }
        self.indent(depth);
        self.out.push_str("</g>\n");
    }
}

/// SVG path data, e.g. `M40,370V20H610`.
pub fn path_data(commands: &[PathCommand]) -> String {
    let mut d = String::new();
    for c in commands {
        let _ = match *c {
            PathCommand::MoveTo { x, y } => write!(d, "M{x},{y}"),
            PathCommand::LineTo { x, y } => write!(d, "L{x},{y}"),
            PathCommand::HorizontalTo { x } => write!(d, "H{x}"),
            PathCommand::VerticalTo { y } => write!(d, "V{y}"),
            PathCommand::Close => write!(d, "Z"),
        };
    }
    d
}

fn style_attrs(out: &mut String, s: &Style) {
    if let Some(fill) = s.fill {
        let _ = write!(out, r#" fill="{fill}""#);
    }
    if let Some(o) = s.fill_opacity {
        let _ = write!(out, r#" fill-opacity="{o}""#);
    }
    if let Some(stroke) = s.stroke {
        let _ = write!(out, r#" stroke="{stroke}""#);
    }
    if let Some(w) = s.stroke_width {
        let _ = write!(out, r#" stroke-width="{w}""#);
    }
    if let Some(o) = s.stroke_opacity {
        let _ = write!(out, r#" stroke-opacity="{o}""#);
    }
    if let Some(cap) = s.stroke_linecap {
        let cap = match cap {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        };
        let _ = write!(out, r#" stroke-linecap="{cap}""#);
    }
    if let Some(join) = s.stroke_linejoin {
        let join = match join {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        };
        let _ = write!(out, r#" stroke-linejoin="{join}""#);
    }
    if let Some(o) = s.opacity {
        let _ = write!(out, r#" opacity="{o}""#);
    }
}

fn font_attrs(out: &mut String, f: &Font) {
    if let Some(family) = &f.family {
        let _ = write!(out, r#" font-family="{}""#, escape(family));
    }
    if let Some(size) = f.size {
        let _ = write!(out, r#" font-size="{size}""#);
    }
    if let Some(FontWeight::Bold) = f.weight {
        out.push_str(r#" font-weight="bold""#);
    }
    if let Some(FontStyle::Italic) = f.style {
        out.push_str(r#" font-style="italic""#);
    }
}

/// XML text/attribute escaping.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"a<b & "c""#), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn path_data_is_compact() {
        let d = path_data(&[
            PathCommand::MoveTo { x: 40.0, y: 6.0 },
            PathCommand::VerticalTo { y: 0.0 },
            PathCommand::HorizontalTo { x: 610.5 },
        ]);
        assert_eq!(d, "M40,6V0H610.5");
    }
}
