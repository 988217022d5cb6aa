use crate::foundation::core::Point;
use crate::scene::color::Color;

/// One radial blob of a mesh gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshBlob {
    /// Blob centre as fractions of the canvas width and height.
    pub center: Point,
    /// Colour at the centre; fades to transparent.
    pub color: Color,
    /// Where the colour reaches transparent, as a fraction of the farthest-corner distance.
    pub falloff: f64,
}

/// Structured form of a mesh-gradient descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshGradient {
    /// Blobs in paint order.
    pub blobs: Vec<MeshBlob>,
    /// `true` when the built-in palette replaced an unusable descriptor.
    pub fallback: bool,
}

const FALLBACK_FALLOFF: f64 = 0.5;

const FALLBACK_BLOBS: [(f64, f64, &str); 6] = [
    (0.4, 0.2, "hsla(28, 100%, 74%, 1)"),
    (0.8, 0.0, "hsla(189, 100%, 56%, 1)"),
    (0.0, 0.5, "hsla(355, 100%, 93%, 1)"),
    (0.8, 0.5, "hsla(340, 100%, 76%, 1)"),
    (0.0, 1.0, "hsla(22, 100%, 77%, 1)"),
    (0.8, 1.0, "hsla(242, 100%, 70%, 1)"),
];

impl MeshGradient {
    /// The fixed six-blob palette.
    pub fn fallback() -> Self {
        let blobs = FALLBACK_BLOBS
            .iter()
            .filter_map(|&(x, y, css)| {
                Color::parse_css(css).ok().map(|color| MeshBlob {
                    center: Point::new(x, y),
                    color,
                    falloff: FALLBACK_FALLOFF,
                })
            })
            .collect();
        Self {
            blobs,
            fallback: true,
        }
    }
}

/// Parse a comma-separated list of `radial-gradient(at X% Y%, COLOR POS, transparent POS)`.
///
/// Only the position, the leading colour and the transparent stop are read. Clauses that do not
/// fit that shape are skipped; when none survive the fallback palette is returned.
pub fn parse_mesh_descriptor(descriptor: &str) -> MeshGradient {
    let blobs: Vec<MeshBlob> = radial_clauses(descriptor)
        .into_iter()
        .filter_map(parse_clause)
        .collect();
    if blobs.is_empty() {
        tracing::debug!(descriptor, "mesh descriptor unusable, using fallback palette");
        return MeshGradient::fallback();
    }
    MeshGradient {
        blobs,
        fallback: false,
    }
}

/// Bodies of every balanced `radial-gradient(...)` call.
fn radial_clauses(s: &str) -> Vec<&str> {
    const NEEDLE: &str = "radial-gradient(";
    let lower = s.to_ascii_lowercase();
    let mut out = Vec::new();
    let mut from = 0;
    while let Some(rel) = lower[from..].find(NEEDLE) {
        let open = from + rel + NEEDLE.len();
        let mut depth = 1usize;
        let mut close = None;
        for (i, ch) in s[open..].char_indices() {
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(open + i);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(close) = close else {
            break;
        };
        out.push(&s[open..close]);
        from = close + 1;
    }
    out
}

/// Split on commas that are not nested inside parentheses.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(s[start..].trim());
    parts
}

fn parse_clause(body: &str) -> Option<MeshBlob> {
    let parts = split_top_level(body);
    let center = parse_position(parts.first()?)?;
    let color = parse_color_stop(parts.get(1)?)?;
    let falloff = match parts.get(2) {
        Some(stop) => parse_transparent_stop(stop)?,
        None => FALLBACK_FALLOFF,
    };
    Some(MeshBlob {
        center,
        color,
        falloff,
    })
}

/// `[shape] at X% Y%`
fn parse_position(part: &str) -> Option<Point> {
    let mut tokens = part.split_whitespace();
    tokens.by_ref().find(|t| t.eq_ignore_ascii_case("at"))?;
    let x = parse_fraction(tokens.next()?)?;
    let y = parse_fraction(tokens.next()?)?;
    Some(Point::new(x, y))
}

/// `COLOR [POS...]`; a functional colour keeps its parenthesised arguments.
fn parse_color_stop(part: &str) -> Option<Color> {
    let css = match part.find('(') {
        Some(_) => &part[..=part.rfind(')')?],
        None => part.split_whitespace().next()?,
    };
    Color::parse_css(css).ok()
}

/// `transparent POS`
fn parse_transparent_stop(part: &str) -> Option<f64> {
    let mut tokens = part.split_whitespace();
    if !tokens.next()?.eq_ignore_ascii_case("transparent") {
        return None;
    }
    let f = parse_fraction(tokens.next()?)?;
    (f > 0.0).then_some(f)
}

fn parse_fraction(token: &str) -> Option<f64> {
    let v = match token.strip_suffix('%') {
        Some(p) => p.trim().parse::<f64>().ok()? / 100.0,
        None if token == "0" => 0.0,
        None => return None,
    };
    v.is_finite().then_some(v)
}

#[cfg(test)]
#[path = "../../tests/unit/render/mesh.rs"]
mod tests;
