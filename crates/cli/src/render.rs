//! Headless [`Surface`]s for snapshots: an SVG writer and a PNG rasterizer.

use crate::error::CliError;
use image::{Rgba as Pixel, RgbaImage};
use portfolio_fx_core::{ParticleField, Rgba, Surface};
use std::fmt::Write as _;
use std::path::Path;

/// Snapshot file format, chosen by output extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Svg,
    Png,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("svg") => Ok(SnapshotFormat::Svg),
            Some("png") => Ok(SnapshotFormat::Png),
            _ => Err(CliError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Draws `field` as it stands and writes it to `path`.
pub fn write_snapshot(
    field: &ParticleField,
    path: &Path,
    background: Option<Rgba>,
) -> Result<SnapshotFormat, CliError> {
    let format = SnapshotFormat::from_path(path)?;
    let (width, height) = field.bounds();
    match format {
        SnapshotFormat::Svg => {
            let mut surface = SvgSurface::new(width, height, background);
            field.draw(&mut surface);
            std::fs::write(path, surface.finish()).map_err(|source| CliError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        SnapshotFormat::Png => {
            let mut surface = RasterSurface::new(width, height, background)?;
            field.draw(&mut surface);
            surface
                .into_image()
                .save(path)
                .map_err(|source| CliError::Encode {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
    }
    log::info!("wrote {format:?} snapshot to {}", path.display());
    Ok(format)
}

// -- SVG --

/// Accumulates drawing calls as SVG elements.
pub struct SvgSurface {
    width: f64,
    height: f64,
    background: Option<Rgba>,
    fill: Rgba,
    stroke: Rgba,
    line_width: f64,
    body: String,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64, background: Option<Rgba>) -> Self {
        Self {
            width,
            height,
            background,
            fill: Rgba::new(0, 0, 0, 1.0),
            stroke: Rgba::new(0, 0, 0, 1.0),
            line_width: 1.0,
            body: String::new(),
        }
    }

    /// The complete SVG document.
    pub fn finish(&self) -> String {
        let (w, h) = (self.width, self.height);
        let mut out = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n"
        );
        if let Some(bg) = self.background {
            let _ = writeln!(out, "  <rect width=\"100%\" height=\"100%\" fill=\"{bg}\"/>");
        }
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }
}

impl Surface for SvgSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.body.clear();
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.fill = color;
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
        let _ = writeln!(
            self.body,
            "  <circle cx=\"{x:.2}\" cy=\"{y:.2}\" r=\"{radius:.2}\" fill=\"{}\"/>",
            self.fill
        );
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.stroke = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        let _ = writeln!(
            self.body,
            "  <line x1=\"{x0:.2}\" y1=\"{y0:.2}\" x2=\"{x1:.2}\" y2=\"{y1:.2}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            self.stroke, self.line_width
        );
    }
}

// -- PNG --

/// Software rasterizer with one-pixel edge antialiasing and source-over
/// blending.
pub struct RasterSurface {
    image: RgbaImage,
    background: Option<Rgba>,
    fill: Rgba,
    stroke: Rgba,
    line_width: f64,
}

impl RasterSurface {
    pub fn new(width: f64, height: f64, background: Option<Rgba>) -> Result<Self, CliError> {
        let (w, h) = pixel_extent(width)
            .zip(pixel_extent(height))
            .ok_or(CliError::RasterSize { width, height })?;
        let mut surface = Self {
            image: RgbaImage::new(w, h),
            background,
            fill: Rgba::new(0, 0, 0, 1.0),
            stroke: Rgba::new(0, 0, 0, 1.0),
            line_width: 1.0,
        };
        surface.clear();
        Ok(surface)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba, coverage: f64) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x >= self.image.width() || y >= self.image.height() {
            return;
        }
        let src_a = color.a * coverage.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x, y);
        let dst_a = dst[3] as f64 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        let channel = |s: u8, d: u8| -> u8 {
            let c = (s as f64 * src_a + d as f64 * dst_a * (1.0 - src_a)) / out_a;
            c.round().clamp(0.0, 255.0) as u8
        };
        *dst = Pixel([
            channel(color.r, dst[0]),
            channel(color.g, dst[1]),
            channel(color.b, dst[2]),
            (out_a * 255.0).round() as u8,
        ]);
    }

    /// Visits pixels whose centers fall within `reach` of the box
    /// `[x0, x1] x [y0, y1]`, clipped to the image.
    fn pixels_near(&self, x0: f64, y0: f64, x1: f64, y1: f64, reach: f64) -> Vec<(i64, i64)> {
        let max_x = self.image.width() as f64 - 1.0;
        let max_y = self.image.height() as f64 - 1.0;
        let lo_x = (x0.min(x1) - reach).floor().max(0.0);
        let hi_x = (x0.max(x1) + reach).ceil().min(max_x);
        let lo_y = (y0.min(y1) - reach).floor().max(0.0);
        let hi_y = (y0.max(y1) + reach).ceil().min(max_y);
        if !(lo_x <= hi_x && lo_y <= hi_y) {
            return Vec::new();
        }
        let (lo_x, hi_x, lo_y, hi_y) = (lo_x as i64, hi_x as i64, lo_y as i64, hi_y as i64);
        (lo_y..=hi_y)
            .flat_map(|py| (lo_x..=hi_x).map(move |px| (px, py)))
            .collect()
    }
}

fn pixel_extent(v: f64) -> Option<u32> {
    (v.is_finite() && v >= 0.0 && v <= u32::MAX as f64).then(|| v.ceil() as u32)
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

impl Surface for RasterSurface {
    fn size(&self) -> (f64, f64) {
        (self.image.width() as f64, self.image.height() as f64)
    }

    fn clear(&mut self) {
        let bg = self
            .background
            .map(|c| Pixel([c.r, c.g, c.b, (c.a * 255.0).round() as u8]))
            .unwrap_or(Pixel([0, 0, 0, 0]));
        for px in self.image.pixels_mut() {
            *px = bg;
        }
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.fill = color;
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
        if !(x.is_finite() && y.is_finite() && radius.is_finite()) {
            return;
        }
        let color = self.fill;
        for (px, py) in self.pixels_near(x, y, x, y, radius + 1.0) {
            let d = ((px as f64 + 0.5 - x).powi(2) + (py as f64 + 0.5 - y).powi(2)).sqrt();
            self.blend(px, py, color, radius + 0.5 - d);
        }
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.stroke = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
            return;
        }
        let color = self.stroke;
        let half = self.line_width / 2.0;
        for (px, py) in self.pixels_near(x0, y0, x1, y1, half + 1.0) {
            let center = (px as f64 + 0.5, py as f64 + 0.5);
            let d = segment_distance(center, (x0, y0), (x1, y1));
            self.blend(px, py, color, half + 0.5 - d);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use portfolio_fx_core::config::ParticleConfig;
    use portfolio_fx_core::Particle;

    fn pair_field() -> ParticleField {
        let particles = vec![
            Particle::new(DVec2::new(10.0, 10.0), DVec2::ZERO, 2.0),
            Particle::new(DVec2::new(40.0, 10.0), DVec2::ZERO, 2.0),
        ];
        ParticleField::from_particles(&ParticleConfig::default(), 64.0, 32.0, particles).unwrap()
    }

    // -- format --

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            SnapshotFormat::from_path(Path::new("a/frame.SVG")).unwrap(),
            SnapshotFormat::Svg
        );
        assert_eq!(
            SnapshotFormat::from_path(Path::new("frame.png")).unwrap(),
            SnapshotFormat::Png
        );
        let err = SnapshotFormat::from_path(Path::new("frame.jpg")).unwrap_err();
        assert_eq!(err.exit_code(), 12);
    }

    // -- svg --

    #[test]
    fn svg_has_one_element_per_draw_call() {
        let mut svg = SvgSurface::new(64.0, 32.0, None);
        pair_field().draw(&mut svg);
        let doc = svg.finish();
        assert!(doc.starts_with("<svg"));
        assert!(doc.contains("viewBox=\"0 0 64 32\""));
        assert_eq!(doc.matches("<circle").count(), 2);
        assert_eq!(doc.matches("<line").count(), 1);
        assert!(doc.contains("fill=\"rgba(51, 153, 204, 0.6)\""));
    }

    #[test]
    fn svg_background_survives_clear() {
        let mut svg = SvgSurface::new(8.0, 8.0, Some(Rgba::new(10, 10, 10, 1.0)));
        svg.fill_circle(1.0, 1.0, 1.0);
        svg.clear();
        let doc = svg.finish();
        assert!(doc.contains("<rect"));
        assert!(!doc.contains("<circle"));
    }

    // -- png --

    #[test]
    fn circle_center_is_painted() {
        let mut r = RasterSurface::new(20.0, 20.0, None).unwrap();
        r.set_fill_color(Rgba::new(255, 0, 0, 1.0));
        r.fill_circle(10.0, 10.0, 3.0);
        assert_eq!(r.image().get_pixel(10, 10).0, [255, 0, 0, 255]);
        assert_eq!(r.image().get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn line_midpoint_is_blended() {
        let mut r = RasterSurface::new(20.0, 20.0, Some(Rgba::new(0, 0, 0, 1.0))).unwrap();
        r.set_stroke_color(Rgba::new(255, 255, 255, 0.5));
        r.set_line_width(1.0);
        r.stroke_line(0.0, 10.5, 20.0, 10.5);
        let px = r.image().get_pixel(10, 10).0;
        assert_eq!(px[3], 255);
        assert!((120..=135).contains(&px[0]), "got {px:?}");
        assert_eq!(r.image().get_pixel(10, 2).0, [0, 0, 0, 255]);
    }

    #[test]
    fn rejects_non_finite_extent() {
        let err = RasterSurface::new(f64::INFINITY, 4.0, None).err().unwrap();
        assert!(matches!(err, CliError::RasterSize { .. }));
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn writes_png_and_svg_files() {
        let dir = tempfile::tempdir().unwrap();
        let field = pair_field();

        let png = dir.path().join("frame.png");
        assert_eq!(write_snapshot(&field, &png, None).unwrap(), SnapshotFormat::Png);
        let img = image::open(&png).unwrap().to_rgba8();
        assert_eq!((img.width(), img.height()), (64, 32));

        let svg = dir.path().join("frame.svg");
        write_snapshot(&field, &svg, None).unwrap();
        let text = std::fs::read_to_string(&svg).unwrap();
        assert_eq!(text.matches("<circle").count(), 2);
    }

    #[test]
    fn write_to_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frame.svg");
        let err = write_snapshot(&pair_field(), &path, None).unwrap_err();
        assert!(matches!(err, CliError::Write { .. }));
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn png_to_missing_directory_is_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frame.png");
        let err = write_snapshot(&pair_field(), &path, None).unwrap_err();
        assert!(matches!(err, CliError::Encode { .. }));
        assert_eq!(err.exit_code(), 11);
        assert!(err.to_string().contains("frame.png"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn drawing_anywhere_stays_in_bounds(
                x in -1.0e4_f64..1.0e4,
                y in -1.0e4_f64..1.0e4,
                r in 0.0_f64..50.0,
                x1 in -1.0e4_f64..1.0e4,
                y1 in -1.0e4_f64..1.0e4,
            ) {
                let mut s = RasterSurface::new(16.0, 16.0, None).unwrap();
                s.set_fill_color(Rgba::new(255, 255, 255, 1.0));
                s.fill_circle(x, y, r);
                s.set_stroke_color(Rgba::new(255, 255, 255, 1.0));
                s.stroke_line(x, y, x1, y1);
                prop_assert_eq!(s.image().dimensions(), (16, 16));
            }
        }
    }
}
