//! UFO format conversion
//!
//! Conversion between the editing model and norad's UFO types. Quadratic
//! contours are elevated to cubics on the way in; everything written back
//! is cubic.

use super::anchor::Anchor;
use super::component::Component;
use super::font::Font;
use super::glyph::Glyph;
use super::guideline::Guideline;
use super::layer::Layer;
use super::master::Master;
use super::path::Path;
use super::point::{EditPoint, PointType};
use crate::core::errors::{anyhow, BezyContext, BezyResult};
use crate::geometry::bezier::quad_to_cubic;
use kurbo::{Affine, Point};
use std::path::Path as FsPath;
use tracing::{debug, warn};

/// Layer name used for the single layer read from a UFO's default layer
pub const DEFAULT_LAYER_NAME: &str = "public.default";

/// Name of the master built from a UFO's font info when it has no style name
const DEFAULT_MASTER_NAME: &str = "Regular";

impl Font {
    /// Build the editing model from a loaded UFO.
    ///
    /// A UFO is one master: its font info supplies the metrics and every
    /// glyph of the default layer becomes a glyph with one layer.
    pub fn from_norad(ufo: &norad::Font) -> Self {
        let info = &ufo.font_info;
        let units_per_em = info
            .units_per_em
            .map(|v| v.to_string().parse().unwrap_or(1000.0))
            .unwrap_or(1000.0);
        let master_name = info
            .style_name
            .clone()
            .unwrap_or_else(|| DEFAULT_MASTER_NAME.to_string());

        let defaults = Master::new(master_name.clone(), units_per_em);
        let mut master = defaults.clone().with_metrics(
            info.ascender.unwrap_or(defaults.ascender),
            info.descender.unwrap_or(defaults.descender),
            info.cap_height.unwrap_or(defaults.cap_height),
            info.x_height.unwrap_or(defaults.x_height),
        );
        for guideline in info.guidelines.iter().flatten() {
            master = master.with_guideline(Guideline::from_norad(guideline));
        }

        let mut font = Font::new(
            info.family_name.clone().unwrap_or_else(|| "Untitled".to_string()),
            units_per_em,
        )
        .with_master(master);

        for norad_glyph in ufo.default_layer().iter() {
            font = font.with_glyph(Glyph::from_norad(norad_glyph, &master_name));
        }
        debug!(
            "Converted UFO '{}' with {} glyphs",
            font.family_name(),
            font.glyphs().len()
        );
        font
    }

    /// Load a UFO from disk into the editing model
    pub fn load_ufo(path: impl AsRef<FsPath>) -> BezyResult<Self> {
        let path = path.as_ref();
        let ufo = norad::Font::load(path).with_file_context("load", path)?;
        Ok(Self::from_norad(&ufo))
    }

    /// Write every glyph's first layer back into `ufo`'s default layer.
    ///
    /// Existing glyphs are updated in place so that data the model does not
    /// carry (lib, colors, identifiers) survives.
    pub fn write_to_norad(&self, ufo: &mut norad::Font) -> BezyResult<()> {
        ufo.font_info.family_name = Some(self.family_name.clone());
        let layer = ufo.default_layer_mut();
        for glyph in &self.glyphs {
            let Some(source) = glyph.layers.first() else {
                continue;
            };
            match layer.get_glyph_mut(glyph.name.as_str()) {
                Some(target) => source.write_to_norad(target),
                None => {
                    let mut target = norad::Glyph::new(glyph.name.as_str());
                    source.write_to_norad(&mut target);
                    layer.insert_glyph(target);
                }
            }
            // Codepoints merge into the existing set; none are removed
            if let Some(target) = layer.get_glyph_mut(glyph.name.as_str()) {
                for &codepoint in &glyph.unicodes {
                    match char::from_u32(codepoint) {
                        Some(c) => {
                            target.codepoints.insert(c);
                        }
                        None => warn!("Skipping invalid codepoint U+{:04X} in '{}'", codepoint, glyph.name),
                    }
                }
            }
        }
        Ok(())
    }

    /// Write the model back over the UFO at `path`
    pub fn save_ufo(&self, path: impl AsRef<FsPath>) -> BezyResult<()> {
        let path = path.as_ref();
        let mut ufo = norad::Font::load(path).with_file_context("load", path)?;
        self.write_to_norad(&mut ufo)?;
        ufo.save(path).with_file_context("save", path)?;
        debug!("Saved UFO to {}", path.display());
        Ok(())
    }
}

impl Glyph {
    pub fn from_norad(norad_glyph: &norad::Glyph, master_name: &str) -> Self {
        let mut glyph = Glyph::new(norad_glyph.name().to_string())
            .with_layer(Layer::from_norad(norad_glyph, DEFAULT_LAYER_NAME).with_master(master_name));
        for codepoint in norad_glyph.codepoints.iter() {
            glyph = glyph.with_unicode(codepoint as u32);
        }
        glyph
    }
}

impl Layer {
    pub fn from_norad(norad_glyph: &norad::Glyph, name: &str) -> Self {
        let mut layer = Layer::new(name).with_width(norad_glyph.width);
        for contour in &norad_glyph.contours {
            layer = layer.with_path(path_from_norad(contour));
        }
        for component in &norad_glyph.components {
            layer = layer.with_component(Component::from_norad(component));
        }
        for anchor in &norad_glyph.anchors {
            let name = anchor.name.as_ref().map(|n| n.to_string()).unwrap_or_default();
            layer = layer.with_anchor(Anchor::new(name, anchor.x, anchor.y));
        }
        for guideline in &norad_glyph.guidelines {
            layer = layer.with_guideline(Guideline::from_norad(guideline));
        }
        layer
    }

    /// Overwrite `target`'s outline, components and width with this layer.
    ///
    /// Anchors and guidelines are matched by position in their lists and
    /// updated in place.
    pub fn write_to_norad(&self, target: &mut norad::Glyph) {
        target.width = self.width;
        target.contours = self.paths.iter().map(path_to_norad).collect();

        let mut components = Vec::with_capacity(self.components.len());
        for component in &self.components {
            match component.to_norad() {
                Ok(c) => components.push(c),
                Err(e) => warn!("Dropping component on write: {}", e),
            }
        }
        target.components = components;

        if target.anchors.len() != self.anchors.len() {
            warn!(
                "Anchor count changed for '{}' ({} -> {}); updating the common prefix",
                target.name(),
                target.anchors.len(),
                self.anchors.len()
            );
            target.anchors.truncate(self.anchors.len());
        }
        for (norad_anchor, anchor) in target.anchors.iter_mut().zip(&self.anchors) {
            norad_anchor.x = anchor.x;
            norad_anchor.y = anchor.y;
            norad_anchor.name = anchor.name.parse().ok();
        }

        if target.guidelines.len() != self.guidelines.len() {
            target.guidelines.truncate(self.guidelines.len());
        }
        for (norad_guide, guide) in target.guidelines.iter_mut().zip(&self.guidelines) {
            norad_guide.line = guide.to_norad_line();
        }
    }
}

impl Component {
    pub fn from_norad(component: &norad::Component) -> Self {
        let t = &component.transform;
        Component::new(
            component.base.to_string(),
            Affine::new([t.x_scale, t.xy_scale, t.yx_scale, t.y_scale, t.x_offset, t.y_offset]),
        )
    }

    pub fn to_norad(&self) -> BezyResult<norad::Component> {
        let base: norad::Name = self
            .glyph_name
            .parse()
            .map_err(|_| anyhow!("invalid component base name '{}'", self.glyph_name))?;
        let [xx, xy, yx, yy, dx, dy] = self.transform.as_coeffs();
        let transform = norad::AffineTransform {
            x_scale: xx,
            xy_scale: xy,
            yx_scale: yx,
            y_scale: yy,
            x_offset: dx,
            y_offset: dy,
        };
        Ok(norad::Component::new(base, transform, None))
    }
}

impl Guideline {
    pub fn from_norad(guideline: &norad::Guideline) -> Self {
        let guide = match guideline.line {
            norad::Line::Angle { x, y, degrees } => Guideline::new(x, y, degrees),
            norad::Line::Horizontal(y) => Guideline::horizontal(y),
            norad::Line::Vertical(x) => Guideline::vertical(x),
        };
        match &guideline.name {
            Some(name) => guide.with_name(name.to_string()),
            None => guide,
        }
    }

    fn to_norad_line(&self) -> norad::Line {
        let angle = self.angle.rem_euclid(180.0);
        if angle == 0.0 {
            norad::Line::Horizontal(self.y)
        } else if angle == 90.0 {
            norad::Line::Vertical(self.x)
        } else {
            norad::Line::Angle {
                x: self.x,
                y: self.y,
                degrees: self.angle,
            }
        }
    }
}

/// Read a UFO contour, elevating quadratic runs to cubic segments
pub fn path_from_norad(contour: &norad::Contour) -> Path {
    let raw: Vec<(Point, norad::PointType, bool)> = contour
        .points
        .iter()
        .map(|p| (Point::new(p.x, p.y), p.typ.clone(), p.smooth))
        .collect();

    if !raw.iter().any(|(_, typ, _)| *typ == norad::PointType::QCurve) {
        return Path::from_points(
            raw.into_iter()
                .map(|(pos, typ, smooth)| {
                    EditPoint::new(pos.x, pos.y, point_type_from_norad(&typ)).with_smooth(smooth)
                })
                .collect(),
        );
    }
    Path::from_points(elevate_quadratics(raw))
}

fn point_type_from_norad(typ: &norad::PointType) -> PointType {
    match typ {
        norad::PointType::Move => PointType::Move,
        norad::PointType::Line => PointType::Line,
        norad::PointType::OffCurve => PointType::OffCurve,
        norad::PointType::Curve | norad::PointType::QCurve => PointType::Curve,
    }
}

/// Rewrite a contour containing `qcurve` points as cubic points.
///
/// Runs of several quadratic off-curves get their implied on-curve
/// midpoints made explicit as smooth curve points.
fn elevate_quadratics(mut raw: Vec<(Point, norad::PointType, bool)>) -> Vec<EditPoint> {
    let open = raw
        .first()
        .is_some_and(|(_, typ, _)| *typ == norad::PointType::Move);
    if !open {
        // Start on an on-curve point so every run of off-curves ends at one
        if let Some(first_on) = raw
            .iter()
            .position(|(_, typ, _)| *typ != norad::PointType::OffCurve)
        {
            raw.rotate_left(first_on);
        } else {
            // All off-curve: a TrueType closed quadratic loop with no on-curves
            let n = raw.len();
            let mid = raw[n - 1].0.midpoint(raw[0].0);
            raw.insert(0, (mid, norad::PointType::QCurve, true));
        }
    }

    let mut out: Vec<EditPoint> = Vec::with_capacity(raw.len() * 2);
    let mut pending: Vec<Point> = Vec::new();
    let mut last_on: Option<Point> = None;
    let mut first: Option<(Point, norad::PointType, bool)> = None;

    for (pos, typ, smooth) in raw {
        if typ == norad::PointType::OffCurve {
            pending.push(pos);
            continue;
        }
        let point_type = flush_off_curves(&mut out, &mut pending, last_on, pos, &typ);
        out.push(EditPoint::new(pos.x, pos.y, point_type).with_smooth(smooth));
        if first.is_none() {
            first = Some((pos, typ, smooth));
        }
        last_on = Some(pos);
    }

    // Trailing off-curves of a closed contour lead back into its first point
    if !open && !pending.is_empty() {
        if let Some((pos, typ, smooth)) = first {
            let point_type = flush_off_curves(&mut out, &mut pending, last_on, pos, &typ);
            out[0] = EditPoint::new(pos.x, pos.y, point_type).with_smooth(smooth);
        }
    }
    out
}

/// Emit the off-curves gathered before the on-curve point `end` and return
/// the type `end` gets in the cubic model
fn flush_off_curves(
    out: &mut Vec<EditPoint>,
    pending: &mut Vec<Point>,
    last_on: Option<Point>,
    end: Point,
    typ: &norad::PointType,
) -> PointType {
    match (typ, last_on) {
        (norad::PointType::QCurve, Some(mut start)) if !pending.is_empty() => {
            for (i, &control) in pending.iter().enumerate() {
                let piece_end = match pending.get(i + 1) {
                    Some(&next) => control.midpoint(next),
                    None => end,
                };
                let (c1, c2) = quad_to_cubic(start, control, piece_end);
                out.push(EditPoint::off_curve(c1.x, c1.y));
                out.push(EditPoint::off_curve(c2.x, c2.y));
                if i + 1 < pending.len() {
                    out.push(EditPoint::curve_to(piece_end.x, piece_end.y).with_smooth(true));
                }
                start = piece_end;
            }
            pending.clear();
            PointType::Curve
        }
        (norad::PointType::QCurve, _) => {
            pending.clear();
            PointType::Line
        }
        _ => {
            out.extend(pending.drain(..).map(|p| EditPoint::off_curve(p.x, p.y)));
            point_type_from_norad(typ)
        }
    }
}

/// Write a path as a UFO contour
pub fn path_to_norad(path: &Path) -> norad::Contour {
    let points = path
        .points
        .iter()
        .map(|p| {
            let typ = match p.point_type {
                PointType::Move => norad::PointType::Move,
                PointType::Line => norad::PointType::Line,
                PointType::OffCurve => norad::PointType::OffCurve,
                PointType::Curve => norad::PointType::Curve,
            };
            norad::ContourPoint::new(p.x, p.y, typ, p.smooth && p.is_on_curve(), None, None)
        })
        .collect();
    norad::Contour::new(points, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::path::test_paths::{blob, square};

    fn norad_contour(points: &[(f64, f64, norad::PointType)]) -> norad::Contour {
        norad::Contour::new(
            points
                .iter()
                .map(|(x, y, typ)| norad::ContourPoint::new(*x, *y, typ.clone(), false, None, None))
                .collect(),
            None,
        )
    }

    #[test]
    fn test_cubic_contour_round_trip() {
        for path in [square(100.0), blob(50.0)] {
            let contour = path_to_norad(&path);
            assert_eq!(path_from_norad(&contour), path);
        }
    }

    #[test]
    fn test_single_quadratic_is_elevated() {
        use norad::PointType::{Line, OffCurve, QCurve};
        let contour = norad_contour(&[(0.0, 0.0, Line), (50.0, 100.0, OffCurve), (100.0, 0.0, QCurve)]);
        let path = path_from_norad(&contour);
        let types: Vec<PointType> = path.points().iter().map(|p| p.point_type()).collect();
        assert_eq!(
            types,
            vec![PointType::Line, PointType::OffCurve, PointType::OffCurve, PointType::Curve]
        );
        let c1 = path.point(1).position();
        assert!((c1.x - 100.0 / 3.0).abs() < 1e-9 && (c1.y - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_quadratic_run_gets_implied_points() {
        use norad::PointType::{Line, OffCurve, QCurve};
        let contour = norad_contour(&[
            (0.0, 0.0, Line),
            (0.0, 100.0, OffCurve),
            (100.0, 100.0, OffCurve),
            (100.0, 0.0, QCurve),
        ]);
        let path = path_from_norad(&contour);
        assert_eq!(path.len(), 7);
        let implied = path.point(3);
        assert_eq!(implied.point_type(), PointType::Curve);
        assert!(implied.is_smooth());
        assert_eq!(implied.position(), Point::new(50.0, 100.0));
    }

    #[test]
    fn test_closing_quadratic_wraps_to_first_point() {
        use norad::PointType::{Line, OffCurve, QCurve};
        let contour = norad_contour(&[(0.0, 0.0, QCurve), (100.0, 0.0, Line), (50.0, 80.0, OffCurve)]);
        let path = path_from_norad(&contour);
        assert!(path.is_closed());
        assert_eq!(path.point(0).point_type(), PointType::Curve);
        assert_eq!(path.len(), 4);
        assert_eq!(path.segments().len(), 2);
    }

    #[test]
    fn test_guideline_lines() {
        assert!(matches!(Guideline::horizontal(10.0).to_norad_line(), norad::Line::Horizontal(y) if y == 10.0));
        assert!(matches!(Guideline::vertical(5.0).to_norad_line(), norad::Line::Vertical(x) if x == 5.0));
        assert!(matches!(
            Guideline::new(1.0, 2.0, 30.0).to_norad_line(),
            norad::Line::Angle { degrees, .. } if degrees == 30.0
        ));
    }

    #[test]
    fn test_layer_writes_back_into_norad_glyph() {
        let layer = Layer::new(DEFAULT_LAYER_NAME)
            .with_width(600.0)
            .with_path(square(100.0))
            .with_component(Component::new("acute", Affine::translate((10.0, 20.0))));
        let mut target = norad::Glyph::new("a");
        layer.write_to_norad(&mut target);
        assert_eq!(target.width, 600.0);
        assert_eq!(target.contours.len(), 1);
        assert_eq!(target.components[0].transform.x_offset, 10.0);

        let back = Layer::from_norad(&target, DEFAULT_LAYER_NAME);
        assert_eq!(back.paths(), layer.paths());
        assert_eq!(back.components(), layer.components());
    }
}
