//! Application runner logic
//!
//! Loads the UFO, runs the requested operation on every layer of the glyph
//! and writes the result back.

use crate::core::cli::{CliArgs, Command};
use crate::core::errors::{anyhow, glyph_not_found, BezyResult};
use crate::core::settings::EditorSettings;
use crate::data::font::Font;
use crate::editing::boolean::remove_overlaps;
use crate::editing::knife::slice;
use crate::editing::path_ops::{decompose_components, round_selection};
use crate::logging;
use kurbo::Point;
use tracing::{debug, info};

/// Run one CLI command end to end
pub fn run_app(cli_args: CliArgs) -> BezyResult<()> {
    if let Err(e) = logging::init_logger(cli_args.log_level.as_deref(), cli_args.log_file) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    cli_args.validate().map_err(|e| anyhow!(e))?;
    let settings = cli_args.settings();

    let mut font = Font::load_ufo(&cli_args.font_source)?;
    let changed = run_command(&mut font, &cli_args.glyph, &cli_args.command, &settings)?;

    if cli_args.command.edits() {
        if changed == 0 {
            info!("Nothing to change in '{}'", cli_args.glyph);
            return Ok(());
        }
        font.save_ufo(&cli_args.font_source)?;
        info!(
            "Updated {} layer(s) of '{}' in {}",
            changed,
            cli_args.glyph,
            cli_args.font_source.display()
        );
    }
    Ok(())
}

/// Apply `command` to every layer of `glyph_name`. Returns the number of
/// layers that changed; `dump` prints the glyph and reports none.
pub fn run_command(
    font: &mut Font,
    glyph_name: &str,
    command: &Command,
    settings: &EditorSettings,
) -> BezyResult<usize> {
    let glyph_index = font.glyph_index(glyph_name).ok_or_else(|| glyph_not_found(glyph_name))?;
    let layer_count = font.glyphs()[glyph_index].layers().len();
    let mut changed = 0;

    match command {
        Command::Dump => {
            let json = serde_json::to_string_pretty(&font.glyphs()[glyph_index])?;
            println!("{json}");
        }
        Command::RemoveOverlaps => {
            let glyph = font.glyph_mut(glyph_index);
            for layer in 0..layer_count {
                if remove_overlaps(&mut glyph.layer_mut(layer), settings.boolean_accuracy) {
                    changed += 1;
                }
            }
        }
        Command::Round => {
            let glyph = font.glyph_mut(glyph_index);
            for layer_index in 0..layer_count {
                let mut layer = glyph.layer_mut(layer_index);
                layer.select_all();
                let rounded = round_selection(&mut layer, settings.grid);
                layer.clear_selection();
                if rounded > 0 {
                    changed += 1;
                }
            }
        }
        Command::Slice { .. } => {
            let ((x0, y0), (x1, y1)) = command
                .slice_line()?
                .ok_or_else(|| anyhow!("slice needs --from and --to"))?;
            let glyph = font.glyph_mut(glyph_index);
            for layer in 0..layer_count {
                if slice(&mut glyph.layer_mut(layer), Point::new(x0, y0), Point::new(x1, y1)) {
                    changed += 1;
                }
            }
        }
        Command::Decompose => {
            for layer in 0..layer_count {
                if decompose_components(font, glyph_index, layer)? > 0 {
                    changed += 1;
                }
            }
        }
    }
    debug!("{:?} on '{}' changed {} layer(s)", command, glyph_name, changed);
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::component::Component;
    use crate::data::glyph::Glyph;
    use crate::data::layer::Layer;
    use crate::data::path::test_paths::{square, square_at};
    use crate::data::path::Path;
    use crate::data::point::EditPoint;
    use kurbo::Affine;

    fn font() -> Font {
        let o = Layer::new("public.default")
            .with_path(square(100.0))
            .with_path(square_at(50.0, 50.0, 100.0));
        let crooked = Layer::new("public.default").with_path(Path::from_points(vec![
            EditPoint::line_to(0.4, 0.0),
            EditPoint::line_to(10.6, 0.0),
            EditPoint::line_to(10.0, 9.5),
        ]));
        let accent = Layer::new("public.default")
            .with_component(Component::new("o", Affine::translate((200.0, 0.0))));
        Font::new("Test", 1000.0)
            .with_glyph(Glyph::new("o").with_layer(o))
            .with_glyph(Glyph::new("crooked").with_layer(crooked))
            .with_glyph(Glyph::new("oacute").with_layer(accent))
    }

    #[test]
    fn test_unknown_glyph_is_an_error() {
        let mut font = font();
        let err = run_command(&mut font, "missing", &Command::Dump, &EditorSettings::default()).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_remove_overlaps_command() {
        let mut font = font();
        let settings = EditorSettings::default();
        assert_eq!(run_command(&mut font, "o", &Command::RemoveOverlaps, &settings).unwrap(), 1);
        assert_eq!(font.glyph("o").unwrap().layer(0).paths().len(), 1);
        assert_eq!(run_command(&mut font, "o", &Command::RemoveOverlaps, &settings).unwrap(), 0);
    }

    #[test]
    fn test_round_command_leaves_nothing_selected() {
        let mut font = font();
        assert_eq!(run_command(&mut font, "crooked", &Command::Round, &EditorSettings::default()).unwrap(), 1);
        let layer = font.glyph("crooked").unwrap().layer(0);
        let xs: Vec<f64> = layer.path(0).points().iter().map(|p| p.x()).collect();
        assert_eq!(xs, vec![0.0, 11.0, 10.0]);
        assert!(!layer.has_selection());
    }

    #[test]
    fn test_slice_command() {
        let mut font = font();
        let command = Command::Slice {
            from: "25,-10".to_string(),
            to: "25,200".to_string(),
        };
        assert_eq!(run_command(&mut font, "o", &command, &EditorSettings::default()).unwrap(), 1);
        assert_eq!(font.glyph("o").unwrap().layer(0).paths().len(), 3);
    }

    #[test]
    fn test_decompose_command() {
        let mut font = font();
        assert_eq!(run_command(&mut font, "oacute", &Command::Decompose, &EditorSettings::default()).unwrap(), 1);
        let layer = font.glyph("oacute").unwrap().layer(0);
        assert!(layer.components().is_empty());
        assert_eq!(layer.paths().len(), 2);
    }
}
