//! MockDraft command-line tools.

mod args;

pub use args::{Args, Command};

use kurbo::{Point, Rect};
use mockdraft_core::{
    ApproxTheme, Document, DocumentError, DrawOp, EditorConfig, Item, Painter, Placeable,
    WidgetType,
};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("Config error in {path}: {message}")]
    Config { path: String, message: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;

/// Run one command, returning what should be printed.
pub fn run(args: &Args) -> CliResult<String> {
    let config = load_config(args.config.as_deref())?;
    match &args.command {
        Command::Info { file } => info(&open(file, &config)?),
        Command::Render { file, pretty } => render(&mut open(file, &config)?, *pretty),
        Command::Normalize { input, output } => {
            let mut doc = open(input, &config)?;
            doc.save_file(output)?;
            Ok(format!("wrote {}\n", output.display()))
        }
        Command::Palette => Ok(palette()),
    }
}

fn load_config(path: Option<&Path>) -> CliResult<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let config_error = |message: String| CliError::Config {
        path: path.display().to_string(),
        message,
    };
    let text = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
    let config = EditorConfig::from_json(&text).map_err(|e| config_error(e.to_string()))?;
    log::debug!("loaded config {config:?}");
    Ok(config)
}

fn open(path: &Path, config: &EditorConfig) -> CliResult<Document> {
    let mut doc = Document::new(config.clone(), ApproxTheme::new());
    doc.load_file(path)?;
    Ok(doc)
}

fn info(doc: &Document) -> CliResult<String> {
    let scene = doc.scene();
    let mut out = String::new();
    let top_level = scene.top_level_sorted();
    let widgets = scene.all_widgets_sorted();
    let _ = writeln!(out, "{} widgets, {} top-level items", widgets.len(), top_level.len());

    for id in top_level {
        match scene.get(id) {
            Some(Item::Widget(widget)) => {
                let _ = writeln!(out, "{}", describe(widget.kind(), widget.id(), widget.pos_rect(), widget.z(), widget.is_locked()));
            }
            Some(Item::Group(group)) => {
                let _ = writeln!(out, "group of {} at {}", group.members().len(), fmt_rect(group.pos_rect()));
                for member in group.members() {
                    if let (Some(widget), Some(rect)) = (scene.widget(*member), scene.scene_rect(*member)) {
                        let _ = writeln!(out, "  {}", describe(widget.kind(), widget.id(), rect, widget.z(), false));
                    }
                }
            }
            None => {}
        }
    }
    Ok(out)
}

fn describe(kind: WidgetType, id: Option<u32>, rect: Rect, z: f64, locked: bool) -> String {
    let id = id.map_or("-".to_string(), |id| id.to_string());
    let lock = if locked { " locked" } else { "" };
    format!("#{id} {} at {} z={z}{lock}", kind.name(), fmt_rect(rect))
}

fn fmt_rect(rect: Rect) -> String {
    format!("({}, {}) {}x{}", rect.x0, rect.y0, rect.width(), rect.height())
}

#[derive(Serialize)]
struct PaintedOp {
    origin: Point,
    #[serde(flatten)]
    op: DrawOp,
}

/// Collects ops in paint order.
#[derive(Default)]
struct JsonPainter {
    ops: Vec<PaintedOp>,
}

impl Painter for JsonPainter {
    fn paint(&mut self, origin: Point, op: &DrawOp) {
        self.ops.push(PaintedOp {
            origin,
            op: op.clone(),
        });
    }
}

fn render(doc: &mut Document, pretty: bool) -> CliResult<String> {
    let mut painter = JsonPainter::default();
    doc.paint(&mut painter);
    let json = if pretty {
        serde_json::to_string_pretty(&painter.ops)?
    } else {
        serde_json::to_string(&painter.ops)?
    };
    Ok(json + "\n")
}

fn palette() -> String {
    WidgetType::ALL
        .iter()
        .map(|kind| format!("{:>2} {}\n", kind.ordinal(), kind.name()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    fn sample(dir: &Path) -> std::path::PathBuf {
        let mut doc = Document::default();
        doc.add_widget(WidgetType::Button, Point::new(10.0, 20.0));
        doc.add_widget(WidgetType::Button, Point::new(100.0, 20.0));
        doc.add_widget(WidgetType::AlertBox, Point::new(0.0, 200.0));
        let path = dir.join("sample.xml");
        doc.save_file(&path).unwrap();
        path
    }

    fn run_args(args: &[&str]) -> CliResult<String> {
        run(&Args::parse_from(std::iter::once("mockdraft").chain(args.iter().copied())))
    }

    #[test]
    fn test_palette_lists_every_type() {
        let out = run_args(&["palette"]).unwrap();
        assert_eq!(out.lines().count(), WidgetType::COUNT);
        assert!(out.contains("Button"));
    }

    #[test]
    fn test_info() {
        let dir = tempdir().unwrap();
        let path = sample(dir.path());
        let out = run_args(&["info", path.to_str().unwrap()]).unwrap();
        assert!(out.starts_with("3 widgets, 3 top-level items"));
        assert!(out.contains("#0 Button at (10, 20)"));
        assert!(out.contains("Alert Box"));
    }

    #[test]
    fn test_render_outputs_json_ops() {
        let dir = tempdir().unwrap();
        let path = sample(dir.path());
        let out = run_args(&["render", path.to_str().unwrap()]).unwrap();
        let ops: serde_json::Value = serde_json::from_str(&out).unwrap();
        let ops = ops.as_array().unwrap();
        assert!(!ops.is_empty());
        assert!(ops.iter().all(|op| op.get("op").is_some() && op.get("origin").is_some()));
    }

    #[test]
    fn test_normalize_round_trips() {
        let dir = tempdir().unwrap();
        let path = sample(dir.path());
        let out_path = dir.path().join("out.xml");
        run_args(&["normalize", path.to_str().unwrap(), out_path.to_str().unwrap()]).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            std::fs::read_to_string(&out_path).unwrap()
        );
    }

    #[test]
    fn test_config_is_applied() {
        let dir = tempdir().unwrap();
        let path = sample(dir.path());
        let config = dir.path().join("config.json");
        std::fs::write(&config, r#"{ "z_step": 1.0 }"#).unwrap();
        let out = run_args(&["info", path.to_str().unwrap(), "--config", config.to_str().unwrap()]).unwrap();
        assert!(out.contains("z=0.1"));

        std::fs::write(&config, "not json").unwrap();
        let err = run_args(&["palette", "--config", config.to_str().unwrap()]).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[test]
    fn test_missing_file_fails() {
        let err = run_args(&["info", "/nonexistent/mockup.xml"]).unwrap_err();
        assert!(matches!(err, CliError::Document(DocumentError::Io(_))));
    }
}
