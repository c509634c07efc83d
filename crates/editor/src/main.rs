use std::io::{BufRead, Write};
use std::path::Path;

use serde::Deserialize;
use shared::SceneDocument;
use wallsim_editor_lib::command::{execute_json, execute_json_batch};
use wallsim_editor_lib::editor::Editor;
use wallsim_editor_lib::notify::TracingUi;
use wallsim_editor_lib::ports::{Services, SystemClock};
use wallsim_editor_lib::state::{AppSettings, SceneState};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wallsim_editor=info,wallsim_editor_lib=info".into()),
        )
        .init();

    let settings = AppSettings::load();

    // --scene <path> wins over the autosave
    let document = parse_scene_arg()
        .or_else(|| {
            settings
                .autosave
                .restore_on_start
                .then(SceneState::load_autosave)
                .flatten()
        })
        .unwrap_or_default();
    tracing::info!("Starting with {} element(s)", document.elements.len());

    let scene = SceneState::from_document(document).with_grid_spacing(settings.grid.spacing);
    let services = Services::new(Box::new(SystemClock), Box::new(TracingUi::default()))
        .with_scene(Box::new(scene));
    let mut editor = Editor::new(&settings, services);

    run_command_loop(&mut editor);

    if settings.autosave.enabled {
        autosave(&editor);
    }
}

/// One JSON command (or array of commands) per stdin line, one response line each
fn run_command_loop(editor: &mut Editor) {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read stdin: {e}");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let output = if line.starts_with('[') {
            execute_json_batch(editor, line).and_then(|r| serde_json::to_string(&r).map_err(|e| e.to_string()))
        } else {
            execute_json(editor, line).and_then(|r| serde_json::to_string(&r).map_err(|e| e.to_string()))
        };
        let output = output.unwrap_or_else(|e| serde_json::json!({ "success": false, "error": e }).to_string());

        if writeln!(stdout, "{output}").and_then(|_| stdout.flush()).is_err() {
            break;
        }
    }
}

fn autosave(editor: &Editor) {
    let Ok(scene) = editor.scene() else {
        return;
    };
    match SceneDocument::deserialize(scene.export_scene()) {
        Ok(document) => SceneState::from_document(document).autosave(),
        Err(e) => tracing::warn!("Autosave skipped: {e}"),
    }
}

fn parse_scene_arg() -> Option<SceneDocument> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--scene" && i + 1 < args.len() {
            let path = &args[i + 1];
            match SceneState::load_file(Path::new(path)) {
                Ok(scene) => {
                    tracing::info!("Loaded scene from {path} ({} elements)", scene.elements.len());
                    return Some(scene);
                }
                Err(e) => tracing::error!("{e}"),
            }
            i += 2;
        } else {
            i += 1;
        }
    }
    None
}
