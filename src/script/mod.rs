//! Lua host bridge: runtime lifetime, configuration globals and the per-frame callback.

mod bindings;
mod color;

use std::path::{Path, PathBuf};

use mlua::{Function, Lua, Table, Value};

use crate::config::{AnimationConfig, MAX_CANVAS_EDGE};
use crate::foundation::core::{FrameIndex, Point, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::draw::{DrawCommand, FrameScript, Painter};

use bindings::DrawQueue;

/// Name of the optional per-frame callback a script may define.
pub const FRAME_CALLBACK: &str = "onRender";

/// Owns the Lua runtime for the lifetime of a run.
///
/// Dropping the host closes the runtime and releases everything the script allocated.
pub struct ScriptHost {
    lua: Lua,
    script_dir: Option<PathBuf>,
}

impl ScriptHost {
    /// Create a runtime with the standard library and the drawing primitives registered.
    pub fn new() -> ReelResult<Self> {
        let lua = Lua::new();
        bindings::register(&lua).map_err(|e| {
            ReelError::script_load(format!("failed to register drawing primitives: {e}"))
        })?;
        Ok(Self {
            lua,
            script_dir: None,
        })
    }

    /// Evaluate a script file once.
    ///
    /// The script's directory is prepended to `package.path` so sibling modules can be
    /// `require`d.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn load_script(&mut self, path: &Path) -> ReelResult<()> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            ReelError::script_load(format!("failed to read script '{}': {e}", path.display()))
        })?;

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        self.prepend_package_path(&dir)?;
        self.script_dir = Some(dir);

        self.exec(&format!("@{}", path.display()), &source)?;
        tracing::debug!("script evaluated");
        Ok(())
    }

    /// Evaluate an in-memory script. `name` shows up in Lua diagnostics.
    pub fn load_source(&mut self, name: &str, source: &str) -> ReelResult<()> {
        self.exec(&format!("={name}"), source)
    }

    fn exec(&self, chunk_name: &str, source: &str) -> ReelResult<()> {
        self.lua
            .load(source)
            .set_name(chunk_name)
            .exec()
            .map_err(|e| ReelError::script_load(e.to_string()))
    }

    fn prepend_package_path(&self, dir: &Path) -> ReelResult<()> {
        let update = || -> mlua::Result<()> {
            let package: Table = self.lua.globals().get("package")?;
            let current: String = package.get("path")?;
            package.set("path", format!("{}/?.lua;{current}", dir.display()))
        };
        update().map_err(|e| ReelError::script_load(format!("failed to set package.path: {e}")))
    }

    /// Build an [`AnimationConfig`] from the script's globals.
    ///
    /// `screenWidth`, `screenHeight`, `fps` and `totalFrames` are required. `circleRadius`,
    /// `circleColor`, `backgroundColor` and `fontPath` fall back to the defaults.
    pub fn read_config(&self) -> ReelResult<AnimationConfig> {
        let globals = self.lua.globals();
        let defaults = AnimationConfig::default();

        let cfg = AnimationConfig {
            screen_width: required_int(&globals, "screenWidth", 1, i64::from(MAX_CANVAS_EDGE))?
                as u32,
            screen_height: required_int(&globals, "screenHeight", 1, i64::from(MAX_CANVAS_EDGE))?
                as u32,
            fps: required_int(&globals, "fps", 1, i64::from(u32::MAX))? as u32,
            total_frames: required_int(&globals, "totalFrames", 1, i64::MAX)? as u64,
            circle_radius: optional_number(&globals, "circleRadius")?
                .unwrap_or(defaults.circle_radius),
            circle_color: optional_color(&globals, "circleColor")?
                .unwrap_or(defaults.circle_color),
            background_color: optional_color(&globals, "backgroundColor")?
                .unwrap_or(defaults.background_color),
            font_path: optional_string(&globals, "fontPath")?.map(|p| self.resolve_path(&p)),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn resolve_path(&self, p: &str) -> PathBuf {
        let p = PathBuf::from(p);
        match &self.script_dir {
            Some(dir) if p.is_relative() => dir.join(p),
            _ => p,
        }
    }

    fn frame_callback(&self) -> Option<Function> {
        match self.lua.globals().get::<Value>(FRAME_CALLBACK) {
            Ok(Value::Function(f)) => Some(f),
            _ => None,
        }
    }

    /// Call `onRender(x, y, frameIndex)` and replay what it drew into `painter`.
    ///
    /// Does nothing when the script defines no callback. An error raised by the callback aborts
    /// the frame before anything is painted.
    pub fn invoke_frame_callback(
        &mut self,
        pos: Point,
        frame: FrameIndex,
        painter: &mut dyn Painter,
    ) -> ReelResult<()> {
        let Some(callback) = self.frame_callback() else {
            return Ok(());
        };
        let frame_arg = i64::try_from(frame.0)
            .map_err(|_| ReelError::render(format!("frame index {} exceeds i64", frame.0)))?;

        self.open_queue()?;
        let result = callback.call::<()>((pos.x, pos.y, frame_arg));
        let commands = self.close_queue()?;
        result.map_err(|e| {
            ReelError::render(format!("{FRAME_CALLBACK} failed on frame {}: {e}", frame.0))
        })?;

        for cmd in &commands {
            painter
                .paint(cmd)
                .map_err(|e| ReelError::render(format!("frame {}: {e}", frame.0)))?;
        }
        Ok(())
    }

    fn open_queue(&self) -> ReelResult<()> {
        let mut queue = self.queue()?;
        queue.open = true;
        queue.commands.clear();
        Ok(())
    }

    fn close_queue(&self) -> ReelResult<Vec<DrawCommand>> {
        let mut queue = self.queue()?;
        queue.open = false;
        Ok(std::mem::take(&mut queue.commands))
    }

    fn queue(&self) -> ReelResult<mlua::AppDataRefMut<'_, DrawQueue>> {
        self.lua
            .app_data_mut::<DrawQueue>()
            .ok_or_else(|| ReelError::render("draw queue is not installed"))
    }
}

impl FrameScript for ScriptHost {
    fn has_frame_callback(&self) -> bool {
        self.frame_callback().is_some()
    }

    fn render_frame(
        &mut self,
        pos: Point,
        frame: FrameIndex,
        painter: &mut dyn Painter,
    ) -> ReelResult<()> {
        self.invoke_frame_callback(pos, frame, painter)
    }
}

impl std::fmt::Debug for ScriptHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptHost")
            .field("script_dir", &self.script_dir)
            .field("has_frame_callback", &self.has_frame_callback())
            .finish()
    }
}

fn global(globals: &Table, name: &str) -> ReelResult<Value> {
    globals
        .get::<Value>(name)
        .map_err(|e| ReelError::config(format!("failed to read `{name}`: {e}")))
}

fn required_int(globals: &Table, name: &str, min: i64, max: i64) -> ReelResult<i64> {
    let v = match global(globals, name)? {
        Value::Nil => {
            return Err(ReelError::config(format!(
                "missing required global `{name}`"
            )));
        }
        Value::Integer(i) => i,
        Value::Number(n) if n.is_finite() && n.fract() == 0.0 => n as i64,
        Value::Number(n) => {
            return Err(ReelError::config(format!(
                "`{name}` must be an integer, got {n}"
            )));
        }
        other => {
            return Err(ReelError::config(format!(
                "`{name}` must be an integer, got {}",
                other.type_name()
            )));
        }
    };
    if v < min || v > max {
        return Err(ReelError::config(format!(
            "`{name}` must be in {min}..={max}, got {v}"
        )));
    }
    Ok(v)
}

fn optional_number(globals: &Table, name: &str) -> ReelResult<Option<f64>> {
    match global(globals, name)? {
        Value::Nil => Ok(None),
        Value::Integer(i) => Ok(Some(i as f64)),
        Value::Number(n) => Ok(Some(n)),
        other => Err(ReelError::config(format!(
            "`{name}` must be a number, got {}",
            other.type_name()
        ))),
    }
}

fn optional_color(globals: &Table, name: &str) -> ReelResult<Option<Rgba8>> {
    match global(globals, name)? {
        Value::Nil => Ok(None),
        Value::Table(t) => color::color_from_table(&t)
            .map(Some)
            .map_err(|e| ReelError::config(format!("`{name}`: {e}"))),
        other => Err(ReelError::config(format!(
            "`{name}` must be a color table {{r, g, b[, a]}}, got {}",
            other.type_name()
        ))),
    }
}

fn optional_string(globals: &Table, name: &str) -> ReelResult<Option<String>> {
    match global(globals, name)? {
        Value::Nil => Ok(None),
        Value::String(s) => Ok(Some(s.to_str().map_err(|e| {
            ReelError::config(format!("`{name}` must be valid UTF-8: {e}"))
        })?.to_string())),
        other => Err(ReelError::config(format!(
            "`{name}` must be a string, got {}",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/host.rs"]
mod tests;
