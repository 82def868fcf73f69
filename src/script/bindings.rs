use mlua::{Lua, Table};

use crate::foundation::core::{Point, Rgba8};
use crate::render::draw::DrawCommand;
use crate::script::color::color_from_table;

/// Name of the table that mirrors the primitive globals (`raylib.DrawCircle`, ...).
pub(crate) const COMPAT_TABLE: &str = "raylib";

/// Commands issued by the script for the frame in flight.
///
/// Lives in the Lua app data. Primitives push into it only while `open`, which the host sets
/// around each `onRender` call.
#[derive(Debug, Default)]
pub(crate) struct DrawQueue {
    pub(crate) open: bool,
    pub(crate) commands: Vec<DrawCommand>,
}

/// Register the primitive catalog as globals and inside [`COMPAT_TABLE`].
pub(crate) fn register(lua: &Lua) -> mlua::Result<()> {
    let globals = lua.globals();
    let compat = lua.create_table()?;

    let catalog = [
        ("DrawCircle", lua.create_function(draw_circle)?),
        ("DrawRectangle", lua.create_function(draw_rectangle)?),
        ("DrawText", lua.create_function(draw_text)?),
        ("DrawLine", lua.create_function(draw_line)?),
    ];
    for (name, f) in catalog {
        globals.set(name, f.clone())?;
        compat.set(name, f)?;
    }
    globals.set(COMPAT_TABLE, compat)?;

    lua.set_app_data(DrawQueue::default());
    Ok(())
}

fn draw_circle(lua: &Lua, (x, y, radius, color): (f64, f64, f64, Table)) -> mlua::Result<()> {
    let color = color_arg("DrawCircle", 4, &color)?;
    push(
        lua,
        DrawCommand::Circle {
            center: Point::new(x, y),
            radius,
            color,
        },
    )
}

fn draw_rectangle(
    lua: &Lua,
    (x, y, width, height, color): (f64, f64, f64, f64, Table),
) -> mlua::Result<()> {
    let color = color_arg("DrawRectangle", 5, &color)?;
    let cmd = DrawCommand::rectangle(x, y, width, height, color)
        .map_err(|e| mlua::Error::runtime(e.to_string()))?;
    push(lua, cmd)
}

fn draw_text(
    lua: &Lua,
    (text, x, y, font_size, color): (String, f64, f64, f64, Table),
) -> mlua::Result<()> {
    let color = color_arg("DrawText", 5, &color)?;
    push(
        lua,
        DrawCommand::Text {
            text,
            origin: Point::new(x, y),
            font_size,
            color,
        },
    )
}

fn draw_line(
    lua: &Lua,
    (x1, y1, x2, y2, color): (f64, f64, f64, f64, Table),
) -> mlua::Result<()> {
    let color = color_arg("DrawLine", 5, &color)?;
    push(
        lua,
        DrawCommand::Line {
            from: Point::new(x1, y1),
            to: Point::new(x2, y2),
            color,
        },
    )
}

fn color_arg(name: &str, pos: usize, table: &Table) -> mlua::Result<Rgba8> {
    color_from_table(table)
        .map_err(|e| mlua::Error::runtime(format!("{name}: bad color (argument #{pos}): {e}")))
}

fn push(lua: &Lua, cmd: DrawCommand) -> mlua::Result<()> {
    cmd.validate()
        .map_err(|e| mlua::Error::runtime(e.to_string()))?;
    let mut queue = lua
        .app_data_mut::<DrawQueue>()
        .ok_or_else(|| mlua::Error::runtime("draw queue is not installed"))?;
    if !queue.open {
        return Err(mlua::Error::runtime(format!(
            "{} may only be called from onRender",
            cmd.name()
        )));
    }
    queue.commands.push(cmd);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/script/bindings.rs"]
mod tests;
