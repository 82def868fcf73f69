use super::*;

fn lua_with_catalog() -> Lua {
    let lua = Lua::new();
    register(&lua).unwrap();
    lua
}

fn open_queue(lua: &Lua) {
    lua.app_data_mut::<DrawQueue>().unwrap().open = true;
}

fn queued(lua: &Lua) -> Vec<DrawCommand> {
    std::mem::take(&mut lua.app_data_mut::<DrawQueue>().unwrap().commands)
}

#[test]
fn catalog_is_registered_globally_and_in_compat_table() {
    let lua = lua_with_catalog();
    for name in ["DrawCircle", "DrawRectangle", "DrawText", "DrawLine"] {
        let global: mlua::Value = lua.globals().get(name).unwrap();
        assert!(global.is_function(), "{name} missing");
        let compat: Table = lua.globals().get(COMPAT_TABLE).unwrap();
        let aliased: mlua::Value = compat.get(name).unwrap();
        assert!(aliased.is_function(), "{COMPAT_TABLE}.{name} missing");
    }
}

#[test]
fn primitives_queue_commands_in_call_order() {
    let lua = lua_with_catalog();
    open_queue(&lua);
    lua.load(
        r#"
        DrawCircle(10, 20, 5, { r = 255, g = 0, b = 0 })
        raylib.DrawRectangle(1, 2, 3, 4, { r = 0, g = 255, b = 0, a = 100 })
        DrawLine(0, 0, 8, 8, { r = 1, g = 2, b = 3 })
        DrawText("hi", 4, 5, 20, { r = 9, g = 9, b = 9 })
        "#,
    )
    .exec()
    .unwrap();

    let cmds = queued(&lua);
    assert_eq!(cmds.len(), 4);
    assert_eq!(
        cmds[0],
        DrawCommand::Circle {
            center: Point::new(10.0, 20.0),
            radius: 5.0,
            color: Rgba8::rgb(255, 0, 0),
        }
    );
    assert_eq!(
        cmds[1],
        DrawCommand::rectangle(1.0, 2.0, 3.0, 4.0, Rgba8::rgba(0, 255, 0, 100)).unwrap()
    );
    assert_eq!(cmds[2].name(), "DrawLine");
    assert_eq!(cmds[3].name(), "DrawText");
}

#[test]
fn primitives_outside_on_render_raise() {
    let lua = lua_with_catalog();
    let err = lua
        .load("DrawCircle(1, 1, 1, { r = 0, g = 0, b = 0 })")
        .exec()
        .unwrap_err();
    assert!(err.to_string().contains("only be called from onRender"));
}

#[test]
fn bad_arguments_raise_lua_errors() {
    let lua = lua_with_catalog();
    open_queue(&lua);

    let err = lua
        .load("DrawCircle(1, 1, -3, { r = 0, g = 0, b = 0 })")
        .exec()
        .unwrap_err();
    assert!(err.to_string().contains("radius"));

    let err = lua
        .load("DrawLine(0, 0, 1, 1, { r = 0, b = 0 })")
        .exec()
        .unwrap_err();
    assert!(err.to_string().contains("`g`"));

    assert!(lua.load("DrawRectangle(0, 0, 1, 1)").exec().is_err());
    assert!(queued(&lua).is_empty());
}
