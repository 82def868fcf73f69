use super::*;

fn eval_table(lua: &mlua::Lua, src: &str) -> Table {
    lua.load(src).eval::<Table>().unwrap()
}

#[test]
fn alpha_defaults_to_opaque() {
    let lua = mlua::Lua::new();
    let t = eval_table(&lua, "return { r = 10, g = 20, b = 30 }");
    assert_eq!(color_from_table(&t).unwrap(), Rgba8::rgb(10, 20, 30));
}

#[test]
fn channels_are_clamped_and_rounded() {
    let lua = mlua::Lua::new();
    let t = eval_table(&lua, "return { r = -5, g = 300, b = 12.6, a = 128 }");
    assert_eq!(color_from_table(&t).unwrap(), Rgba8::rgba(0, 255, 13, 128));
}

#[test]
fn missing_or_mistyped_channel_is_named() {
    let lua = mlua::Lua::new();
    let t = eval_table(&lua, "return { r = 1, b = 3 }");
    assert!(color_from_table(&t).unwrap_err().contains("`g`"));

    let t = eval_table(&lua, "return { r = 1, g = 2, b = 'blue' }");
    let err = color_from_table(&t).unwrap_err();
    assert!(err.contains("`b`"));
    assert!(err.contains("string"));
}
