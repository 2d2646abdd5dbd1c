//! Console API
//!
//! `console.log` and friends, forwarded to tracing.

use rquickjs::function::Rest;
use rquickjs::{Ctx, Function, Object, Value};
use std::fmt::Write;

#[derive(Debug, Clone, Copy)]
enum Level {
    Log,
    Debug,
    Warn,
    Error,
}

const METHODS: &[(&str, Level)] = &[
    ("log", Level::Log),
    ("info", Level::Log),
    ("debug", Level::Debug),
    ("warn", Level::Warn),
    ("error", Level::Error),
];

/// Install console API into the global object
pub fn install_console(ctx: &Ctx) -> Result<(), rquickjs::Error> {
    let console = Object::new(ctx.clone())?;

    for &(name, level) in METHODS {
        let func = Function::new(ctx.clone(), move |_ctx: Ctx, args: Rest<Value>| {
            emit(level, &args.0);
            Ok::<(), rquickjs::Error>(())
        })?;
        console.set(name, func)?;
    }

    ctx.globals().set("console", console)?;
    Ok(())
}

fn emit(level: Level, values: &[Value]) {
    let mut output = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            output.push(' ');
        }
        format_value(&mut output, value);
    }

    match level {
        Level::Error => tracing::error!("[JS] {}", output),
        Level::Warn => tracing::warn!("[JS] {}", output),
        Level::Debug => tracing::debug!("[JS] {}", output),
        Level::Log => tracing::info!("[JS] {}", output),
    }
}

/// Format a JavaScript value for logging
fn format_value(out: &mut String, value: &Value) {
    if value.is_undefined() {
        out.push_str("undefined");
    } else if value.is_null() {
        out.push_str("null");
    } else if let Some(b) = value.as_bool() {
        write!(out, "{}", b).ok();
    } else if let Some(n) = value.as_int() {
        write!(out, "{}", n).ok();
    } else if let Some(n) = value.as_float() {
        write!(out, "{}", n).ok();
    } else if let Some(s) = value.as_string() {
        if let Ok(s) = s.to_string() {
            out.push_str(&s);
        }
    } else if value.is_array() {
        out.push_str("[Array]");
    } else if value.is_function() {
        out.push_str("[Function]");
    } else if value.is_object() {
        out.push_str("[Object]");
    } else {
        out.push_str("[unknown]");
    }
}
