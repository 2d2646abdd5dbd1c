//! JavaScript Runtime

use rquickjs::{CatchResultExt, Context, Runtime, Value};

use crate::console::install_console;
use crate::JsError;

/// QuickJS runtime wrapper
pub struct ScriptRuntime {
    context: Context,
    _runtime: Runtime,
}

impl ScriptRuntime {
    /// Create a runtime with `console` and a `window` alias of the global
    /// object installed
    pub fn new() -> Result<Self, JsError> {
        tracing::info!("Creating JavaScript runtime");

        let runtime = Runtime::new().map_err(|e| JsError::Init(e.to_string()))?;
        let context = Context::full(&runtime).map_err(|e| JsError::Init(e.to_string()))?;

        context
            .with(|ctx| {
                install_console(&ctx)?;
                let globals = ctx.globals();
                globals.set("window", ctx.globals())
            })
            .map_err(|e| JsError::Init(e.to_string()))?;

        Ok(Self {
            context,
            _runtime: runtime,
        })
    }

    /// Evaluate a classic script. `origin` names the script in errors.
    pub fn eval(&self, source: &str, origin: &str) -> Result<(), JsError> {
        self.context.with(|ctx| {
            ctx.eval::<Value, _>(source)
                .catch(&ctx)
                .map(|_| ())
                .map_err(|e| JsError::Runtime {
                    origin: origin.to_string(),
                    message: e.to_string(),
                })
        })
    }

    /// Read a global as a string, if it is one
    pub fn global_string(&self, name: &str) -> Option<String> {
        self.context
            .with(|ctx| ctx.globals().get::<_, Option<String>>(name).ok().flatten())
    }
}
