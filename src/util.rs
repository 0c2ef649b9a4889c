use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::{DomElement, JsResult, JsValue};

/// Get property of dom element
pub fn get_str_prop(elem: &DomElement, key: &str) -> JsResult<String> {
    let key = JsValue::from_str(key);
    js_sys::Reflect::get(elem, &key).and_then(|val| val.as_string().ok_or(val))
}

/// Set property of dom element.
///
/// Unlike `set_attribute`, this changes what the user currently sees,
/// e.g. the text inside an `<input>`.
pub fn set_str_prop(elem: &DomElement, key: &str, val: &str) -> JsResult<()> {
    let key = JsValue::from_str(key);
    let ok = js_sys::Reflect::set(elem, &key, &JsValue::from_str(val))?;
    if ok {
        Ok(())
    } else {
        Err(JsValue::from_str("property is read-only"))
    }
}

/// `log` backend which writes to the browser console
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger. Calling it twice only adjusts the level.
pub fn init_logging(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_err() {
        trace!("Logger already installed");
    }
    log::set_max_level(level);
}
