//! Built-in Rhai functions available to selector expressions.

use rhai::{Dynamic, Engine};
use std::net::IpAddr;

/// Registers all built-in functions in the Rhai engine.
pub fn register_builtin_functions(engine: &mut Engine) {
    register_string_functions(engine);
    register_host_functions(engine);
}

fn register_string_functions(engine: &mut Engine) {
    engine.register_fn("to_lowercase", |s: &str| s.to_lowercase());
    engine.register_fn("to_uppercase", |s: &str| s.to_uppercase());
    engine.register_fn("trim", |s: &str| s.trim().to_string());
    engine.register_fn("str_contains", |s: &str, pattern: &str| s.contains(pattern));
    engine.register_fn("starts_with", |s: &str, prefix: &str| s.starts_with(prefix));
    engine.register_fn("ends_with", |s: &str, suffix: &str| s.ends_with(suffix));
    engine.register_fn("replace", |s: &str, from: &str, to: &str| {
        s.replace(from, to)
    });

    // Character-based, clamps out-of-range arguments
    engine.register_fn("substring", |s: &str, start: i64, len: i64| -> String {
        let start = start.max(0) as usize;
        let len = len.max(0) as usize;
        s.chars().skip(start).take(len).collect()
    });

    // n-th part of a split, or () when out of range
    engine.register_fn("split_part", |s: &str, delimiter: &str, index: i64| -> Dynamic {
        usize::try_from(index)
            .ok()
            .and_then(|idx| s.split(delimiter).nth(idx))
            .map(|part| Dynamic::from(part.to_string()))
            .unwrap_or(Dynamic::UNIT)
    });
}

fn register_host_functions(engine: &mut Engine) {
    // "web-01.dc1.example.com" -> "web-01"; IP addresses are returned unchanged
    engine.register_fn("short_hostname", |host: &str| -> String {
        if host.parse::<IpAddr>().is_ok() {
            return host.to_string();
        }
        host.split('.').next().unwrap_or(host).to_string()
    });

    engine.register_fn("is_valid_ip", |ip: &str| -> bool {
        ip.parse::<IpAddr>().is_ok()
    });

    // Canonical textual form, or () if not an IP address
    engine.register_fn("normalize_ip", |ip: &str| -> Dynamic {
        ip.trim()
            .parse::<IpAddr>()
            .map(|addr| Dynamic::from(addr.to_string()))
            .unwrap_or(Dynamic::UNIT)
    });
}
