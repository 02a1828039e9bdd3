use brawl_engine::api::{
    simulate_duel, simulate_duel_many, simulate_royale, DuelConfig, RoyaleConfig,
};
use jni::objects::{JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;
use serde::Serialize;
use serde_json::json;

pub const VERSION: &str = concat!("brawl-ffi ", env!("CARGO_PKG_VERSION"));

const DEFAULT_SAMPLES: u64 = 100;

fn ok(value: impl Serialize) -> String {
    match serde_json::to_value(value) {
        Ok(result) => json!({ "ok": true, "result": result }).to_string(),
        Err(e) => err(e),
    }
}

fn err(e: impl std::fmt::Display) -> String {
    json!({ "ok": false, "error": e.to_string() }).to_string()
}

/// Run one duel from a JSON `DuelConfig`; answers a JSON envelope.
pub fn simulate_duel_json(input: &str) -> String {
    let cfg: DuelConfig = match serde_json::from_str(input) {
        Ok(c) => c,
        Err(e) => return err(format!("invalid_config: {}", e)),
    };
    match simulate_duel(cfg) {
        Ok(report) => ok(report),
        Err(e) => err(format!("{:#}", e)),
    }
}

/// Like [`simulate_duel_json`], plus an optional `samples` field (default 100).
pub fn simulate_duel_many_json(input: &str) -> String {
    let mut root: serde_json::Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(e) => return err(format!("invalid_config: {}", e)),
    };
    let samples = root.get("samples").and_then(|v| v.as_u64()).unwrap_or(DEFAULT_SAMPLES);
    let samples = match u32::try_from(samples) {
        Ok(n) if n > 0 => n,
        _ => return err(format!("invalid_config: samples must be in 1..={}", u32::MAX)),
    };
    if let Some(obj) = root.as_object_mut() {
        obj.remove("samples");
    }
    let cfg: DuelConfig = match serde_json::from_value(root) {
        Ok(c) => c,
        Err(e) => return err(format!("invalid_config: {}", e)),
    };
    match simulate_duel_many(cfg, samples) {
        Ok(stats) => ok(stats),
        Err(e) => err(format!("{:#}", e)),
    }
}

pub fn simulate_royale_json(input: &str) -> String {
    let cfg: RoyaleConfig = match serde_json::from_str(input) {
        Ok(c) => c,
        Err(e) => return err(format!("invalid_config: {}", e)),
    };
    match simulate_royale(cfg) {
        Ok(report) => ok(report),
        Err(e) => err(format!("{:#}", e)),
    }
}

/// Null when the JVM refuses the string; the caller sees a pending exception.
fn to_jstring(env: &JNIEnv, text: &str) -> jstring {
    match env.new_string(text) {
        Ok(s) => s.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

fn call_with_json(mut env: JNIEnv, json: JString, f: fn(&str) -> String) -> jstring {
    let input: String = match env.get_string(&json) {
        Ok(s) => s.into(),
        Err(e) => return to_jstring(&env, &err(e)),
    };
    let out = f(&input);
    to_jstring(&env, &out)
}

#[no_mangle]
pub extern "system" fn Java_com_brawl_Ffi_version(env: JNIEnv, _class: JClass) -> jstring {
    to_jstring(&env, VERSION)
}

#[no_mangle]
pub extern "system" fn Java_com_brawl_Ffi_simulateDuelJson(
    env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    call_with_json(env, json, simulate_duel_json)
}

#[no_mangle]
pub extern "system" fn Java_com_brawl_Ffi_simulateDuelManyJson(
    env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    call_with_json(env, json, simulate_duel_many_json)
}

#[no_mangle]
pub extern "system" fn Java_com_brawl_Ffi_simulateRoyaleJson(
    env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    call_with_json(env, json, simulate_royale_json)
}
