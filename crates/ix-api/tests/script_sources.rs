use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use ix_api::{
    ClassBuilder, ClassDescriptor, Engine, EngineOptions, HostObject, IxError, MapContext,
    ParamType, Value,
};

fn temp_script(name: &str, source: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("ix-api-{}-{}.ix", name, std::process::id()));
    fs::write(&path, source).expect("temp script should be writable");
    path
}

#[derive(Debug)]
struct Counter {
    class: Arc<ClassDescriptor>,
    count: Mutex<i64>,
}

impl HostObject for Counter {
    fn class(&self) -> Arc<ClassDescriptor> {
        self.class.clone()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

fn counter() -> Value {
    let class = ClassBuilder::<Counter>::new("Counter")
        .method("increment", &[ParamType::Integer], |counter, args| {
            let mut count = counter.count.lock().expect("count lock");
            *count += args[0].as_int().unwrap_or_default();
            Ok(Value::Int(*count))
        })
        .mutable_field(
            "count",
            ParamType::Integer,
            |counter| Value::Int(*counter.count.lock().expect("count lock")),
            |counter, value| {
                *counter.count.lock().expect("count lock") = value.as_int().unwrap_or_default();
                Ok(())
            },
        )
        .build();
    Value::object(Counter {
        class,
        count: Mutex::new(0),
    })
}

#[test]
fn file_scripts_run_against_host_objects() {
    let path = temp_script(
        "file",
        "for (step : steps) { counter.increment(step); }\ncounter.count",
    );
    let engine = Engine::new(EngineOptions::default()).expect("engine");
    let script = engine.create_script_from_file(&path).expect("file compiles");
    assert_eq!(script.name, path.display().to_string());

    let mut context = MapContext::new()
        .with("counter", counter())
        .with("steps", vec![Value::Int(2), Value::Int(3)]);
    assert_eq!(engine.execute(&script, &mut context).expect("runs"), Value::Int(5));
    fs::remove_file(path).ok();
}

#[test]
fn field_assignment_checks_the_declared_type() {
    let engine = Engine::new(EngineOptions::default()).expect("engine");
    let mut context = MapContext::new().with("counter", counter());
    let script = engine.create_script("counter.count = 7; counter.count").expect("compiles");
    assert_eq!(engine.execute(&script, &mut context).expect("runs"), Value::Int(7));

    let script = engine.create_script("counter.count = 'seven'").expect("compiles");
    let error = engine.execute(&script, &mut context).expect_err("no coercion");
    assert_eq!(error.code(), "RESOLVE_SETTER_NOT_FOUND");
}

#[test]
fn file_urls_load_like_paths() {
    let path = temp_script("url", "'from ' + where");
    let url = reqwest::Url::from_file_path(&path).expect("absolute temp path");
    let engine = Engine::new(EngineOptions::default()).expect("engine");
    let script = engine.create_script_from_url(url.as_str()).expect("url compiles");
    let mut context = MapContext::new().with("where", "disk");
    assert_eq!(
        engine.execute(&script, &mut context).expect("runs"),
        Value::from("from disk")
    );
    fs::remove_file(path).ok();
}

#[test]
fn unreadable_sources_are_compilation_failures() {
    let engine = Engine::new(EngineOptions::default()).expect("engine");
    let missing = std::env::temp_dir().join("ix-api-definitely-missing.ix");
    let error = engine
        .create_script_from_file(&missing)
        .expect_err("missing file");
    assert!(matches!(error, IxError::Compilation { .. }));

    let error = engine
        .create_script_from_url("not a url")
        .expect_err("bad url");
    assert_eq!(error.code(), "COMPILATION_FAILED");
}

#[test]
fn options_can_come_from_json() {
    let options = EngineOptions::from_json(r#"{"cache_size": 4, "legacy": true}"#).expect("options");
    let engine = Engine::new(options).expect("engine");
    let script = engine.create_script("nobody.name").expect("compiles");
    assert_eq!(
        engine.execute(&script, &mut MapContext::new()).expect("legacy forgives null operands"),
        Value::Null
    );
}
