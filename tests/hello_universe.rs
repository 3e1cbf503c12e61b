//! A small service configuration bound into a typed struct, with users under
//! arbitrary keys and per-user access lists.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use json_bind::{Config, ErrorCode, Handlers, Node, Path, Schema, SchemaFile, Severity};

const DOCUMENT: &str = include_str!("../demos/hello_universe.json");
const SCHEMA_DOCUMENT: &str = include_str!("../demos/hello_universe.schema.json");

#[derive(Debug, Default, PartialEq)]
struct User {
    password: String,
    read: bool,
    write: bool,
    admin: bool,
}

#[derive(Debug, Default)]
struct HelloConfig {
    version: String,
    port: u16,
    ssl: bool,
    base_path: String,
    users: BTreeMap<String, User>,
}

fn on_version(_: &Path<'_>, val: &str, cfg: &mut HelloConfig) {
    cfg.version = val.to_string();
}

fn on_port(_: &Path<'_>, val: i64, cfg: &mut HelloConfig) {
    cfg.port = u16::try_from(val).unwrap_or_default();
}

fn on_ssl(_: &Path<'_>, val: bool, cfg: &mut HelloConfig) {
    cfg.ssl = val;
}

fn on_base_path(_: &Path<'_>, val: &str, cfg: &mut HelloConfig) {
    cfg.base_path = val.to_string();
}

// `/users/<name>/password`
fn on_password(path: &Path<'_>, val: &str, cfg: &mut HelloConfig) {
    let name = path.parent_key().unwrap_or_default();
    cfg.users.entry(name.to_string()).or_default().password = val.to_string();
}

// list elements add no segment: still `/users/<name>/access`
fn on_access(path: &Path<'_>, val: &str, cfg: &mut HelloConfig) {
    let name = path.parent_key().unwrap_or_default();
    let user = cfg.users.entry(name.to_string()).or_default();
    match val {
        "read" => user.read = true,
        "write" => user.write = true,
        "admin" => user.admin = true,
        _ => {}
    }
}

static SERVER: [Node<'static, HelloConfig>; 3] = [
    Node::int(Some("port"), Some(on_port), "TCP port"),
    Node::boolean(Some("ssl"), Some(on_ssl), "SSL enabled"),
    Node::string(Some("base-path"), Some(on_base_path), "URL base path"),
];

static USER_ACCESS: [Node<'static, HelloConfig>; 1] =
    [Node::string(None, Some(on_access), "User access privileges")];

static USER: [Node<'static, HelloConfig>; 2] = [
    Node::string(Some("password"), Some(on_password), "Password"),
    Node::list(Some("access"), &USER_ACCESS, "User access privileges"),
];

static USERS: [Node<'static, HelloConfig>; 1] = [Node::map(None, &USER, "User")];

static ROOT: [Node<'static, HelloConfig>; 3] = [
    Node::string(Some("version"), Some(on_version), "Configuration version"),
    Node::map(Some("restapi"), &SERVER, "RESTful API server"),
    Node::map(Some("users"), &USERS, "Users"),
];

static SCHEMA: Schema<'static, HelloConfig> = Schema::map(&ROOT);

fn assert_hello(cfg: &HelloConfig) {
    assert_eq!(cfg.version, "1.5.4");
    assert_eq!(cfg.port, 80);
    assert!(!cfg.ssl);
    assert_eq!(cfg.base_path, "/api");
    assert_eq!(cfg.users.keys().collect::<Vec<_>>(), vec!["john", "michael", "molly"]);
    assert_eq!(
        cfg.users["molly"],
        User { password: "zxcvb".into(), read: true, write: true, admin: false }
    );
    assert!(cfg.users["michael"].admin);
    assert_eq!(cfg.users["john"].password, "asdfgh");
}

#[test]
fn static_schema_binds_whole_config() {
    let mut cfg = HelloConfig::default();
    json_bind::parse_str(DOCUMENT, &SCHEMA, &mut cfg, &Config::new()).unwrap();
    assert_hello(&cfg);
}

#[test]
fn schema_file_binds_the_same_config() {
    fn on_str(path: &Path<'_>, val: &str, cfg: &mut HelloConfig) {
        match (path.keys().first().copied(), path.key()) {
            (Some("version"), _) => on_version(path, val, cfg),
            (Some("restapi"), _) => on_base_path(path, val, cfg),
            (Some("users"), Some("password")) => on_password(path, val, cfg),
            (Some("users"), Some("access")) => on_access(path, val, cfg),
            _ => {}
        }
    }
    let file: SchemaFile = SCHEMA_DOCUMENT.parse().unwrap();
    let handlers = Handlers {
        int: Some(on_port),
        string: Some(on_str),
        boolean: Some(on_ssl),
        ..Handlers::default()
    };
    let schema = file.build(&handlers).unwrap();

    let mut cfg = HelloConfig::default();
    json_bind::parse_str(DOCUMENT, &schema, &mut cfg, &Config::new()).unwrap();
    assert_hello(&cfg);
}

#[test]
fn unknown_user_field_stops_the_walk() {
    let doc = r#"{"users": {"eve": {"password": "x", "shell": "/bin/sh"}}}"#;
    let mut cfg = HelloConfig::default();
    let err = json_bind::parse_str(doc, &SCHEMA, &mut cfg, &Config::new()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnexpectedKey);
    assert_eq!(err.message(), "key shell unexpected while parsing map at /users/eve");
    assert_eq!(cfg.users["eve"].password, "x");
}

#[test]
fn handler_can_collect_faults_and_keep_going() {
    let faults = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&faults);
    let config = Config::new().with_error_handler(move |fault| {
        sink.lock().unwrap().push(fault.code);
        Ok(())
    });
    let doc = r#"{
        "restapi": {"port": "80", "ssl": true},
        "users": {"ann": {"password": 42, "access": ["read"]}},
        "version": "2.0"
    }"#;
    let mut cfg = HelloConfig::default();
    json_bind::parse_str(doc, &SCHEMA, &mut cfg, &config).unwrap();

    assert_eq!(
        *faults.lock().unwrap(),
        vec![ErrorCode::SchemaMandatesInt, ErrorCode::SchemaMandatesString]
    );
    assert!(cfg.ssl);
    assert_eq!(cfg.port, 0);
    assert!(cfg.users["ann"].read);
    assert_eq!(cfg.version, "2.0");
}

#[test]
fn replacement_logger_sees_trace_output() {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let config = Config::new().with_logger(move |severity, message| {
        if severity == Severity::Trace {
            sink.lock().unwrap().push(message.to_string());
        }
    });
    let mut cfg = HelloConfig::default();
    json_bind::parse_str(DOCUMENT, &SCHEMA, &mut cfg, &config).unwrap();

    let lines = lines.lock().unwrap();
    assert_eq!(lines.first().map(String::as_str), Some("JSON root processing"));
    assert!(lines.iter().any(|line| line == "JSON variable key object processing"));
    assert!(lines.iter().any(|line| line == "JSON list/array processing"));
}
