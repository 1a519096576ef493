use assert_cmd::Command;
use regex::Regex;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// Nothing listens here; commands under test must fail before any request
const DEAD_API: &str = "http://127.0.0.1:9";

const AREA: &str = r#"{
    "type": "FeatureCollection",
    "features": [{
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[31.19, 29.99], [31.21, 29.99], [31.21, 30.01], [31.19, 30.01]]]
        }
    }]
}"#;

struct TestContext {
    dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }
}

struct Run {
    success: bool,
    stdout: String,
    stderr: String,
}

fn strip_ansi(s: &str) -> String {
    let re = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
    re.replace_all(s, "").to_string()
}

fn lumen(args: &[&str]) -> Run {
    let output = Command::cargo_bin("lumen")
        .unwrap()
        .env_remove("LUMEN_API_URL")
        .env_remove("LUMEN_MAP_TOKEN")
        .args(args)
        .output()
        .unwrap();
    Run {
        success: output.status.success(),
        stdout: strip_ansi(&String::from_utf8_lossy(&output.stdout)),
        stderr: strip_ansi(&String::from_utf8_lossy(&output.stderr)),
    }
}

fn optimize(ctx: &TestContext, area: &str, extra: &[&str]) -> Run {
    let area = ctx.file("area.geojson", area);
    let mut args = vec![
        "optimize",
        "--api-url",
        DEAD_API,
        "--area",
        area.to_str().unwrap(),
    ];
    args.extend_from_slice(extra);
    lumen(&args)
}

#[test]
fn test_catalog_prints_generated_lamps() {
    let run = lumen(&["catalog", "--count", "3", "--seed", "11"]);
    assert!(run.success, "{}", run.stderr);

    let lamps: Vec<Value> = serde_json::from_str(&run.stdout).unwrap();
    assert_eq!(lamps.len(), 3);

    let hex = Regex::new(r"^#[0-9a-f]{6}$").unwrap();
    for (i, lamp) in lamps.iter().enumerate() {
        assert!(hex.is_match(lamp["color"].as_str().unwrap()));
        assert_eq!(lamp["name"], format!("Lamp {}", i + 1));
        assert_eq!(lamp["cost"], 100.0);
        assert_eq!(lamp["radius"], 80.0);
    }
}

#[test]
fn test_catalog_colors_follow_seed() {
    let colors = |run: Run| -> Vec<String> {
        let lamps: Vec<Value> = serde_json::from_str(&run.stdout).unwrap();
        lamps
            .iter()
            .map(|l| l["color"].as_str().unwrap().to_string())
            .collect()
    };

    let a = colors(lumen(&["catalog", "-n", "4", "--seed", "5"]));
    let b = colors(lumen(&["catalog", "-n", "4", "--seed", "5"]));

    assert_eq!(a, b);
}

#[test]
fn test_catalog_starter_uses_lamp_defaults() {
    let run = lumen(&["catalog", "--starter", "-n", "1", "--default-radius", "120"]);
    assert!(run.success, "{}", run.stderr);

    let lamps: Vec<Value> = serde_json::from_str(&run.stdout).unwrap();
    let ids: Vec<_> = lamps.iter().map(|l| l["id"].as_str().unwrap()).collect();
    assert_eq!(&ids[..2], ["A", "B"]);
    assert_eq!(lamps[2]["radius"], 120.0);
}

#[test]
fn test_catalog_reads_settings_file() {
    let ctx = TestContext::new();
    let settings = ctx.file("lumen.json", r#"{ "default_cost": 55 }"#);

    let run = lumen(&["catalog", "-n", "1", "--config", settings.to_str().unwrap()]);
    assert!(run.success, "{}", run.stderr);

    let lamps: Vec<Value> = serde_json::from_str(&run.stdout).unwrap();
    assert_eq!(lamps[0]["cost"], 55.0);
}

#[test]
fn test_optimize_without_polygon_fails_offline() {
    let ctx = TestContext::new();

    let run = optimize(&ctx, r#"{ "type": "FeatureCollection", "features": [] }"#, &[]);

    assert!(!run.success);
    assert!(run.stderr.contains("No polygon drawn"), "{}", run.stderr);
    assert!(!run.stderr.contains("connection failed"));
}

#[test]
fn test_optimize_rejects_negative_budget() {
    let ctx = TestContext::new();

    let run = optimize(&ctx, AREA, &["--budget=-5"]);

    assert!(!run.success);
    assert!(run.stderr.contains("Invalid budget"), "{}", run.stderr);
}

#[test]
fn test_optimize_rejects_text_budget() {
    let ctx = TestContext::new();

    let run = optimize(&ctx, AREA, &["--budget", "plenty"]);

    assert!(!run.success);
    assert!(run.stderr.contains("Invalid budget"), "{}", run.stderr);
}

#[test]
fn test_optimize_rejects_bad_catalog() {
    let ctx = TestContext::new();
    let catalog = ctx.file(
        "lamps.json",
        r#"[{ "id": "x", "cost": 10, "radius": 50, "color": "blue" }]"#,
    );

    let run = optimize(&ctx, AREA, &["--catalog", catalog.to_str().unwrap()]);

    assert!(!run.success);
    assert!(run.stderr.contains("Invalid lamp color"), "{}", run.stderr);
}

#[test]
fn test_optimize_unreachable_optimizer_is_reported() {
    let ctx = TestContext::new();

    let run = optimize(&ctx, AREA, &[]);

    assert!(!run.success);
    assert!(run.stderr.contains("Optimization failed"), "{}", run.stderr);
}

#[test]
fn test_invalid_settings_file_fails() {
    let ctx = TestContext::new();
    let settings = ctx.file("lumen.json", r#"{ "api_url": "ftp://example.org" }"#);

    let run = lumen(&["health", "--config", settings.to_str().unwrap()]);

    assert!(!run.success);
    assert!(run.stderr.contains("api_url"), "{}", run.stderr);
}

#[test]
fn test_settings_file_sets_api_url() {
    let ctx = TestContext::new();
    let settings = ctx.file("lumen.json", &format!(r#"{{ "api_url": "{}" }}"#, DEAD_API));

    let run = lumen(&["health", "--config", settings.to_str().unwrap()]);

    assert!(!run.success);
    assert!(run.stderr.contains("127.0.0.1:9"), "{}", run.stderr);
    assert!(!run.stderr.contains("localhost:8000"));
}
