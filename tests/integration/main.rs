//! Integration tests for pyuml
//!
//! These tests drive the binary's command layer against real files and check
//! that the crates work together.

use pyuml::commands::{
    build_source, check_output_names, discover_python_files, generate, process_all, process_file,
    InputFile,
};
use pyuml::config::{AppConfig, SourceKind};
use pyuml::render::Renderer;
use pyuml_core::{DiagramDocument, DiagramError, DiagramSource, SourceUnit};
use pyuml_indexer::analyze_source;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const VEHICLES: &str = r#"
class Vehicle:
    wheels = 4

    def __init__(self, make):
        self.make = make
        self._speed = 0

    def accelerate(self, delta):
        self._speed += delta


class Car(Vehicle):
    def honk(self):
        return "beep"
"#;

fn write(dir: &Path, name: &str, text: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

/// Test that directory discovery keeps Python files and honours ignore files
#[test]
fn test_discover_python_files() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "a.py", "class A:\n    pass\n");
    write(root, "pkg/b.pyi", "class B: ...\n");
    write(root, "notes.txt", "class NotPython\n");
    write(root, "skipped.py", "class Skipped:\n    pass\n");
    write(root, ".ignore", "skipped.py\n");
    write(root, ".hidden/c.py", "class C:\n    pass\n");

    let explicit = root.join("explicit.txt");
    let files = discover_python_files(&[root.to_path_buf(), explicit.clone()]);

    let paths: Vec<PathBuf> = files.iter().map(|f| f.path.clone()).collect();
    assert_eq!(paths, vec![root.join("a.py"), root.join("pkg/b.pyi"), explicit]);

    let names: Vec<PathBuf> = files.iter().map(|f| f.output_name.clone()).collect();
    assert_eq!(
        names,
        vec![
            PathBuf::from("a"),
            PathBuf::from("pkg").join("b"),
            PathBuf::from("explicit")
        ]
    );
}

/// Test the local pipeline from file on disk to saved .puml
#[tokio::test]
async fn test_process_file_saves_diagram() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "vehicles.py", VEHICLES);
    let out = temp_dir.path().join("out");

    let source = build_source(&AppConfig::default()).unwrap();
    assert_eq!(source.name(), "local");

    let report = process_file(source, InputFile::new(temp_dir.path().join("vehicles.py")), Some(out.clone()), None)
        .await
        .unwrap();

    assert_eq!(report.saved, Some(out.join("vehicles.puml")));
    insta::assert_snapshot!(fs::read_to_string(out.join("vehicles.puml")).unwrap().trim_end(), @r###"
    @startuml
    class Vehicle {
    #_speed
    +make
    +wheels
    --
    +__init__()
    +accelerate()
    }
    class Car {
    +honk()
    }
    Vehicle <|-- Car
    @enduml
    "###);
}

/// Test that a file without classes produces the sentinel and writes nothing
#[tokio::test]
async fn test_process_file_without_classes() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "helpers.py", "def helper():\n    return 1\n");
    let out = temp_dir.path().join("out");

    let source = build_source(&AppConfig::default()).unwrap();
    let report = process_file(source, InputFile::new(temp_dir.path().join("helpers.py")), Some(out.clone()), None)
        .await
        .unwrap();

    assert_eq!(report.document, DiagramDocument::NoClasses);
    assert_eq!(
        report.document.to_string(),
        "No classes found in the provided source."
    );
    assert!(report.saved.is_none());
    assert!(!out.exists());
}

/// Test that a missing file surfaces as SourceUnavailable
#[tokio::test]
async fn test_process_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let source = build_source(&AppConfig::default()).unwrap();

    let err = process_file(source, InputFile::new(temp_dir.path().join("missing.py")), None, None)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DiagramError>(),
        Some(DiagramError::SourceUnavailable { .. })
    ));
}

/// Test that generate reports failures after processing every file
#[tokio::test]
async fn test_generate_reports_failures() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "good.py", VEHICLES);
    write(temp_dir.path(), "broken.py", "class Broken(:\n    pass\n");

    let mut config = AppConfig::default();
    config.output_dir = temp_dir.path().join("out");
    config.render.enabled = false;
    let err = generate(vec![temp_dir.path().to_path_buf()], config, false)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "1 of 2 files failed");
    assert!(temp_dir.path().join("out/good.puml").exists());
    assert!(!temp_dir.path().join("out/broken.puml").exists());
}

/// Test that same-named files in different packages keep separate diagrams
#[tokio::test]
async fn test_generate_keeps_package_structure() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    write(&src, "a/models.py", "class Alpha:\n    pass\n");
    write(&src, "b/models.py", "class Beta:\n    pass\n");
    let out = temp_dir.path().join("out");

    let mut config = AppConfig::default();
    config.output_dir = out.clone();
    config.render.enabled = false;
    generate(vec![src], config, false).await.unwrap();

    assert_eq!(
        fs::read_to_string(out.join("a").join("models.puml")).unwrap(),
        "@startuml\nclass Alpha {\n}\n@enduml\n"
    );
    assert_eq!(
        fs::read_to_string(out.join("b").join("models.puml")).unwrap(),
        "@startuml\nclass Beta {\n}\n@enduml\n"
    );
    assert!(!out.join("models.puml").exists());
}

/// Test that inputs mapping to one output file are rejected before any work
#[tokio::test]
async fn test_generate_rejects_clashing_outputs() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "a/models.py", "class Alpha:\n    pass\n");
    write(temp_dir.path(), "b/models.py", "class Beta:\n    pass\n");
    let out = temp_dir.path().join("out");

    let files = vec![
        temp_dir.path().join("a/models.py"),
        temp_dir.path().join("b/models.py"),
    ];
    assert!(check_output_names(&[InputFile::new(&files[0]), InputFile::new(&files[1])]).is_err());

    let mut config = AppConfig::default();
    config.output_dir = out.clone();
    config.render.enabled = false;
    let err = generate(files.clone(), config, false).await.unwrap_err();
    assert!(err.to_string().contains("models.puml"));
    assert!(!out.exists());

    // Printing only never writes, so clashing names are fine
    generate(files, AppConfig::default(), true).await.unwrap();
}

/// Test that a missing renderer keeps the saved diagram and the run succeeds
#[tokio::test]
async fn test_generate_survives_missing_renderer() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "vehicles.py", VEHICLES);
    let out = temp_dir.path().join("out");

    let mut config = AppConfig::default();
    config.output_dir = out.clone();
    config.render.command = "pyuml-renderer-that-does-not-exist".to_string();
    generate(vec![temp_dir.path().join("vehicles.py")], config, false)
        .await
        .unwrap();
    assert!(out.join("vehicles.puml").is_file());

    let source = build_source(&AppConfig::default()).unwrap();
    let report = process_file(
        source,
        InputFile::new(temp_dir.path().join("vehicles.py")),
        Some(out.clone()),
        Some(Renderer::new("pyuml-renderer-that-does-not-exist", Vec::new())),
    )
    .await
    .unwrap();
    assert_eq!(report.saved, Some(out.join("vehicles.puml")));
    assert!(!report.rendered);
}

/// Source that records how many generations run at the same time.
struct SlowSource {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait::async_trait]
impl DiagramSource for SlowSource {
    async fn generate(&self, _unit: &SourceUnit) -> pyuml_core::error::Result<DiagramDocument> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(DiagramDocument::NoClasses)
    }

    fn name(&self) -> &str {
        "slow"
    }
}

/// Test that the number of files in flight respects the configured limit
#[tokio::test]
async fn test_process_all_limits_concurrency() {
    let temp_dir = TempDir::new().unwrap();
    let mut files = Vec::new();
    for i in 0..10 {
        let name = format!("m{}.py", i);
        write(temp_dir.path(), &name, "x = 1\n");
        files.push(InputFile::new(temp_dir.path().join(name)));
    }

    let slow = Arc::new(SlowSource {
        in_flight: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let source: Arc<dyn DiagramSource> = slow.clone();
    let results = process_all(source, files.clone(), None, None, 2).await.unwrap();

    assert_eq!(results.len(), 10);
    for ((path, result), input) in results.iter().zip(&files) {
        assert_eq!(path, &input.path);
        assert!(result.is_ok());
    }
    assert!(slow.peak.load(Ordering::SeqCst) <= 2);
    assert_eq!(slow.in_flight.load(Ordering::SeqCst), 0);
}

/// Test that stdout-only generation writes no files
#[tokio::test]
async fn test_generate_stdout_only() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "vehicles.py", VEHICLES);

    let mut config = AppConfig::default();
    config.output_dir = temp_dir.path().join("out");
    generate(vec![temp_dir.path().join("vehicles.py")], config, true)
        .await
        .unwrap();

    assert!(!temp_dir.path().join("out").exists());
}

/// Test that an empty input set is an error
#[tokio::test]
async fn test_generate_without_python_files() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "README.md", "# nothing here\n");

    let result = generate(vec![temp_dir.path().to_path_buf()], AppConfig::default(), true).await;
    assert!(result.is_err());
}

/// Test that remote sources are built from configuration
#[test]
fn test_remote_source_selection() {
    let mut config = AppConfig::default();
    config.source = SourceKind::Remote;
    config.remote.provider = "openrouter".to_string();
    let source = build_source(&config).unwrap();
    assert_eq!(source.name(), "openrouter");

    config.remote.provider = "unknown".to_string();
    assert!(build_source(&config).is_err());
}

/// Test that the extracted models serialise for the models command
#[test]
fn test_models_json() {
    let analysis = analyze_source(&SourceUnit::new("vehicles.py", VEHICLES)).unwrap();
    let json = serde_json::to_value(&analysis).unwrap();

    assert_eq!(json["models"][0]["name"], "Vehicle");
    assert_eq!(json["models"][1]["bases"][0], "Vehicle");
    assert_eq!(json["edges"][0]["child"], "Car");
    assert_eq!(json["edges"][0]["parent"], "Vehicle");
}

/// Test that concurrent generations share one parser pool
#[tokio::test]
async fn test_concurrent_local_generation() {
    let source = build_source(&AppConfig::default()).unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..8 {
        let source = Arc::clone(&source);
        tasks.spawn(async move {
            let unit = SourceUnit::new(
                format!("gen_{}.py", i),
                format!("class Gen{}(Base):\n    def run(self):\n        self.n = {}\n", i, i),
            );
            source.generate(&unit).await.map(|doc| (i, doc))
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (i, doc) = joined.unwrap().unwrap();
        assert_eq!(
            doc.as_text(),
            format!(
                "@startuml\nclass Gen{0} {{\n+n\n--\n+run()\n}}\nBase <|-- Gen{0}\n@enduml",
                i
            )
        );
    }
}
