//! CLI command implementations

use anyhow::Context;
use pyuml_ai::{create_provider, RemoteSource};
use pyuml_core::{DiagramDocument, DiagramSource, SourceUnit};
use pyuml_indexer::{analyze_source, create_parser_pool, FileType, LocalSource};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::{AppConfig, SourceKind};
use crate::render::{save_diagram, Renderer};

/// Pick the diagram source named by the configuration.
pub fn build_source(config: &AppConfig) -> anyhow::Result<Arc<dyn DiagramSource>> {
    match config.source {
        SourceKind::Local => Ok(Arc::new(LocalSource::new(create_parser_pool()))),
        SourceKind::Remote => {
            let provider = create_provider(
                &config.remote.provider,
                config.remote.provider_options(),
            )?;
            tracing::info!("Using remote source {}", provider.name());
            Ok(Arc::new(RemoteSource::new(provider)))
        }
    }
}

/// A Python file to process and the name its diagram is saved under,
/// relative to the output directory and without the `.puml` extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub output_name: PathBuf,
}

impl InputFile {
    /// A file named directly: its diagram goes to `<stem>.puml`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let output_name = PathBuf::from(path.file_stem().unwrap_or(path.as_os_str()));
        Self { path, output_name }
    }

    /// A file found below `root`: the directory structure is kept, so
    /// `root/a/models.py` goes to `a/models.puml`.
    fn under(root: &Path, path: PathBuf) -> Self {
        match path.strip_prefix(root).map(|relative| relative.with_extension("")) {
            Ok(output_name) => Self { path, output_name },
            Err(_) => Self::new(path),
        }
    }
}

/// Expand directories into the Python files below them, honouring
/// `.gitignore`. Anything that is not a directory is taken as given.
pub fn discover_python_files(paths: &[PathBuf]) -> Vec<InputFile> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(InputFile::new(path.clone()));
            continue;
        }

        let mut found = Vec::new();
        for entry in ignore::WalkBuilder::new(path).build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Cannot read entry: {}", e);
                    continue;
                }
            };
            let is_file = entry.file_type().is_some_and(|t| t.is_file());
            if is_file && FileType::from_path(entry.path()).is_some() {
                found.push(entry.into_path());
            }
        }
        found.sort();
        tracing::debug!("{}: {} Python files", path.display(), found.len());
        files.extend(found.into_iter().map(|file| InputFile::under(path, file)));
    }

    files
}

/// Two inputs saving to the same `.puml` would overwrite each other.
pub fn check_output_names(files: &[InputFile]) -> anyhow::Result<()> {
    let mut seen: HashMap<&Path, &Path> = HashMap::new();
    for file in files {
        if let Some(previous) = seen.insert(&file.output_name, &file.path) {
            anyhow::bail!(
                "{} and {} would both be saved as {}.puml",
                previous.display(),
                file.path.display(),
                file.output_name.display()
            );
        }
    }
    Ok(())
}

/// What happened to one input file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub document: DiagramDocument,
    pub saved: Option<PathBuf>,
    pub rendered: bool,
}

/// Generate one document and, unless told otherwise, save and render it.
///
/// A renderer failure is logged and leaves the saved file in place; only
/// generation and saving errors fail the file.
pub async fn process_file(
    source: Arc<dyn DiagramSource>,
    input: InputFile,
    output_dir: Option<PathBuf>,
    renderer: Option<Renderer>,
) -> anyhow::Result<FileReport> {
    let unit = SourceUnit::load(&input.path)?;
    let document = source.generate(&unit).await?;

    let mut rendered = false;
    let saved = match (&document, output_dir) {
        (DiagramDocument::PlantUml(_), Some(dir)) => {
            let puml = save_diagram(&document, &dir, &input.output_name)?;
            if let Some(renderer) = renderer {
                match renderer.render(&puml).await {
                    Ok(outcome) => {
                        if !outcome.stderr.is_empty() {
                            tracing::debug!("{}: {}", renderer.command, outcome.stderr);
                        }
                        tracing::info!("Rendered {}", puml.display());
                        rendered = true;
                    }
                    Err(e) => tracing::warn!("{}: {}", puml.display(), e),
                }
            }
            Some(puml)
        }
        _ => None,
    };

    Ok(FileReport {
        path: input.path,
        document,
        saved,
        rendered,
    })
}

/// Process every input with at most `concurrency` files in flight.
/// Results come back in input order.
pub async fn process_all(
    source: Arc<dyn DiagramSource>,
    files: Vec<InputFile>,
    output_dir: Option<PathBuf>,
    renderer: Option<Renderer>,
    concurrency: usize,
) -> anyhow::Result<Vec<(PathBuf, anyhow::Result<FileReport>)>> {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));

    let mut tasks = JoinSet::new();
    for (index, input) in files.into_iter().enumerate() {
        let source = Arc::clone(&source);
        let permits = Arc::clone(&permits);
        let output_dir = output_dir.clone();
        let renderer = renderer.clone();
        tasks.spawn(async move {
            let path = input.path.clone();
            let result = match permits.acquire_owned().await {
                Ok(_permit) => process_file(source, input, output_dir, renderer).await,
                Err(e) => Err(e.into()),
            };
            (index, path, result)
        });
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        results.push(joined.context("diagram task panicked")?);
    }
    results.sort_by_key(|(index, _, _)| *index);

    Ok(results
        .into_iter()
        .map(|(_, path, result)| (path, result))
        .collect())
}

pub async fn generate(paths: Vec<PathBuf>, config: AppConfig, stdout_only: bool) -> anyhow::Result<()> {
    let files = discover_python_files(&paths);
    if files.is_empty() {
        anyhow::bail!("No Python files found");
    }
    if !stdout_only {
        check_output_names(&files)?;
    }

    let source = build_source(&config)?;
    let output_dir = (!stdout_only).then(|| config.output_dir.clone());
    let renderer = (!stdout_only && config.render.enabled).then(|| config.render.renderer());

    tracing::info!(
        "Generating {} diagrams with the {} source ({} at a time)",
        files.len(),
        source.name(),
        config.concurrency.max(1)
    );

    let results = process_all(source, files, output_dir, renderer, config.concurrency).await?;
    let total = results.len();

    let mut failures = 0;
    for (path, result) in results {
        match result {
            Ok(report) => {
                println!("{}", report.document);
                if let Some(saved) = report.saved {
                    tracing::info!("{} -> {}", report.path.display(), saved.display());
                }
            }
            Err(e) => {
                failures += 1;
                tracing::error!("{}: {:#}", path.display(), e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} files failed", failures, total);
    }
    Ok(())
}

/// Print the class models and inheritance edges of one file as JSON.
pub fn models(file: &Path) -> anyhow::Result<()> {
    let unit = SourceUnit::load(file)?;
    let analysis = analyze_source(&unit)?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

pub async fn render(file: &Path, config: &AppConfig) -> anyhow::Result<()> {
    let renderer = config.render.renderer();
    renderer
        .render(file)
        .await
        .with_context(|| format!("Failed to render {}", file.display()))?;
    tracing::info!("Rendered {}", file.display());
    Ok(())
}
