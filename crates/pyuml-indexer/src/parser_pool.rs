//! Thread-safe parser pool for tree-sitter parsers
//!
//! A tree-sitter `Parser` is reused across parses but is not `Sync`, so each
//! worker thread owns one and requests are handed over a channel. Trees are
//! `Send` and travel back to the caller on a per-request reply channel.

use pyuml_core::error::{DiagramError, Result};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use tree_sitter::Parser;

use crate::syntax::{parse_with, python_language};

/// Source files the pool knows how to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Python,
    /// `.pyi` type stubs, parsed with the same grammar
    PythonStub,
}

impl FileType {
    /// Determine file type from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "py" => Some(FileType::Python),
            "pyi" => Some(FileType::PythonStub),
            _ => None,
        }
    }
}

/// A parsing request sent to the parser pool
#[derive(Debug)]
pub struct ParseRequest {
    pub content: String,
    pub path: PathBuf,
}

/// Result of a parsing operation
#[derive(Debug)]
pub struct ParseResult {
    pub tree: tree_sitter::Tree,
    pub path: PathBuf,
    pub content: String,
}

/// Internal message for the parser worker
struct WorkerRequest {
    request: ParseRequest,
    response_sender: Sender<Result<ParseResult>>,
}

/// Thread-safe parser pool
pub struct ParserPool {
    sender: Sender<WorkerRequest>,
}

impl ParserPool {
    /// Create a new parser pool with the specified number of worker threads
    pub fn new(num_workers: usize) -> Self {
        let (sender, receiver) = mpsc::channel::<WorkerRequest>();
        let receiver = Arc::new(Mutex::new(receiver));

        for i in 0..num_workers.max(1) {
            let receiver = Arc::clone(&receiver);
            std::thread::spawn(move || {
                Self::worker_thread(i, receiver);
            });
        }

        Self { sender }
    }

    /// Worker thread function that processes parsing requests
    fn worker_thread(worker_id: usize, receiver: Arc<Mutex<Receiver<WorkerRequest>>>) {
        tracing::debug!("Parser worker {} started", worker_id);

        let mut parser = Parser::new();
        let language_error = parser
            .set_language(&python_language())
            .err()
            .map(|e| format!("Failed to set language: {}", e));

        loop {
            let next = match receiver.lock() {
                Ok(guard) => guard.recv(),
                Err(_) => {
                    tracing::warn!("Parser worker {} found a poisoned queue", worker_id);
                    break;
                }
            };
            let WorkerRequest {
                request,
                response_sender,
            } = match next {
                Ok(req) => req,
                Err(_) => {
                    tracing::debug!("Parser worker {} shutting down", worker_id);
                    break;
                }
            };

            let result = match &language_error {
                Some(message) => Err(DiagramError::ParserUnavailable(message.clone())),
                None => parse_with(&mut parser, &request.path, &request.content).map(|tree| {
                    ParseResult {
                        tree,
                        path: request.path,
                        content: request.content,
                    }
                }),
            };

            if response_sender.send(result).is_err() {
                tracing::warn!("Failed to send parse result back to caller");
            }
        }
    }

    /// Parse content synchronously using the parser pool
    /// Note: This blocks the current thread until parsing is complete
    pub fn parse_blocking(&self, request: ParseRequest) -> Result<ParseResult> {
        Self::dispatch(&self.sender, request)
    }

    /// Parse content asynchronously using the parser pool
    pub async fn parse(&self, request: ParseRequest) -> Result<ParseResult> {
        let sender = self.sender.clone();
        tokio::task::spawn_blocking(move || Self::dispatch(&sender, request))
            .await
            .map_err(|e| DiagramError::ParserUnavailable(format!("Task join error: {}", e)))?
    }

    fn dispatch(sender: &Sender<WorkerRequest>, request: ParseRequest) -> Result<ParseResult> {
        let (response_sender, response_receiver) = mpsc::channel();

        sender
            .send(WorkerRequest {
                request,
                response_sender,
            })
            .map_err(|_| DiagramError::ParserUnavailable("Parser pool is shut down".to_string()))?;

        response_receiver
            .recv()
            .map_err(|_| DiagramError::ParserUnavailable("Parser worker died".to_string()))?
    }
}

impl Clone for ParserPool {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Convenience function to create a parser pool with default settings
pub fn create_parser_pool() -> ParserPool {
    // Use number of CPU cores as default worker count, but at least 2
    let num_workers = std::thread::available_parallelism()
        .map(|n| n.get().max(2))
        .unwrap_or(2);

    ParserPool::new(num_workers)
}
