//! Scripted generation driver.

use async_trait::async_trait;
use explorer_core::GenerateRequest;
use explorer_error::{GenerationError, GenerationErrorKind};
use explorer_interface::{GenerativeDriver, TextStream};
use futures_util::StreamExt;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// What the driver does when asked for an answer.
#[derive(Debug, Clone)]
pub enum Script {
    /// Emit the chunks, then end normally
    Chunks(Vec<&'static str>),
    /// Wait before each chunk
    Delayed(Duration, Vec<&'static str>),
    /// Emit the chunks, then fail
    ChunksThenError(Vec<&'static str>, GenerationErrorKind),
    /// Refuse before producing anything
    FailOnStart(GenerationErrorKind),
    /// Hold until the gate is opened, then emit the chunks
    Gated(Arc<Notify>, Vec<&'static str>),
    /// Emit one chunk every interval, forever
    Endless(Duration),
    /// Emit the chunks, then panic
    Panic(Vec<&'static str>),
}

/// Driver that follows a [`Script`] and records every request it receives.
#[derive(Debug)]
pub struct ScriptedDriver {
    script: Script,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedDriver {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn chunks(chunks: Vec<&'static str>) -> Self {
        Self::new(Script::Chunks(chunks))
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

fn http_error(kind: &GenerationErrorKind) -> GenerationError {
    GenerationError::new(kind.clone())
}

fn ok(chunk: &str) -> Result<String, GenerationError> {
    Ok(chunk.to_string())
}

#[async_trait]
impl GenerativeDriver for ScriptedDriver {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, GenerationError> {
        self.requests.lock().push(request.clone());
        match &self.script {
            Script::Chunks(chunks) => Ok(chunks.concat()),
            Script::Delayed(delay, chunks) => {
                tokio::time::sleep(*delay * chunks.len() as u32).await;
                Ok(chunks.concat())
            }
            Script::ChunksThenError(_, kind) | Script::FailOnStart(kind) => Err(http_error(kind)),
            Script::Gated(gate, chunks) => {
                gate.notified().await;
                Ok(chunks.concat())
            }
            Script::Endless(_) => {
                std::future::pending::<()>().await;
                unreachable!("pending never resolves")
            }
            Script::Panic(_) => panic!("scripted driver panic"),
        }
    }

    async fn generate_stream(&self, request: &GenerateRequest) -> Result<TextStream, GenerationError> {
        self.requests.lock().push(request.clone());
        let stream: TextStream = match self.script.clone() {
            Script::Chunks(chunks) => async_stream::stream! {
                for chunk in chunks {
                    yield ok(chunk);
                }
            }
            .boxed(),
            Script::Delayed(delay, chunks) => async_stream::stream! {
                for chunk in chunks {
                    tokio::time::sleep(delay).await;
                    yield ok(chunk);
                }
            }
            .boxed(),
            Script::ChunksThenError(chunks, kind) => async_stream::stream! {
                for chunk in chunks {
                    yield ok(chunk);
                }
                yield Err(GenerationError::new(kind));
            }
            .boxed(),
            Script::FailOnStart(kind) => return Err(http_error(&kind)),
            Script::Gated(gate, chunks) => async_stream::stream! {
                gate.notified().await;
                for chunk in chunks {
                    yield ok(chunk);
                }
            }
            .boxed(),
            Script::Endless(interval) => async_stream::stream! {
                loop {
                    tokio::time::sleep(interval).await;
                    yield ok("tick ");
                }
            }
            .boxed(),
            Script::Panic(chunks) => async_stream::stream! {
                for chunk in chunks {
                    yield ok(chunk);
                }
                panic!("scripted driver panic");
            }
            .boxed(),
        };
        Ok(stream)
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}
