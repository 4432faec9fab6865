//! Test utilities for explorer tests.
//!
//! Scripted stand-ins for the remote generation and file services, plus a
//! surface that records everything it is shown.

#![allow(dead_code)]

pub mod mock_driver;
pub mod mock_store;

#[allow(unused_imports)]
pub use mock_driver::{Script, ScriptedDriver};
#[allow(unused_imports)]
pub use mock_store::ScriptedFileStore;

use explorer::CoordinatorConfig;
use explorer_core::UploadedAsset;
use explorer_interface::DisplaySurface;
use std::time::Duration;

/// Everything a [`RecordingSurface`] was told, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Uploading(usize),
    Pending(String),
    Update(String),
    Failed(String),
    Completed(String),
}

/// Surface that records every call.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub events: Vec<SurfaceEvent>,
}

impl RecordingSurface {
    pub fn pending_frames(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::Pending(frame) => Some(frame.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::Update(buffer) => Some(buffer.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn terminal_events(&self) -> usize {
        self.events
            .iter()
            .filter(|event| {
                matches!(event, SurfaceEvent::Failed(_) | SurfaceEvent::Completed(_))
            })
            .count()
    }
}

impl DisplaySurface for RecordingSurface {
    fn uploading(&mut self, count: usize) {
        self.events.push(SurfaceEvent::Uploading(count));
    }

    fn pending(&mut self, indicator: &str) {
        self.events.push(SurfaceEvent::Pending(indicator.to_string()));
    }

    fn update(&mut self, buffer: &str) {
        self.events.push(SurfaceEvent::Update(buffer.to_string()));
    }

    fn failed(&mut self, message: &str) {
        self.events.push(SurfaceEvent::Failed(message.to_string()));
    }

    fn completed(&mut self, text: &str, _elapsed: Duration) {
        self.events.push(SurfaceEvent::Completed(text.to_string()));
    }
}

/// Coordinator settings with short intervals so tests finish quickly.
pub fn fast_config() -> CoordinatorConfig {
    CoordinatorConfig::builder()
        .poll_interval(Duration::from_millis(20))
        .upload(explorer::UploadPolicy::new(
            Duration::from_millis(5),
            Duration::from_secs(2),
        ))
        .build()
        .expect("valid coordinator config")
}

/// A small PNG-typed attachment.
pub fn image_asset(name: &str) -> UploadedAsset {
    UploadedAsset::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}
