// src/service.rs - Async operation surface over the shared document

use crate::buffer::{Buffer, DocumentError};
use crate::formatting::FormatKind;
use crate::margin::MarginSide;
use crate::store::SnapshotStore;
use log::info;
use tokio::sync::{RwLock, watch};

/// The operation surface consumed by a transport layer. One shared mutable
/// document: mutations serialize behind the write lock, reads share the read
/// lock, and every successful mutation is published on a watch channel so
/// `wait_for_change` suspends without polling.
pub struct DocumentService {
    buffer: RwLock<Buffer>,
    store: SnapshotStore,
    version_tx: watch::Sender<u64>,
}

impl DocumentService {
    pub fn new(store: SnapshotStore) -> Self {
        let buffer = Buffer::new();
        let (version_tx, _) = watch::channel(buffer.version());
        Self {
            buffer: RwLock::new(buffer),
            store,
            version_tx,
        }
    }

    fn publish(&self, buffer: &Buffer) {
        self.version_tx.send_replace(buffer.version());
    }

    pub async fn get_text(&self) -> String {
        self.buffer.read().await.plain_text()
    }

    pub async fn get_markup(&self) -> String {
        self.buffer.read().await.render()
    }

    pub async fn insert_text(&self, text: &str, index: usize) -> Result<(), DocumentError> {
        info!("insert_text: {} chars at index {}", text.chars().count(), index);
        let mut buffer = self.buffer.write().await;
        buffer.insert_at_index(text, index)?;
        self.publish(&buffer);
        Ok(())
    }

    pub async fn delete_range(&self, start: usize, end: usize) -> Result<(), DocumentError> {
        info!("delete_range: [{}, {}]", start, end);
        let mut buffer = self.buffer.write().await;
        buffer.delete_range(start, end)?;
        self.publish(&buffer);
        Ok(())
    }

    pub async fn switch_formatting(
        &self,
        start: usize,
        end: usize,
        kind: FormatKind,
    ) -> Result<(), DocumentError> {
        info!("switch_formatting: [{}, {}] {:?}", start, end, kind);
        let mut buffer = self.buffer.write().await;
        buffer.switch_formatting(start, end, kind)?;
        self.publish(&buffer);
        Ok(())
    }

    pub async fn find(
        &self,
        term: &str,
        start: usize,
        end: Option<usize>,
    ) -> Vec<(usize, usize)> {
        info!("find: '{}' in [{}, {:?}]", term, start, end);
        self.buffer.read().await.find_in_body(term, start, end)
    }

    pub async fn set_margin(&self, side: MarginSide, value_mm: f64) {
        info!("set_margin: {:?} = {}mm", side, value_mm);
        let mut buffer = self.buffer.write().await;
        buffer.set_margin(side, value_mm);
        self.publish(&buffer);
    }

    pub async fn save(&self, name: &str) -> Result<(), DocumentError> {
        info!("save: '{}'", name);
        let mut buffer = self.buffer.write().await;
        buffer.save(&self.store, name)
    }

    pub async fn load(&self, name: &str) -> Result<(), DocumentError> {
        info!("load: '{}'", name);
        let mut buffer = self.buffer.write().await;
        buffer.load(&self.store, name)?;
        self.publish(&buffer);
        Ok(())
    }

    pub async fn get_version(&self) -> u64 {
        self.buffer.read().await.version()
    }

    /// Return the current version as soon as it exceeds `since_version`,
    /// suspending through mutations until then. All concurrent waiters wake
    /// on a single bump.
    pub async fn wait_for_change(&self, since_version: u64) -> u64 {
        let mut rx = self.version_tx.subscribe();
        loop {
            let current = *rx.borrow_and_update();
            if current > since_version {
                return current;
            }
            if rx.changed().await.is_err() {
                // Sender gone; nothing further will ever change
                return current;
            }
        }
    }
}
