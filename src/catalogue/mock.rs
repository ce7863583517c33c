use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::DescriptorCatalogue;
use super::types::Descriptor;
use crate::storage::StoreError;

/// In-memory catalogue for tests.
#[derive(Debug, Default)]
pub struct MemoryCatalogue {
    rows: Vec<Descriptor>,
    fail: AtomicBool,
    loads: AtomicUsize,
}

impl MemoryCatalogue {
    pub fn new(rows: Vec<Descriptor>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    /// Builds a descriptor with placeholder dimension/process/level fields.
    pub fn descriptor(id: i64, discipline: &str, text: &str) -> Descriptor {
        Descriptor {
            id,
            discipline: discipline.to_string(),
            dimension: "Interpretation".to_string(),
            process_verb: "identify".to_string(),
            level: "intermediate".to_string(),
            text: text.to_string(),
        }
    }

    /// Makes every subsequent read fail.
    pub fn fail_reads(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Number of `descriptors_for` calls served.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::TaskFailed("catalogue unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DescriptorCatalogue for MemoryCatalogue {
    async fn descriptors_for(&self, discipline: &str) -> Result<Vec<Descriptor>, StoreError> {
        self.check()?;
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .iter()
            .filter(|d| d.discipline == discipline)
            .cloned()
            .collect())
    }

    async fn disciplines(&self) -> Result<Vec<String>, StoreError> {
        self.check()?;
        let mut names: Vec<String> = self.rows.iter().map(|d| d.discipline.clone()).collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn dimensions(&self) -> Result<Vec<String>, StoreError> {
        self.check()?;
        let mut names: Vec<String> = self.rows.iter().map(|d| d.dimension.clone()).collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}
