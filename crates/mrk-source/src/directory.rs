//! Offline page source backed by JSON dumps on disk, and its write-side
//! counterpart, an outbox directory for sale completions.
//!
//! Layout: one envelope per file, `page-0001.json`, `page-0002.json`, ... in a
//! single directory. A missing page file means the data ends there.
//!
//! Dumps were captured with their server-side filter already applied, so the
//! request's filter and params are not re-applied here; client-side checks
//! (e.g. the transaction window) still run downstream.

use std::fs;
use std::path::{Path, PathBuf};

use mrk_record::CanonicalRecord;
use tracing::{debug, info};

use crate::wire::decode_page;
use crate::{Acknowledgement, FetchError, Page, PageRequest, PagedSource, SaleCompleter};

#[derive(Debug, Clone)]
pub struct DirectorySource {
    name: String,
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn page_path(&self, page_number: u32) -> PathBuf {
        self.dir.join(format!("page-{page_number:04}.json"))
    }
}

impl PagedSource for DirectorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_page(&self, req: &PageRequest<'_>) -> Result<Page, FetchError> {
        let path = self.page_path(req.page_number);
        if !path.exists() {
            debug!(source = %self.name, path = %path.display(), "no page file; end of data");
            return Ok(Page::end());
        }

        let raw = fs::read(&path)
            .map_err(|e| FetchError::Transport(format!("read {} failed: {e}", path.display())))?;
        let raw = raw.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&raw);
        let v: serde_json::Value = serde_json::from_slice(raw)
            .map_err(|e| FetchError::Decode(format!("{}: {e}", path.display())))?;

        decode_page(v)
    }
}

/// Writes each completion request to the next free `completion-NNNN.json`
/// in a directory and acknowledges it. The directory is created on demand.
#[derive(Debug, Clone)]
pub struct DirectoryOutbox {
    dir: PathBuf,
}

impl DirectoryOutbox {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn next_path(&self) -> PathBuf {
        (1..=u32::MAX)
            .map(|n| self.dir.join(format!("completion-{n:04}.json")))
            .find(|path| !path.exists())
            .unwrap_or_else(|| self.dir.join("completion-overflow.json"))
    }
}

impl SaleCompleter for DirectoryOutbox {
    fn name(&self) -> &str {
        "outbox"
    }

    fn complete_sale(&self, request: &CanonicalRecord) -> Result<Acknowledgement, FetchError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            FetchError::Transport(format!("create {} failed: {e}", self.dir.display()))
        })?;
        let path = self.next_path();
        let body = serde_json::to_vec_pretty(request)
            .map_err(|e| FetchError::Decode(format!("encode completion failed: {e}")))?;
        fs::write(&path, body)
            .map_err(|e| FetchError::Transport(format!("write {} failed: {e}", path.display())))?;
        info!(path = %path.display(), "completion written to outbox");
        Ok(Acknowledgement::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ack, PageQuery};

    fn req(page_number: u32, q: &PageQuery) -> PageRequest<'_> {
        PageRequest {
            page_number,
            page_size: 50,
            query: q,
        }
    }

    #[test]
    fn reads_numbered_page_files() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("page-0001.json"),
            r#"{"Ack":"Success","Items":[{"ItemID":"1"},{"ItemID":"2"}],"HasMoreItems":"true"}"#,
        )
        .unwrap();

        let src = DirectorySource::new("listings", tmp.path());
        let q = PageQuery::new();
        let page = src.fetch_page(&req(1, &q)).unwrap();
        assert_eq!(page.ack, Ack::Success);
        assert_eq!(page.items.len(), 2);
        assert!(page.has_more);

        let missing = src.fetch_page(&req(2, &q)).unwrap();
        assert!(missing.items.is_empty());
        assert!(!missing.has_more);
    }

    #[test]
    fn invalid_json_is_decode_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("page-0001.json"), "{not json").unwrap();
        let src = DirectorySource::new("orders", tmp.path());
        let q = PageQuery::new();
        let err = src.fetch_page(&req(1, &q)).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn utf8_bom_is_tolerated() {
        let tmp = tempfile::tempdir().unwrap();
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(br#"{"items":[{"a":1}]}"#);
        fs::write(tmp.path().join("page-0001.json"), bytes).unwrap();
        let src = DirectorySource::new("ads", tmp.path());
        let q = PageQuery::new();
        assert_eq!(src.fetch_page(&req(1, &q)).unwrap().items.len(), 1);
    }

    #[test]
    fn page_path_is_zero_padded() {
        let src = DirectorySource::new("x", "/data/dump");
        assert_eq!(src.page_path(7), PathBuf::from("/data/dump/page-0007.json"));
        assert_eq!(src.name(), "x");
    }

    #[test]
    fn outbox_numbers_completions() {
        let tmp = tempfile::tempdir().unwrap();
        let outbox = DirectoryOutbox::new(tmp.path().join("out"));
        let mut req = CanonicalRecord::new();
        req.insert("OrderID".into(), mrk_record::CanonicalValue::String("A".into()));

        assert!(outbox.complete_sale(&req).unwrap().ack.is_success());
        assert!(outbox.complete_sale(&req).unwrap().ack.is_success());

        let first = fs::read_to_string(tmp.path().join("out/completion-0001.json")).unwrap();
        let v: serde_json::Value = serde_json::from_str(&first).unwrap();
        assert_eq!(v["OrderID"], "A");
        assert!(tmp.path().join("out/completion-0002.json").exists());
    }
}
