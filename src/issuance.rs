//! Batch issuance of entry and lunch QR codes.
//!
//! Only paid attendees are issued codes. Each code encodes a ticket URL
//! under the public base URL and is written as a PNG named after its token.
//! Image rendering sits behind [`QrRenderer`] so the batch logic can be
//! tested without touching the image stack.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::Luma;
use qrcode::QrCode;
use tracing::{debug, info};

use crate::checkin::{Attendee, lunch_token_for};
use crate::error::CheckpointError;

pub const ENTRY_QR_DIR: &str = "qrcodes";
pub const LUNCH_QR_DIR: &str = "lunch_qrcodes";

/// Turns a payload into an image file.
pub trait QrRenderer: Send + Sync {
    fn render(&self, payload: &str, path: &Path) -> Result<(), CheckpointError>;
}

/// Renders black-on-white PNG codes.
pub struct PngQrRenderer;

impl QrRenderer for PngQrRenderer {
    fn render(&self, payload: &str, path: &Path) -> Result<(), CheckpointError> {
        let render_err = |message: String| CheckpointError::Render {
            payload: payload.to_string(),
            message,
        };

        let code = QrCode::new(payload.as_bytes()).map_err(|e| render_err(e.to_string()))?;
        code.render::<Luma<u8>>()
            .build()
            .save(path)
            .map_err(|e| render_err(e.to_string()))?;
        Ok(())
    }
}

pub fn entry_ticket_url(base_url: &str, token: &str) -> String {
    format!("{}/ticket/{token}", base_url.trim_end_matches('/'))
}

pub fn lunch_ticket_url(base_url: &str, lunch_token: &str) -> String {
    format!("{}/lunch_ticket/{lunch_token}", base_url.trim_end_matches('/'))
}

/// Public path of an entry QR image under the `/static` mount.
pub fn entry_image_href(token: &str) -> String {
    format!("/static/{ENTRY_QR_DIR}/{token}.png")
}

/// Public path of a lunch QR image under the `/static` mount.
pub fn lunch_image_href(lunch_token: &str) -> String {
    format!("/static/{LUNCH_QR_DIR}/{lunch_token}.png")
}

/// Sets the lunch token on every paid attendee, initializing the claim
/// flag where it is absent. Returns the lunch tokens in roster order.
pub fn assign_lunch_tokens(attendees: &mut [Attendee]) -> Vec<String> {
    attendees
        .iter_mut()
        .filter(|a| a.paid)
        .map(|a| {
            let lunch_token = lunch_token_for(&a.token);
            a.lunch_token = Some(lunch_token.clone());
            a.lunch_scanned.get_or_insert(false);
            lunch_token
        })
        .collect()
}

#[derive(Clone)]
pub struct QrIssuer {
    renderer: Arc<dyn QrRenderer>,
    entry_dir: PathBuf,
    lunch_dir: PathBuf,
}

impl QrIssuer {
    pub fn new(renderer: Arc<dyn QrRenderer>, static_dir: &Path) -> Self {
        Self {
            renderer,
            entry_dir: static_dir.join(ENTRY_QR_DIR),
            lunch_dir: static_dir.join(LUNCH_QR_DIR),
        }
    }

    /// Render an entry code for every paid attendee. Records are not
    /// modified. Returns how many codes were written.
    pub fn issue_entry_qrs(
        &self,
        attendees: &[Attendee],
        base_url: &str,
    ) -> Result<usize, CheckpointError> {
        fs::create_dir_all(&self.entry_dir)?;

        let mut count = 0;
        for a in attendees.iter().filter(|a| a.paid) {
            let url = entry_ticket_url(base_url, &a.token);
            let path = self.entry_dir.join(format!("{}.png", a.token));
            self.renderer.render(&url, &path)?;
            debug!(id = a.id, path = %path.display(), "entry QR written");
            count += 1;
        }

        info!(count, dir = %self.entry_dir.display(), "entry QR codes issued");
        Ok(count)
    }

    /// Render a lunch code for every paid attendee, deriving each lunch
    /// token from the entry token. Records are not modified; persist the
    /// tokens with [`assign_lunch_tokens`] once this succeeds.
    pub fn issue_lunch_qrs(
        &self,
        attendees: &[Attendee],
        base_url: &str,
    ) -> Result<usize, CheckpointError> {
        fs::create_dir_all(&self.lunch_dir)?;

        let mut count = 0;
        for a in attendees.iter().filter(|a| a.paid) {
            let lunch_token = lunch_token_for(&a.token);
            let url = lunch_ticket_url(base_url, &lunch_token);
            let path = self.lunch_dir.join(format!("{lunch_token}.png"));
            self.renderer.render(&url, &path)?;
            debug!(id = a.id, path = %path.display(), "lunch QR written");
            count += 1;
        }

        info!(count, dir = %self.lunch_dir.display(), "lunch QR codes issued");
        Ok(count)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use parking_lot::Mutex;
    use tempfile::TempDir;

    /// Records every payload and writes a marker file instead of an image.
    #[derive(Default)]
    pub(crate) struct RecordingRenderer {
        pub rendered: Mutex<Vec<(String, PathBuf)>>,
    }

    impl QrRenderer for RecordingRenderer {
        fn render(&self, payload: &str, path: &Path) -> Result<(), CheckpointError> {
            std::fs::write(path, payload)?;
            self.rendered.lock().push((payload.to_string(), path.to_path_buf()));
            Ok(())
        }
    }

    /// Fails every render.
    pub(crate) struct BrokenRenderer;

    impl QrRenderer for BrokenRenderer {
        fn render(&self, payload: &str, _path: &Path) -> Result<(), CheckpointError> {
            Err(CheckpointError::Render {
                payload: payload.to_string(),
                message: "encoder unavailable".into(),
            })
        }
    }

    fn roster() -> Vec<Attendee> {
        vec![
            Attendee::new(1, "Amit Sharma".into(), "amit@x".into(), "paid1".into(), true),
            Attendee::new(2, "Neha Kumar".into(), "neha@x".into(), "free2".into(), false),
            Attendee::new(3, "Rahul Singh".into(), "rahul@x".into(), "paid3".into(), true),
        ]
    }

    #[test]
    fn entry_issuance_only_covers_paid_attendees() {
        let dir = TempDir::new().unwrap();
        let renderer = Arc::new(RecordingRenderer::default());
        let issuer = QrIssuer::new(renderer.clone(), dir.path());
        let attendees = roster();

        let count = issuer.issue_entry_qrs(&attendees, "https://gate.example.com/").unwrap();

        assert_eq!(count, 2);
        let rendered = renderer.rendered.lock();
        assert_eq!(rendered[0].0, "https://gate.example.com/ticket/paid1");
        assert_eq!(rendered[1].0, "https://gate.example.com/ticket/paid3");
        assert!(dir.path().join("qrcodes/paid1.png").exists());
        assert!(!dir.path().join("qrcodes/free2.png").exists());
        assert_eq!(attendees, roster());
    }

    #[test]
    fn lunch_issuance_renders_paid_only() {
        let dir = TempDir::new().unwrap();
        let renderer = Arc::new(RecordingRenderer::default());
        let issuer = QrIssuer::new(renderer.clone(), dir.path());
        let attendees = roster();

        let count = issuer.issue_lunch_qrs(&attendees, "http://localhost:5000").unwrap();

        assert_eq!(count, 2);
        assert!(dir.path().join("lunch_qrcodes/lunch_paid3.png").exists());
        assert!(!dir.path().join("lunch_qrcodes/lunch_free2.png").exists());
        assert_eq!(
            renderer.rendered.lock()[0].0,
            "http://localhost:5000/lunch_ticket/lunch_paid1"
        );
        assert_eq!(attendees, roster());
    }

    #[test]
    fn assigning_lunch_tokens_covers_paid_only() {
        let mut attendees = roster();

        let tokens = assign_lunch_tokens(&mut attendees);

        assert_eq!(tokens, ["lunch_paid1", "lunch_paid3"]);
        assert_eq!(attendees[0].lunch_token.as_deref(), Some("lunch_paid1"));
        assert_eq!(attendees[0].lunch_scanned, Some(false));
        assert_eq!(attendees[1].lunch_token, None);
        assert_eq!(attendees[1].lunch_scanned, None);
    }

    #[test]
    fn reassigning_lunch_tokens_keeps_claims() {
        let mut attendees = roster();

        assign_lunch_tokens(&mut attendees);
        attendees[0].lunch_scanned = Some(true);
        let first = attendees.clone();

        assign_lunch_tokens(&mut attendees);
        assert_eq!(attendees, first);
    }

    #[test]
    fn render_failure_stops_the_batch() {
        let dir = TempDir::new().unwrap();
        let issuer = QrIssuer::new(Arc::new(BrokenRenderer), dir.path());

        let err = issuer.issue_lunch_qrs(&roster(), "http://x").unwrap_err();
        match err {
            CheckpointError::Render { payload, .. } => {
                assert_eq!(payload, "http://x/lunch_ticket/lunch_paid1")
            }
            other => panic!("expected render error, got {other:?}"),
        }
    }

    #[test]
    fn urls_strip_trailing_slash() {
        assert_eq!(entry_ticket_url("http://h/", "t"), "http://h/ticket/t");
        assert_eq!(lunch_ticket_url("http://h", "lunch_t"), "http://h/lunch_ticket/lunch_t");
        assert_eq!(entry_image_href("t"), "/static/qrcodes/t.png");
        assert_eq!(lunch_image_href("lunch_t"), "/static/lunch_qrcodes/lunch_t.png");
    }

    #[test]
    fn png_renderer_writes_a_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("code.png");
        PngQrRenderer.render("http://localhost:5000/ticket/abc123", &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
