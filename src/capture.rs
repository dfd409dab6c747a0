use std::sync::mpsc;
use std::thread;
use thiserror::Error;

use crate::state::CodeKind;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Scanner is already running")]
    AlreadyRunning,
    #[error("Recognized text is not valid UTF-8: {0}")]
    InvalidText(#[from] std::string::FromUtf8Error),
    #[error("Failed to read input: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Nothing to display: empty code payload")]
    EmptyPayload,
    #[error("Clipboard error: {0}")]
    ClipboardError(String),
}

/// A code scanner session. A started scanner delivers at most one decoded
/// value and then stops itself; `stop` is safe to call at any time, any
/// number of times, and releases the underlying device synchronously.
pub trait CodeScanner {
    /// Begin scanning. Errors when a session is already running.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Take the decoded value, if one has arrived. Draining the value stops
    /// the session.
    fn poll(&mut self) -> Option<String>;

    /// Stop scanning and release the device. Idempotent.
    fn stop(&mut self);

    fn is_running(&self) -> bool;
}

/// Deterministic scanner backed by a queue of canned decodes. Stands in for
/// camera hardware, which no terminal session has.
pub struct StubScanner {
    queued: Vec<String>,
    running: bool,
}

impl StubScanner {
    pub fn new(decodes: Vec<String>) -> Self {
        Self {
            queued: decodes,
            running: false,
        }
    }
}

impl CodeScanner for StubScanner {
    fn start(&mut self) -> Result<(), CaptureError> {
        if self.running {
            return Err(CaptureError::AlreadyRunning);
        }
        self.running = true;
        Ok(())
    }

    fn poll(&mut self) -> Option<String> {
        if !self.running || self.queued.is_empty() {
            return None;
        }
        let decoded = self.queued.remove(0);
        // One decode per session.
        self.running = false;
        Some(decoded)
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Text recognition over captured image bytes. Progress is reported as
/// whole percentages from 0 to 100; the final report is always 100 on
/// success. The worker is torn down before this returns, on every path.
pub trait TextRecognizer {
    fn recognize(
        &self,
        bytes: &[u8],
        progress: &mut dyn FnMut(u8),
    ) -> Result<String, CaptureError>;
}

/// Recognizer for inputs that are already text, such as a pasted clipboard
/// or a plain-text receipt file. Decodes UTF-8 on a worker thread and joins
/// it before returning.
pub struct PlainTextRecognizer;

impl TextRecognizer for PlainTextRecognizer {
    fn recognize(
        &self,
        bytes: &[u8],
        progress: &mut dyn FnMut(u8),
    ) -> Result<String, CaptureError> {
        progress(0);
        let (tx, rx) = mpsc::channel();
        let owned = bytes.to_vec();
        let worker = thread::spawn(move || {
            let _ = tx.send(String::from_utf8(owned));
        });
        let result = rx.recv();
        // Join on every path so the worker never outlives the call.
        let _ = worker.join();
        match result {
            Ok(Ok(text)) => {
                progress(100);
                Ok(text)
            }
            Ok(Err(e)) => Err(CaptureError::InvalidText(e)),
            Err(_) => Err(CaptureError::IoError(std::io::Error::other(
                "recognition worker exited without a result",
            ))),
        }
    }
}

/// Render a card's code payload as terminal glyph lines, generated once
/// when the display modal opens. Barcodes become Code-39-style stripe
/// rows; QR payloads become a deterministic block-character grid.
pub fn render_code_lines(payload: &str, kind: CodeKind) -> Result<Vec<String>, CaptureError> {
    if payload.trim().is_empty() {
        return Err(CaptureError::EmptyPayload);
    }
    match kind {
        CodeKind::Barcode => Ok(barcode_lines(payload)),
        CodeKind::Qrcode => Ok(qr_lines(payload)),
    }
}

fn barcode_lines(payload: &str) -> Vec<String> {
    let mut stripes = String::new();
    stripes.push_str("█ ");
    for byte in payload.bytes() {
        // Stripe width keyed off the low bits of each byte.
        match byte % 4 {
            0 => stripes.push_str("█ "),
            1 => stripes.push_str("██ "),
            2 => stripes.push_str("█  "),
            _ => stripes.push_str("██  "),
        }
    }
    stripes.push('█');
    let mut lines = vec![stripes; 5];
    lines.push(format!("{payload:^width$}", width = lines[0].chars().count()));
    lines
}

fn qr_lines(payload: &str) -> Vec<String> {
    const SIZE: usize = 17;
    // Cheap deterministic hash seeds the module grid.
    let mut seed: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in payload.bytes() {
        seed ^= u64::from(byte);
        seed = seed.wrapping_mul(0x0000_0100_0000_01b3);
    }
    let mut lines = Vec::with_capacity(SIZE);
    for y in 0..SIZE {
        let mut line = String::with_capacity(SIZE * 2);
        for x in 0..SIZE {
            let filled = if in_finder(x, y) {
                finder_module(x, y)
            } else {
                let mut h = seed ^ ((y as u64) << 8 | x as u64);
                h = h.wrapping_mul(0x9e37_79b9_7f4a_7c15);
                (h >> 32) & 1 == 1
            };
            line.push_str(if filled { "██" } else { "  " });
        }
        lines.push(line);
    }
    lines
}

fn in_finder(x: usize, y: usize) -> bool {
    (x < 7 && y < 7) || (x >= 10 && y < 7) || (x < 7 && y >= 10)
}

fn finder_module(x: usize, y: usize) -> bool {
    let fx = if x >= 10 { x - 10 } else { x };
    let fy = if y >= 10 { y - 10 } else { y };
    let ring = fx == 0 || fx == 6 || fy == 0 || fy == 6;
    let core = (2..=4).contains(&fx) && (2..=4).contains(&fy);
    ring || core
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanner_delivers_at_most_one_decode() {
        let mut scanner = StubScanner::new(vec!["1234".to_string(), "5678".to_string()]);
        scanner.start().unwrap();
        assert!(scanner.is_running());
        assert_eq!(scanner.poll().as_deref(), Some("1234"));
        // Session ended with the decode.
        assert!(!scanner.is_running());
        assert_eq!(scanner.poll(), None);
    }

    #[test]
    fn scanner_stop_is_idempotent() {
        let mut scanner = StubScanner::new(vec!["x".to_string()]);
        scanner.stop();
        scanner.start().unwrap();
        scanner.stop();
        scanner.stop();
        assert!(!scanner.is_running());
        assert_eq!(scanner.poll(), None);
    }

    #[test]
    fn scanner_rejects_double_start() {
        let mut scanner = StubScanner::new(vec![]);
        scanner.start().unwrap();
        assert!(matches!(
            scanner.start(),
            Err(CaptureError::AlreadyRunning)
        ));
    }

    #[test]
    fn recognizer_reports_final_progress() {
        let mut reports = Vec::new();
        let text = PlainTextRecognizer
            .recognize(b"Milk 25.99\nBread", &mut |p| reports.push(p))
            .unwrap();
        assert_eq!(text, "Milk 25.99\nBread");
        assert_eq!(reports.first(), Some(&0));
        assert_eq!(reports.last(), Some(&100));
        assert!(reports.iter().all(|p| *p <= 100));
    }

    #[test]
    fn recognizer_rejects_invalid_utf8() {
        let result = PlainTextRecognizer.recognize(&[0xff, 0xfe, 0x00], &mut |_| {});
        assert!(matches!(result, Err(CaptureError::InvalidText(_))));
    }

    #[test]
    fn empty_payload_is_an_error() {
        assert!(matches!(
            render_code_lines("  ", CodeKind::Barcode),
            Err(CaptureError::EmptyPayload)
        ));
    }

    #[test]
    fn barcode_lines_end_with_centered_payload() {
        let lines = render_code_lines("123456", CodeKind::Barcode).unwrap();
        assert_eq!(lines.len(), 6);
        assert!(lines[5].trim() == "123456");
        // Stripe rows are identical.
        assert!(lines[..5].iter().all(|l| l == &lines[0]));
    }

    #[test]
    fn qr_grid_is_square_and_deterministic() {
        let a = render_code_lines("https://example.com", CodeKind::Qrcode).unwrap();
        let b = render_code_lines("https://example.com", CodeKind::Qrcode).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 17);
        assert!(a.iter().all(|l| l.chars().count() == 34));
    }

    #[test]
    fn qr_grids_differ_between_payloads() {
        let a = render_code_lines("alpha", CodeKind::Qrcode).unwrap();
        let b = render_code_lines("beta", CodeKind::Qrcode).unwrap();
        assert_ne!(a, b);
    }
}
