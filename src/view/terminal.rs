//! Terminal driver (impure shell): raw mode, key decoding, size queries,
//! signals and cleanup.

use std::io::{self, Read, Write};
use std::process::Command;
use std::sync::mpsc::Sender;
use std::sync::OnceLock;
use std::thread::{self, JoinHandle};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use tracing::{debug, warn};

use crate::state::viewport::{TermSize, FALLBACK_SIZE};
use crate::view::AppEvent;

/// Bytes requested from stdin per read; enough for the escape sequences we decode.
const READ_CHUNK: usize = 6;

const ESC: u8 = 0x1b;

// ===== Raw mode =====

/// Raw mode, alternate screen and hidden cursor for as long as it lives.
///
/// Dropping the guard restores the terminal. A panic hook does the same if
/// the process panics while the guard is alive.
#[derive(Debug)]
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    /// Enter raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the terminal refuses either mode;
    /// anything already switched on is switched back off first.
    pub fn acquire() -> io::Result<Self> {
        install_panic_hook();
        enable_raw_mode()?;
        let guard = Self { _private: () };
        crossterm::execute!(io::stdout(), EnterAlternateScreen, crossterm::cursor::Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Undo everything [`TerminalGuard::acquire`] did, ignoring failures.
pub fn restore_terminal() {
    let mut stdout = io::stdout();
    let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
    let _ = crossterm::execute!(stdout, LeaveAlternateScreen);
    let _ = disable_raw_mode();
    let _ = stdout.flush();
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            previous(info);
        }));
    });
}

// ===== Size =====

/// Current terminal size.
///
/// Asks the terminal directly, then `tput`, then falls back to 40x80.
pub fn terminal_size() -> TermSize {
    match crossterm::terminal::size() {
        Ok((cols, rows)) if cols > 0 && rows > 0 => TermSize { rows, cols },
        _ => tput_size().unwrap_or(FALLBACK_SIZE),
    }
}

fn tput_size() -> Option<TermSize> {
    let rows = tput_value("lines")?;
    let cols = tput_value("cols")?;
    debug!(rows, cols, "Terminal size from tput");
    Some(TermSize { rows, cols })
}

fn tput_value(capability: &str) -> Option<u16> {
    let output = Command::new("tput").arg(capability).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .trim()
        .parse()
        .ok()
        .filter(|value| *value > 0)
}

// ===== Key decoding =====

/// Decode one self-contained read from stdin into key events.
///
/// See [`KeyDecoder`] for the rules; nothing is carried between calls.
pub fn decode_keys(bytes: &[u8]) -> Vec<KeyEvent> {
    KeyDecoder::default().feed(bytes)
}

/// Stateful decoder for successive stdin reads.
///
/// A read starting with ESC is one key: a lone ESC, or one of the cursor,
/// Home/End and PageUp/PageDown sequences. Unrecognized escape sequences
/// produce nothing. Any other read yields one key per character. A multibyte
/// character cut off at the end of a read is held until the next one, and
/// invalid bytes are skipped.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    pending: Vec<u8>,
}

impl KeyDecoder {
    /// Decode the next read.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<KeyEvent> {
        if bytes.first() == Some(&ESC) {
            self.pending.clear();
            return decode_escape(bytes).into_iter().collect();
        }

        let mut buffer = std::mem::take(&mut self.pending);
        buffer.extend_from_slice(bytes);

        let mut keys = Vec::new();
        let mut rest = buffer.as_slice();
        while !rest.is_empty() {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    keys.extend(text.chars().filter_map(decode_char));
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    let valid = std::str::from_utf8(valid).unwrap_or_default();
                    keys.extend(valid.chars().filter_map(decode_char));
                    match err.error_len() {
                        Some(invalid) => {
                            debug!(bytes = ?&after[..invalid], "Skipping invalid UTF-8");
                            rest = &after[invalid..];
                        }
                        None => {
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        keys
    }
}

fn decode_escape(bytes: &[u8]) -> Option<KeyEvent> {
    let code = match bytes {
        [ESC] => KeyCode::Esc,
        [ESC, b'[', b'A'] => KeyCode::Up,
        [ESC, b'[', b'B'] => KeyCode::Down,
        [ESC, b'[', b'C'] => KeyCode::Right,
        [ESC, b'[', b'D'] => KeyCode::Left,
        [ESC, b'[', b'H'] | [ESC, b'O', b'H'] => KeyCode::Home,
        [ESC, b'[', b'F'] | [ESC, b'O', b'F'] => KeyCode::End,
        [ESC, b'[', b'5', b'~'] => KeyCode::PageUp,
        [ESC, b'[', b'6', b'~'] => KeyCode::PageDown,
        other => {
            debug!(bytes = ?other, "Ignoring unknown escape sequence");
            return None;
        }
    };
    Some(KeyEvent::new(code, KeyModifiers::NONE))
}

fn decode_char(ch: char) -> Option<KeyEvent> {
    let (code, modifiers) = match ch {
        '\r' | '\n' => (KeyCode::Enter, KeyModifiers::NONE),
        '\u{7f}' | '\u{8}' => (KeyCode::Backspace, KeyModifiers::NONE),
        '\u{3}' => (KeyCode::Char('c'), KeyModifiers::CONTROL),
        '\t' => (KeyCode::Tab, KeyModifiers::NONE),
        ch if ch.is_control() => return None,
        ch => (KeyCode::Char(ch), KeyModifiers::NONE),
    };
    Some(KeyEvent::new(code, modifiers))
}

// ===== Background threads =====

/// Read stdin on a background thread, forwarding decoded keys.
///
/// Sends [`AppEvent::InputClosed`] on end of input or a read error, then stops.
pub fn spawn_input_reader(events: Sender<AppEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stdin = io::stdin();
        let mut decoder = KeyDecoder::default();
        let mut buffer = [0u8; READ_CHUNK];
        loop {
            match stdin.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    for key in decoder.feed(&buffer[..n]) {
                        if events.send(AppEvent::Key(key)).is_err() {
                            return;
                        }
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    warn!(error = %err, "Failed to read terminal input");
                    break;
                }
            }
        }
        let _ = events.send(AppEvent::InputClosed);
    })
}

/// Handles SIGINT/SIGTERM (restore and exit) and SIGWINCH (resize event).
#[cfg(unix)]
pub struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    /// Start listening. Signals stop being handled when the guard drops.
    pub fn install(events: Sender<AppEvent>) -> io::Result<Self> {
        use signal_hook::consts::signal::{SIGINT, SIGTERM, SIGWINCH};
        use signal_hook::iterator::Signals;

        let mut signals = Signals::new([SIGINT, SIGTERM, SIGWINCH]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = thread::spawn(move || {
            for signal in signals.forever() {
                match signal {
                    SIGWINCH => {
                        debug!("SIGWINCH received");
                        let _ = events.send(AppEvent::Resize);
                    }
                    SIGINT | SIGTERM => {
                        warn!(signal, "Termination signal received, cleaning up");
                        restore_terminal();
                        std::process::exit(128 + signal);
                    }
                    _ => {}
                }
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn lone_escape_is_esc() {
        assert_eq!(decode_keys(b"\x1b"), vec![key(KeyCode::Esc)]);
    }

    #[test]
    fn arrow_sequences() {
        assert_eq!(decode_keys(b"\x1b[A"), vec![key(KeyCode::Up)]);
        assert_eq!(decode_keys(b"\x1b[B"), vec![key(KeyCode::Down)]);
        assert_eq!(decode_keys(b"\x1b[C"), vec![key(KeyCode::Right)]);
        assert_eq!(decode_keys(b"\x1b[D"), vec![key(KeyCode::Left)]);
    }

    #[test]
    fn paging_sequences() {
        assert_eq!(decode_keys(b"\x1b[5~"), vec![key(KeyCode::PageUp)]);
        assert_eq!(decode_keys(b"\x1b[6~"), vec![key(KeyCode::PageDown)]);
        assert_eq!(decode_keys(b"\x1b[H"), vec![key(KeyCode::Home)]);
        assert_eq!(decode_keys(b"\x1b[F"), vec![key(KeyCode::End)]);
    }

    #[test]
    fn unknown_escape_is_ignored() {
        assert!(decode_keys(b"\x1b[1;5A").is_empty());
        assert!(decode_keys(b"\x1bx").is_empty());
    }

    #[test]
    fn printable_bytes_become_chars() {
        assert_eq!(
            decode_keys(b"jk/"),
            vec![
                key(KeyCode::Char('j')),
                key(KeyCode::Char('k')),
                key(KeyCode::Char('/')),
            ]
        );
    }

    #[test]
    fn control_bytes() {
        assert_eq!(decode_keys(b"\r"), vec![key(KeyCode::Enter)]);
        assert_eq!(decode_keys(b"\n"), vec![key(KeyCode::Enter)]);
        assert_eq!(decode_keys(b"\x7f"), vec![key(KeyCode::Backspace)]);
        assert_eq!(
            decode_keys(b"\x03"),
            vec![KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)]
        );
        assert!(decode_keys(b"\x01").is_empty());
    }

    #[test]
    fn multibyte_chars_decode_whole() {
        assert_eq!(decode_keys("é".as_bytes()), vec![key(KeyCode::Char('é'))]);
    }

    #[test]
    fn multibyte_char_split_across_reads() {
        // GIVEN: "aééé" read in READ_CHUNK-sized pieces, cutting the last 'é'
        let bytes = "aééé".as_bytes();
        let mut decoder = KeyDecoder::default();

        // WHEN: both reads are fed in order
        let mut keys = Vec::new();
        for chunk in bytes.chunks(READ_CHUNK) {
            keys.extend(decoder.feed(chunk));
        }

        // THEN: every character arrives intact
        assert_eq!(
            keys,
            vec![
                key(KeyCode::Char('a')),
                key(KeyCode::Char('é')),
                key(KeyCode::Char('é')),
                key(KeyCode::Char('é')),
            ]
        );
    }

    #[test]
    fn incomplete_tail_waits_for_next_read() {
        let mut decoder = KeyDecoder::default();
        assert_eq!(decoder.feed(&[b'x', 0xc3]), vec![key(KeyCode::Char('x'))]);
        assert_eq!(decoder.feed(&[0xa9]), vec![key(KeyCode::Char('é'))]);
    }

    #[test]
    fn invalid_bytes_are_skipped() {
        assert_eq!(
            decode_keys(&[b'a', 0xff, b'b']),
            vec![key(KeyCode::Char('a')), key(KeyCode::Char('b'))]
        );
    }

    #[test]
    fn escape_read_drops_incomplete_tail() {
        let mut decoder = KeyDecoder::default();
        assert!(decoder.feed(&[0xc3]).is_empty());
        assert_eq!(decoder.feed(b"\x1b"), vec![key(KeyCode::Esc)]);
        assert_eq!(decoder.feed(b"j"), vec![key(KeyCode::Char('j'))]);
    }
}
