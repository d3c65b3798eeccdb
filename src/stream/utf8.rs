//! Incremental UTF-8 decoding across chunk boundaries.

/// Turns arbitrary byte chunks into whole-character text.
///
/// A chunk boundary can fall inside a multi-byte character; the trailing
/// partial sequence is held back until the next chunk completes it.
/// Invalid sequences become U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Reassembler {
    pending: Vec<u8>,
}

impl Utf8Reassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes held back waiting for the rest of a character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Feed a chunk; returns the text it completes, if any.
    pub fn push(&mut self, chunk: &[u8]) -> Option<String> {
        self.pending.extend_from_slice(chunk);

        let mut text = String::new();
        let mut start = 0;

        loop {
            match std::str::from_utf8(&self.pending[start..]) {
                Ok(valid) => {
                    text.push_str(valid);
                    start = self.pending.len();
                    break;
                }
                Err(err) => {
                    let valid_end = start + err.valid_up_to();
                    if let Ok(valid) = std::str::from_utf8(&self.pending[start..valid_end]) {
                        text.push_str(valid);
                    }
                    match err.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            start = valid_end + len;
                        }
                        None => {
                            // incomplete sequence at the end, wait for more
                            start = valid_end;
                            break;
                        }
                    }
                }
            }
        }

        self.pending.drain(..start);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// End of input: flush whatever is left as a replacement character.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let tail = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Some(tail)
    }
}
